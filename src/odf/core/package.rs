//! ODF package (ZIP archive) handling functionality.
//!
//! A [`Package`] indexes the container once, hands out individual entries,
//! and writes a new container in which every entry that was not explicitly
//! replaced is raw-copied (compressed bytes, CRC and metadata untouched).

use super::writer::PackageWriter;
use crate::common::{Error, Result};
use crate::odf::constants::ODF_MIMETYPE;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

/// Replacement contents keyed by entry name.
pub type EntryOverrides = HashMap<String, Vec<u8>>;

/// An ODF package (ZIP file containing XML documents)
pub struct Package<R> {
    archive: RefCell<zip::ZipArchive<R>>,
    entries: Vec<String>,
    mimetype: Option<String>,
}

impl Package<BufReader<File>> {
    /// Open an ODF package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ArchiveUnreadable(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file))
            .map_err(|e| match e {
                Error::ArchiveUnreadable(reason) => {
                    Error::ArchiveUnreadable(format!("{}: {}", path.display(), reason))
                },
                other => other,
            })
    }
}

impl<R: Read + Seek> Package<R> {
    /// Open an ODF package from a reader
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::ArchiveUnreadable(format!("Invalid ZIP archive: {}", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive
                .by_index_raw(i)
                .map_err(|e| Error::ArchiveUnreadable(format!("Unreadable entry #{}: {}", i, e)))?;
            entries.push(file.name().to_string());
        }

        let mimetype = Self::read_mimetype(&mut archive);
        if mimetype.is_none() {
            log::debug!("Package has no mimetype entry; treating it as a plain ZIP container");
        }

        Ok(Self {
            archive: RefCell::new(archive),
            entries,
            mimetype,
        })
    }

    /// Read MIME type from the mimetype file
    fn read_mimetype(archive: &mut zip::ZipArchive<R>) -> Option<String> {
        let mut mimetype_file = archive.by_name(ODF_MIMETYPE).ok()?;
        let mut content = String::new();
        mimetype_file.read_to_string(&mut content).ok()?;
        Some(content.trim().to_string())
    }

    /// Get the MIME type from the mimetype file
    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    /// Entry names in archive order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Check if an entry exists in the package
    pub fn has_entry(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    /// Read an entry's decompressed bytes
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => Error::EntryMissing(name.to_string()),
            other => Error::ArchiveUnreadable(format!("{}: {}", name, other)),
        })?;

        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)
            .map_err(|e| Error::ArchiveUnreadable(format!("{}: {}", name, e)))?;
        Ok(content)
    }

    /// Write a copy of this package to `writer`, replacing the entries named
    /// in `overrides`.
    ///
    /// Entries keep their archive order; overrides naming entries that do
    /// not exist yet are appended at the end.
    pub fn write_archive<W: Write + Seek>(&self, writer: W, overrides: &EntryOverrides) -> Result<W> {
        let mut archive = self.archive.borrow_mut();
        let mut out = PackageWriter::with_writer(writer);

        out.copy_entries(&mut archive, overrides)?;

        let mut appended: Vec<_> = overrides
            .iter()
            .filter(|(name, _)| !self.has_entry(name))
            .collect();
        appended.sort_by(|a, b| a.0.cmp(b.0));
        for (name, content) in appended {
            out.add_entry(name, content, zip::CompressionMethod::Deflated)?;
        }

        out.finish()
    }

    /// Atomically write a copy of this package to `path`.
    ///
    /// The archive is assembled in a temporary file next to `path` and
    /// renamed over it only once complete; on failure a pre-existing file at
    /// `path` is left untouched.
    pub fn write_to<P: AsRef<Path>>(&self, path: P, overrides: &EntryOverrides) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = self.write_temp_file(dir, ".part", overrides)?;
        temp.persist(path)
            .map_err(|e| Error::WriteFailed(format!("{}: {}", path.display(), e.error)))?;
        Ok(())
    }

    /// Write a copy of this package to a fresh, uniquely named file in `dir`
    /// and return its path.
    pub fn write_to_temp<P: AsRef<Path>>(
        &self,
        dir: P,
        suffix: &str,
        overrides: &EntryOverrides,
    ) -> Result<PathBuf> {
        let temp = self.write_temp_file(dir.as_ref(), suffix, overrides)?;
        let (_file, path) = temp
            .keep()
            .map_err(|e| Error::WriteFailed(format!("Cannot keep temporary output: {}", e.error)))?;
        Ok(path)
    }

    fn write_temp_file(
        &self,
        dir: &Path,
        suffix: &str,
        overrides: &EntryOverrides,
    ) -> Result<tempfile::NamedTempFile> {
        let write_failed = |e: std::io::Error| Error::WriteFailed(format!("{}: {}", dir.display(), e));

        // Dropping the handle on any error below removes the partial file
        let mut temp = tempfile::Builder::new()
            .prefix(".sheet-stencil-")
            .suffix(suffix)
            .tempfile_in(dir)
            .map_err(write_failed)?;

        let writer = self.write_archive(BufWriter::new(temp.as_file_mut()), overrides)?;
        writer
            .into_inner()
            .map_err(|e| write_failed(e.into_error()))?
            .sync_all()
            .map_err(write_failed)?;

        Ok(temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::testing::{SIMPLE_CONTENT, build_ods};
    use std::cell::Cell;
    use std::io::{Cursor, SeekFrom};
    use std::rc::Rc;

    /// Reader that starts failing once `broken` is set.
    struct FlakyReader {
        inner: Cursor<Vec<u8>>,
        broken: Rc<Cell<bool>>,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.broken.get() {
                return Err(std::io::Error::other("device went away"));
            }
            self.inner.read(buf)
        }
    }

    impl Seek for FlakyReader {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    fn stencil_leftovers(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".sheet-stencil-"))
            .map(|e| e.path())
            .collect()
    }

    #[test]
    fn test_open_and_read_entries() {
        let bytes = build_ods(SIMPLE_CONTENT);
        let package = Package::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(package.mimetype(), Some("application/vnd.oasis.opendocument.spreadsheet"));
        assert_eq!(package.entries()[0], "mimetype");
        assert!(package.has_entry("content.xml"));
        assert_eq!(package.read_entry("content.xml").unwrap(), SIMPLE_CONTENT.as_bytes());
        assert!(matches!(package.read_entry("nope.xml"), Err(Error::EntryMissing(_))));
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let result = Package::from_reader(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(Error::ArchiveUnreadable(_))));
    }

    #[test]
    fn test_write_replaces_only_overridden_entries() {
        let package = Package::from_reader(Cursor::new(build_ods(SIMPLE_CONTENT))).unwrap();
        let mut overrides = EntryOverrides::new();
        overrides.insert("content.xml".to_string(), b"<replaced/>".to_vec());

        let bytes = package
            .write_archive(Cursor::new(Vec::new()), &overrides)
            .unwrap()
            .into_inner();
        let copy = Package::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(copy.entries(), package.entries());
        assert_eq!(copy.read_entry("content.xml").unwrap(), b"<replaced/>");
        for name in package.entries().iter().filter(|n| *n != "content.xml") {
            assert_eq!(copy.read_entry(name).unwrap(), package.read_entry(name).unwrap());
        }

        let mut archive = zip::ZipArchive::new(Cursor::new(copy_bytes(&copy))).unwrap();
        let mimetype = archive.by_name("mimetype").unwrap();
        assert_eq!(mimetype.compression(), zip::CompressionMethod::Stored);
    }

    fn copy_bytes<R: Read + Seek>(package: &Package<R>) -> Vec<u8> {
        package
            .write_archive(Cursor::new(Vec::new()), &EntryOverrides::new())
            .unwrap()
            .into_inner()
    }

    #[test]
    fn test_write_to_is_atomic_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.ods");
        std::fs::write(&target, b"previous").unwrap();

        let package = Package::from_reader(Cursor::new(build_ods(SIMPLE_CONTENT))).unwrap();
        let missing_dir = dir.path().join("missing").join("out.ods");
        let result = package.write_to(&missing_dir, &EntryOverrides::new());
        assert!(matches!(result, Err(Error::WriteFailed(_))));

        package.write_to(&target, &EntryOverrides::new()).unwrap();
        let written = Package::open(&target).unwrap();
        assert_eq!(written.entries(), package.entries());
        assert!(stencil_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_failed_write_keeps_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.ods");
        std::fs::write(&target, b"previous").unwrap();

        let broken = Rc::new(Cell::new(false));
        let reader = FlakyReader {
            inner: Cursor::new(build_ods(SIMPLE_CONTENT)),
            broken: broken.clone(),
        };
        let package = Package::from_reader(reader).unwrap();
        broken.set(true);

        let mut overrides = EntryOverrides::new();
        overrides.insert("content.xml".to_string(), b"<replaced/>".to_vec());
        assert!(package.write_to(&target, &overrides).is_err());
        assert_eq!(std::fs::read(&target).unwrap(), b"previous");
        assert!(stencil_leftovers(dir.path()).is_empty());

        assert!(package.write_to_temp(dir.path(), ".ods", &overrides).is_err());
        assert!(stencil_leftovers(dir.path()).is_empty());
    }
}
