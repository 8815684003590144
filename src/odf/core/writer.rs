//! ODF package writing functionality.
//!
//! The writer re-assembles a container entry by entry. Untouched entries are
//! copied in their compressed form; replaced entries are recompressed with
//! the method the original used, except that `mimetype` is always stored
//! uncompressed as ODF requires.

use super::package::EntryOverrides;
use crate::common::{Error, Result};
use crate::odf::constants::ODF_MIMETYPE;
use std::io::{Read, Seek, Write};
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Builder for re-assembling ODF packages (ZIP archives)
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a new package writer with a custom writer
    pub fn with_writer(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
        }
    }

    /// Copy every entry of `archive` in order, replacing the content of the
    /// entries named in `overrides`.
    ///
    /// Untouched entries are copied without recompressing them.
    pub fn copy_entries<R: Read + Seek>(
        &mut self,
        archive: &mut ZipArchive<R>,
        overrides: &EntryOverrides,
    ) -> Result<()> {
        for i in 0..archive.len() {
            let file = archive
                .by_index_raw(i)
                .map_err(|e| Error::ArchiveUnreadable(format!("Unreadable entry #{}: {}", i, e)))?;
            let name = file.name().to_string();

            match overrides.get(&name) {
                Some(content) => {
                    let method = file.compression();
                    drop(file);
                    self.add_entry(&name, content, method)?;
                },
                None => self
                    .zip_writer
                    .raw_copy_file(file)
                    .map_err(|e| Error::WriteFailed(format!("{}: {}", name, e)))?,
            }
        }
        Ok(())
    }

    /// Add an entry with the given content
    ///
    /// # Arguments
    ///
    /// * `path` - Path within the ZIP archive (e.g., "content.xml")
    /// * `content` - File content as bytes
    /// * `method` - Compression method of the entry being replaced
    pub fn add_entry(&mut self, path: &str, content: &[u8], method: CompressionMethod) -> Result<()> {
        let method = match method {
            _ if path == ODF_MIMETYPE => CompressionMethod::Stored,
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default().compression_method(method);

        self.zip_writer
            .start_file(path, options)
            .map_err(|e| Error::WriteFailed(format!("{}: {}", path, e)))?;
        self.zip_writer
            .write_all(content)
            .map_err(|e| Error::WriteFailed(format!("{}: {}", path, e)))?;

        Ok(())
    }

    /// Finish writing the package and return the underlying writer
    pub fn finish(self) -> Result<W> {
        self.zip_writer
            .finish()
            .map_err(|e| Error::WriteFailed(format!("Cannot finalize archive: {}", e)))
    }
}
