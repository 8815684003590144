//! Template lookup.

use crate::common::{Error, Result};
use std::path::{Path, PathBuf};

/// Which template to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A single name, used as given
    Name(PathBuf),
    /// Names tried in order against the search roots; the first existing
    /// file wins
    Candidates(Vec<PathBuf>),
}

impl From<&str> for TemplateSource {
    fn from(name: &str) -> Self {
        TemplateSource::Name(PathBuf::from(name))
    }
}

impl From<String> for TemplateSource {
    fn from(name: String) -> Self {
        TemplateSource::Name(PathBuf::from(name))
    }
}

impl From<PathBuf> for TemplateSource {
    fn from(path: PathBuf) -> Self {
        TemplateSource::Name(path)
    }
}

impl From<&Path> for TemplateSource {
    fn from(path: &Path) -> Self {
        TemplateSource::Name(path.to_path_buf())
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for TemplateSource {
    fn from(names: Vec<P>) -> Self {
        TemplateSource::Candidates(names.into_iter().map(Into::into).collect())
    }
}

impl TemplateSource {
    /// Find the template file.
    ///
    /// A [`Name`](TemplateSource::Name) is resolved the same way as a
    /// single candidate. Absolute names are checked directly; relative names
    /// are joined to each search root in turn, or taken relative to the
    /// working directory when there are no roots.
    pub fn resolve(&self, search_roots: &[PathBuf]) -> Result<PathBuf> {
        let names = match self {
            TemplateSource::Name(name) => std::slice::from_ref(name),
            TemplateSource::Candidates(names) => names.as_slice(),
        };
        for name in names {
            if let Some(found) = find(name, search_roots) {
                return Ok(found);
            }
        }
        Err(Error::TemplateNotFound {
            candidates: names.iter().map(|n| n.display().to_string()).collect(),
        })
    }
}

fn find(name: &Path, search_roots: &[PathBuf]) -> Option<PathBuf> {
    if name.is_absolute() || search_roots.is_empty() {
        return name.is_file().then(|| name.to_path_buf());
    }
    search_roots
        .iter()
        .map(|root| root.join(name))
        .find(|path| path.is_file())
}
