//! Where report photos live. The renderer only needs `fetch`; `upload` is
//! used by whatever feeds photos into a report.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// A stored file: its identifier in the store and a URL a viewer can open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    pub preview_url: String,
}

pub trait FileStore: Send + Sync {
    /// Store `bytes` under a name derived from `name` and return its identifier.
    fn upload(&self, name: &str, bytes: &[u8]) -> Result<StoredFile, Error>;

    /// Bytes of a previously stored file, or `None` if there is no such file.
    fn fetch(&self, id: &str) -> Option<Vec<u8>>;
}

/// Store backed by a plain directory; identifiers are file names inside it.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Like `new`, creating the directory if it does not exist.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            Error::Store(format!("cannot create {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `id` inside the store, or `None` if the id would escape it.
    fn file_path(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && !id.starts_with('.')
            && !id.contains(['/', '\\'])
            && id != "..";
        valid.then(|| self.root.join(id))
    }
}

/// Candidate file names for `name`: "a.jpg", then "a-1.jpg", "a-2.jpg", ...
fn candidate_names(name: &str) -> impl Iterator<Item = String> {
    let clean = sanitize(name);
    let (stem, ext) = match clean.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s.to_string(), format!(".{e}")),
        _ => (clean.clone(), String::new()),
    };
    std::iter::once(clean).chain((1u32..).map(move |n| format!("{stem}-{n}{ext}")))
}

fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let clean = clean.trim_start_matches('.');
    if clean.is_empty() {
        "file".to_string()
    } else {
        clean.to_string()
    }
}

impl FileStore for DirStore {
    fn upload(&self, name: &str, bytes: &[u8]) -> Result<StoredFile, Error> {
        // create_new claims the name atomically, so concurrent uploads of the
        // same name end up in distinct files.
        let (id, path, mut file) = candidate_names(name)
            .find_map(|id| {
                let path = self.root.join(&id);
                match OpenOptions::new().write(true).create_new(true).open(&path) {
                    Ok(file) => Some(Ok((id, path, file))),
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => None,
                    Err(e) => Some(Err(Error::Store(format!(
                        "cannot create {}: {e}",
                        path.display()
                    )))),
                }
            })
            .ok_or_else(|| Error::Store(format!("no free file name for '{name}'")))??;
        file.write_all(bytes)
            .map_err(|e| Error::Store(format!("cannot write {}: {e}", path.display())))?;
        log::debug!("stored {} ({} bytes)", path.display(), bytes.len());

        let absolute = std::fs::canonicalize(&path).unwrap_or(path);
        Ok(StoredFile {
            id,
            preview_url: format!("file://{}", absolute.display()),
        })
    }

    fn fetch(&self, id: &str) -> Option<Vec<u8>> {
        let path = self.file_path(id)?;
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::debug!("fetch {}: {e}", path.display());
                None
            }
        }
    }
}
