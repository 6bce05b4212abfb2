//! Storage backends for project documents: a directory of JSON files or memory.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;

/// Raw key/value storage behind a [`super::ProjectStore`].
///
/// Keys are project ids; values are the serialized project documents.
pub trait ProjectBackend {
    /// Read the document stored under `id`, `None` if there is none.
    fn read(&mut self, id: &str) -> Result<Option<String>>;
    /// Create or replace the document stored under `id`.
    fn write(&mut self, id: &str, text: &str) -> Result<()>;
    /// Remove the document under `id`. Returns whether anything was removed.
    fn remove(&mut self, id: &str) -> Result<bool>;
    /// All stored ids, in no particular order.
    fn list_ids(&mut self) -> Result<Vec<String>>;
}

/// Stores each project as `<root>/<id>.json`.
pub struct FsBackend {
    root: Utf8PathBuf,
}

impl FsBackend {
    /// Use `root` as the store directory, creating it if needed.
    pub fn new(root: impl AsRef<Utf8Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.as_std_path())
            .with_context(|| format!("Create store dir {}", root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Utf8PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl ProjectBackend for FsBackend {
    fn read(&mut self, id: &str) -> Result<Option<String>> {
        let path = self.path_for(id);
        match std::fs::read_to_string(path.as_std_path()) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read {}", path)),
        }
    }

    fn write(&mut self, id: &str, text: &str) -> Result<()> {
        write_atomic(&self.path_for(id), text)
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        let path = self.path_for(id);
        match std::fs::remove_file(path.as_std_path()) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path)),
        }
    }

    fn list_ids(&mut self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(self.root.as_std_path())
            .with_context(|| format!("Read dir {}", self.root))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = Utf8PathBuf::from_path_buf(entry.path())
                .map_err(|_| anyhow::anyhow!("Non-UTF8 path in {}", self.root))?;
            if path.extension() != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                if !stem.starts_with('.') {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }
}

/// Replace `path` with `text` by writing a dot-prefixed file beside it and
/// renaming it over the target, so readers never see a partial file.
pub(crate) fn write_atomic(path: &Utf8Path, text: &str) -> Result<()> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Not a file path: {}", path))?;
    let tmp = path.with_file_name(format!(".{}.tmp", name));
    std::fs::write(tmp.as_std_path(), text).with_context(|| format!("Failed to write {}", tmp))?;
    if let Err(err) = std::fs::rename(tmp.as_std_path(), path.as_std_path()) {
        let _ = std::fs::remove_file(tmp.as_std_path());
        return Err(err).with_context(|| format!("Failed to replace {}", path));
    }
    Ok(())
}

/// Keeps documents in memory. Useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemBackend {
    files: BTreeMap<String, String>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectBackend for MemBackend {
    fn read(&mut self, id: &str) -> Result<Option<String>> {
        Ok(self.files.get(id).cloned())
    }

    fn write(&mut self, id: &str, text: &str) -> Result<()> {
        self.files.insert(id.to_string(), text.to_string());
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        Ok(self.files.remove(id).is_some())
    }

    fn list_ids(&mut self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }
}
