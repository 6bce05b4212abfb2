use super::backend::write_atomic;
use crate::model::LifeMap;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// File name of the default local slot.
pub const LOCAL_SLOT_FILE: &str = "lifemap-flow.json";

/// A single saved map on local disk, overwritten on every save.
#[derive(Debug, Clone)]
pub struct LocalSlot {
    path: Utf8PathBuf,
}

impl LocalSlot {
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The default slot file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Utf8Path>) -> Self {
        Self::new(dir.as_ref().join(LOCAL_SLOT_FILE))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Replace the saved map. The previous content stays intact until the
    /// new file is complete.
    pub fn save(&self, map: &LifeMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent.as_std_path())
                    .with_context(|| format!("Create dir {}", parent))?;
            }
        }
        let json = map.to_json_string()?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path, nodes = map.nodes.len(), "saved local map");
        Ok(())
    }

    /// Load the saved map.
    ///
    /// Returns `None` when nothing was saved yet, and also when the file does
    /// not parse; the broken content is left on disk and logged.
    pub fn load(&self) -> Result<Option<LifeMap>> {
        let text = match std::fs::read_to_string(self.path.as_std_path()) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err).with_context(|| format!("Failed to read {}", self.path)),
        };
        match LifeMap::from_json_str(&text) {
            Ok(map) => Ok(Some(map)),
            Err(err) => {
                tracing::warn!(path = %self.path, "failed to load saved map: {}", err);
                Ok(None)
            }
        }
    }
}
