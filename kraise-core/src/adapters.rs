//! Default port implementations.

use crate::ports::WritePort;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))?;
        debug!(path = %path, bytes = contents.len(), "wrote file");
        Ok(())
    }
}

/// Collects writes in memory, for embedding and testing.
#[derive(Debug, Default)]
pub struct InMemoryWritePort {
    files: Mutex<BTreeMap<Utf8PathBuf, Vec<u8>>>,
}

impl InMemoryWritePort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents written to `path`, if any, as UTF-8 text.
    pub fn read_string(&self, path: &Utf8Path) -> Option<String> {
        let files = self.files.lock().ok()?;
        files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Written paths in sorted order.
    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl WritePort for InMemoryWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory writer poisoned"))?;
        files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
