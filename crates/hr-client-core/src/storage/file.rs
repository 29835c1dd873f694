use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};

use super::SessionStorage;

/// Stores each key as a file named `<key>.json` inside of a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// The directory is created on first write if it does not exist
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn key_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        let is_valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !is_valid {
            bail!("storage key {key:?} may only contain ascii letters, digits, '_' and '-'");
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileStorage {
    #[tracing::instrument]
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {path:?}")),
        }
    }

    #[tracing::instrument(skip(value))]
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.key_path(key)?;
        std::fs::create_dir_all(&self.directory)
            .with_context(|| format!("failed to create storage folder {:?}", self.directory))?;

        // Write then rename so a reader never sees half a value
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value)
            .with_context(|| format!("failed to write {tmp_path:?}"))?;
        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("failed to move {tmp_path:?} to {path:?}"))?;
        Ok(())
    }

    #[tracing::instrument]
    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        let path = self.key_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {path:?}")),
        }
    }
}
