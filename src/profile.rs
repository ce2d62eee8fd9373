//! Named entry sets ("profiles") stored as JSON files.

use crate::entry::Entry;
use crate::error::{HostsError, Result};
use std::path::{Path, PathBuf};

/// Directory of named entry lists, one `<name>.json` file each.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Uses `dir` for profiles; it is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the profile directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `entries` under `name`, replacing any existing profile.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::InvalidProfileName`] for names that are empty
    /// or contain characters other than ASCII letters, digits, `-` and `_`;
    /// [`HostsError::Io`] or [`HostsError::Serialization`] on write failure.
    pub fn save(&self, name: &str, entries: &[Entry]) -> Result<()> {
        let path = self.profile_path(name)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, serde_json::to_string_pretty(entries)?)?;
        tracing::info!(profile = %name, entries = entries.len(), "Saved profile");
        Ok(())
    }

    /// Loads the entries of a profile.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::ProfileNotFound`] if it does not exist.
    pub fn load(&self, name: &str) -> Result<Vec<Entry>> {
        let path = self.existing_path(name)?;
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Deletes a profile.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::ProfileNotFound`] if it does not exist.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.existing_path(name)?;
        std::fs::remove_file(path)?;
        tracing::info!(profile = %name, "Deleted profile");
        Ok(())
    }

    /// Lists profile names in alphabetical order.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`] if the directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for dir_entry in std::fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn profile_path(&self, name: &str) -> Result<PathBuf> {
        if !is_valid_name(name) {
            return Err(HostsError::InvalidProfileName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    fn existing_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.profile_path(name)?;
        if !path.is_file() {
            return Err(HostsError::ProfileNotFound {
                name: name.to_string(),
            });
        }
        Ok(path)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
