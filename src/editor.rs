//! Editing session over the system hosts file.
//!
//! [`HostsEditor`] owns the change-tracking store and the file, backup,
//! profile and watch collaborators. Every operation that talks to disk
//! leaves the in-memory state untouched when it fails.

use crate::backup::{BackupId, BackupInfo, BackupStore};
use crate::config::EditorConfig;
use crate::diff::{EntryDiff, diff};
use crate::error::Result;
use crate::hosts_file::HostsFile;
use crate::parser::Document;
use crate::profile::ProfileStore;
use crate::serializer::stringify;
use crate::store::HostsStore;
use crate::validation::validate_entries;
use crate::watcher::{HostsWatcher, WatchHandle};
use std::time::SystemTime;

/// One editing session: load, edit through [`store_mut`](Self::store_mut),
/// then [`save`](Self::save).
///
/// # Example
///
/// ```rust,ignore
/// use hosts_editor::{EditorConfig, HostsEditor, NewEntry};
///
/// let mut editor = HostsEditor::open(EditorConfig::new("myapp", "/var/lib/myapp"))?;
/// editor.store_mut().add(NewEntry::new("10.0.0.5", ["dev.test"]));
///
/// // Requires privileges to write /etc/hosts.
/// editor.save()?;
/// ```
#[derive(Debug)]
pub struct HostsEditor {
    config: EditorConfig,
    file: HostsFile,
    store: HostsStore,
    backups: BackupStore,
    profiles: ProfileStore,
    watcher: HostsWatcher,
    modified: Option<SystemTime>,
}

impl HostsEditor {
    /// Reads the configured hosts file and starts a session on it.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::InvalidConfig`](crate::HostsError::InvalidConfig)
    /// for a bad config, or [`HostsError::Io`](crate::HostsError::Io) if the
    /// hosts file cannot be read.
    pub fn open(config: EditorConfig) -> Result<Self> {
        config.validate()?;

        let file = HostsFile::with_path(config.hosts_path());
        let mut editor = Self {
            backups: BackupStore::new(config.backup_dir()),
            profiles: ProfileStore::new(config.profile_dir()),
            watcher: HostsWatcher::new(file.clone()),
            store: HostsStore::new(),
            modified: None,
            file,
            config,
        };
        editor.reload()?;
        Ok(editor)
    }

    /// Re-reads the hosts file, dropping every unsaved edit.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the file cannot
    /// be read; the current state is kept.
    pub fn reload(&mut self) -> Result<()> {
        let text = self.file.read_text()?;
        let document = Document::from_text(&text, self.file.modified());
        self.watcher.acknowledge(text);
        self.apply_document(document);
        Ok(())
    }

    /// Validates, backs up the last saved state, and writes the working
    /// entries. Returns the backup that was taken, if any.
    ///
    /// On any failure nothing is marked saved and the working entries stay
    /// as they were, so the save can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::EmptyWrite`](crate::HostsError::EmptyWrite) or
    /// [`HostsError::InvalidEntries`](crate::HostsError::InvalidEntries)
    /// when validation fails, and [`HostsError::Io`](crate::HostsError::Io)
    /// when the backup or the write fails.
    pub fn save(&mut self) -> Result<Option<BackupInfo>> {
        validate_entries(self.store.entries())?;
        let text = stringify(self.store.entries(), &self.config.app_name);

        let backup = if self.store.original().is_empty() {
            None
        } else {
            Some(self.backups.create(self.store.original())?)
        };

        let file = &self.file;
        self.watcher.acknowledge_write(&text, || file.write(&text))?;
        self.modified = self.file.modified();
        self.store.mark_saved();

        if self.config.max_backups > 0 {
            if let Err(e) = self.backups.prune(self.config.max_backups) {
                tracing::warn!(error = %e, "Failed to prune hosts backups");
            }
        }

        tracing::info!(
            path = %self.file.path().display(),
            entries = self.store.entries().len(),
            "Saved hosts file"
        );
        Ok(backup)
    }

    /// Drops every unsaved edit.
    pub fn discard(&mut self) {
        self.store.discard();
    }

    /// Checks the hosts file for changes made by other programs and, if it
    /// changed, loads it. Unsaved edits are replaced by the new contents.
    ///
    /// Returns whether a change was loaded.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the file cannot
    /// be read.
    pub fn check_external(&mut self) -> Result<bool> {
        let Some(document) = self.watcher.poll()? else {
            return Ok(false);
        };
        self.apply_document(document);
        Ok(true)
    }

    /// Loads a document delivered by a background [`WatchHandle`].
    pub fn apply_document(&mut self, document: Document) {
        if self.store.has_unsaved_changes() {
            tracing::warn!("Loading hosts file over unsaved changes");
        }
        self.modified = document.modified;
        self.store.load(document.entries);
    }

    /// Starts polling the hosts file on a background thread at the
    /// configured interval.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the thread
    /// cannot be spawned.
    pub fn watch(&self) -> Result<WatchHandle> {
        self.watcher.clone().spawn(self.config.poll_interval)
    }

    /// Lists backups, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the backup
    /// directory cannot be read.
    pub fn backups(&self) -> Result<Vec<BackupInfo>> {
        self.backups.list()
    }

    /// Replaces the working entries with a backup's. The change shows as
    /// unsaved until [`save`](Self::save) is called.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::BackupNotFound`](crate::HostsError::BackupNotFound)
    /// if the backup does not exist.
    pub fn restore_backup(&mut self, id: &BackupId) -> Result<()> {
        let entries = self.backups.load(id)?;
        tracing::info!(id = %id, entries = entries.len(), "Restoring hosts backup");
        self.store.restore(entries);
        Ok(())
    }

    /// Compares a backup (as base) with the working entries.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::BackupNotFound`](crate::HostsError::BackupNotFound)
    /// if the backup does not exist.
    pub fn compare_backup(&self, id: &BackupId) -> Result<EntryDiff> {
        let entries = self.backups.load(id)?;
        Ok(diff(&entries, self.store.entries()))
    }

    /// Deletes a backup.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::BackupNotFound`](crate::HostsError::BackupNotFound)
    /// if the backup does not exist.
    pub fn delete_backup(&self, id: &BackupId) -> Result<()> {
        self.backups.delete(id)
    }

    /// Stores the working entries as a named profile.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::InvalidProfileName`](crate::HostsError::InvalidProfileName)
    /// or an I/O error.
    pub fn save_profile(&self, name: &str) -> Result<()> {
        self.profiles.save(name, self.store.entries())
    }

    /// Replaces the working entries with a profile's. The change shows as
    /// unsaved until [`save`](Self::save) is called.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::ProfileNotFound`](crate::HostsError::ProfileNotFound)
    /// if the profile does not exist.
    pub fn apply_profile(&mut self, name: &str) -> Result<()> {
        let entries = self.profiles.load(name)?;
        tracing::info!(profile = %name, entries = entries.len(), "Applying profile");
        self.store.restore(entries);
        Ok(())
    }

    /// The profile collaborator.
    #[must_use]
    pub const fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// The change-tracking store.
    #[must_use]
    pub const fn store(&self) -> &HostsStore {
        &self.store
    }

    /// Mutable access for edits, filtering and sorting.
    pub const fn store_mut(&mut self) -> &mut HostsStore {
        &mut self.store
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Modification time of the hosts file as last loaded or saved.
    #[must_use]
    pub const fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}
