//! Editor configuration.

use crate::error::{HostsError, Result};
use crate::util::default_hosts_path;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backups kept by default before the oldest are pruned.
pub const DEFAULT_MAX_BACKUPS: usize = 20;

/// Default interval between external-change polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration for a [`HostsEditor`](crate::HostsEditor).
///
/// # Example
///
/// ```
/// use hosts_editor::EditorConfig;
///
/// let config = EditorConfig::new("myapp", "/var/lib/myapp")
///     .with_hosts_path("/tmp/hosts")
///     .with_max_backups(5);
///
/// assert_eq!(config.app_name, "myapp");
/// assert_eq!(config.max_backups, 5);
/// assert!(config.backup_dir().ends_with("backups"));
/// ```
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Name written into the generated header
    /// (`# Hosts file managed by <app_name>`).
    pub app_name: String,

    /// Hosts file to edit. Defaults to the platform's system file.
    pub hosts_path: PathBuf,

    /// Root for application data; backups and profiles live below it.
    pub data_dir: PathBuf,

    /// Backups kept after each save; `0` keeps all of them.
    pub max_backups: usize,

    /// Interval between external-change polls.
    pub poll_interval: Duration,
}

impl EditorConfig {
    /// Creates a config targeting the system hosts file.
    #[must_use]
    pub fn new(app_name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            hosts_path: default_hosts_path(),
            data_dir: data_dir.into(),
            max_backups: DEFAULT_MAX_BACKUPS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the hosts file path.
    #[must_use]
    pub fn with_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.hosts_path = path.into();
        self
    }

    /// Overrides the number of backups kept.
    #[must_use]
    pub const fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    /// Overrides the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Directory holding backups.
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    /// Directory holding profiles.
    #[must_use]
    pub fn profile_dir(&self) -> PathBuf {
        self.data_dir.join("profiles")
    }

    /// Returns the hosts file path.
    #[must_use]
    pub fn hosts_path(&self) -> &Path {
        &self.hosts_path
    }

    /// Checks the values for obvious mistakes.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::InvalidConfig`] for an empty or multi-line app
    /// name or a zero poll interval.
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(HostsError::InvalidConfig("app name cannot be empty".into()));
        }
        if self.app_name.contains(['\n', '\r']) {
            return Err(HostsError::InvalidConfig(
                "app name cannot contain line breaks".into(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(HostsError::InvalidConfig(
                "poll interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
