//! # hosts-editor
//!
//! Parse, edit and safely rewrite the system hosts file (`/etc/hosts`,
//! `C:\Windows\System32\drivers\etc\hosts`).
//!
//! The crate is the engine behind a hosts file editor: a lenient parser and
//! a deterministic serializer for the hosts text format, a change-tracking
//! store that knows which entries are unsaved, and the file, backup,
//! profile and watch collaborators a desktop front end needs.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use hosts_editor::{EditorConfig, HostsEditor, NewEntry, SortField, SortOrder};
//!
//! let mut editor = HostsEditor::open(EditorConfig::new("myapp", "/var/lib/myapp"))?;
//!
//! // Edit the working copy.
//! let id = editor.store_mut().add(NewEntry::new("10.0.0.5", ["dev.test"]));
//! editor.store_mut().toggle_enabled(id);
//! editor.store_mut().set_sort(SortField::Ip, SortOrder::Ascending);
//! for entry in editor.store().visible() {
//!     println!("{} {:?} unsaved={}", entry.ip, entry.hostnames, editor.store().is_unsaved(entry));
//! }
//!
//! // Validate, back up the previous state, write atomically (requires root).
//! editor.save()?;
//! ```
//!
//! ## Text format
//!
//! ```text
//! # Hosts file managed by myapp
//! # Generated at 2026-10-16T12:00:00.000Z
//!
//! 127.0.0.1 localhost
//! 10.0.0.5 a.test b.test # dev
//! # 10.0.0.6 c.test
//! # staging
//! ```
//!
//! A commented-out mapping is a *disabled* entry and parses back as one;
//! its comment goes on the following line. Lines that are neither entries
//! nor comments are dropped on load rather than reported.
//!
//! The `group` label of an [`Entry`] is not part of the text format. It is
//! kept by backups and profiles but lost when the hosts file is reloaded.
//!
//! ## Permissions
//!
//! Writing the system hosts file requires root (or Administrator). The
//! caller is responsible for privilege elevation; failures surface as
//! [`HostsError::Io`] with [`HostsError::is_permission_denied`] set.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod address;
pub mod backup;
pub mod codec;
pub mod config;
pub mod diff;
pub mod editor;
pub mod entry;
pub mod error;
pub mod hosts_file;
pub mod parser;
pub mod profile;
pub mod serializer;
pub mod store;
pub mod util;
pub mod validation;
pub mod watcher;

pub use address::is_valid_address;
pub use backup::{BackupId, BackupInfo, BackupStore};
pub use codec::{format_entry, parse_line};
pub use config::EditorConfig;
pub use diff::{EntryDiff, diff};
pub use editor::HostsEditor;
pub use entry::{Entry, EntryId, EntryPatch, NewEntry};
pub use error::{EntryIssue, HostsError, Result};
pub use hosts_file::HostsFile;
pub use parser::{Document, parse};
pub use profile::ProfileStore;
pub use serializer::{stringify, stringify_at};
pub use store::{HostsStore, SortField, SortOrder, StatusFilter, StoreStats};
pub use validation::{validate_entries, validate_entry, validate_hostname};
pub use watcher::{HostsWatcher, WatchHandle};
