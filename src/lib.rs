//! config-reloader - a sidecar that watches configuration directories and
//! signals a running process to reload when they change.
//!
//! Non-reloading daemons pick up new configuration without a restart: every
//! qualifying filesystem change triggers a fresh process-table scan for the
//! target executable and a signal (SIGHUP by default) to the first match.

pub mod config;
pub mod core;

// Re-export commonly used types
pub use config::WatchConfig;
pub use sysinfo::Signal;
pub use core::daemon::Daemon;
pub use core::reloader::{ProcessReloader, ReloadError, Reloader};
pub use core::watcher::{WatchEvent, WatchOp};
