use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;

/// The kinds of filesystem change the reload decision cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOp {
    Create,
    Write,
    Remove,
    Rename,
    Chmod,
    Other,
}

impl From<&EventKind> for WatchOp {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => WatchOp::Create,
            EventKind::Remove(_) => WatchOp::Remove,
            EventKind::Modify(ModifyKind::Metadata(_)) => WatchOp::Chmod,
            EventKind::Modify(ModifyKind::Name(_)) => WatchOp::Rename,
            EventKind::Modify(_) => WatchOp::Write,
            _ => WatchOp::Other,
        }
    }
}

/// A single filesystem change, one per affected path.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub op: WatchOp,
}

/// Watches the configured directories and feeds changes into a pair of
/// channels: one for change events, one for errors reported by the
/// underlying notification backend.
///
/// Dropping the handle tears down the OS watches and closes both channels.
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
}

impl DirectoryWatcher {
    /// Watch every directory in `directories`, non-recursively.
    ///
    /// Fails if the watcher cannot be created or any directory cannot be
    /// watched, which the daemon treats as fatal at startup.
    pub fn new(
        directories: &[PathBuf],
    ) -> Result<(
        Self,
        mpsc::UnboundedReceiver<WatchEvent>,
        mpsc::UnboundedReceiver<notify::Error>,
    )> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let op = WatchOp::from(&event.kind);
                    for path in event.paths {
                        let _ = event_tx.send(WatchEvent { path, op });
                    }
                }
                Err(e) => {
                    let _ = error_tx.send(e);
                }
            })
            .context("failed to create filesystem watcher")?;

        for dir in directories {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("failed to watch directory {}", dir.display()))?;
            info!("👀 Watching directory: {}", dir.display());
        }

        Ok((Self { _watcher: watcher }, event_rx, error_rx))
    }
}
