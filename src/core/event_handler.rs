use tracing::{error, info};

use crate::core::reloader::Reloader;
use crate::core::watcher::{WatchEvent, WatchOp};

/// Turns raw filesystem events into reload decisions.
pub struct EventHandler {
    verbose: bool,
}

impl EventHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// A change triggers a reload unless it is a permission/metadata-only
    /// event. Unrecognized kinds trigger too: a spurious reload is
    /// acceptable, a missed change is not.
    pub fn should_reload(op: WatchOp) -> bool {
        op != WatchOp::Chmod
    }

    /// Process a single filesystem event, invoking the reloader inline when
    /// it qualifies. Reload failures are logged and absorbed; they never
    /// stop the watch loop.
    pub fn handle_event<R: Reloader>(&self, event: &WatchEvent, reloader: &mut R) {
        if self.verbose {
            info!("event: {:?}", event);
        }

        if !Self::should_reload(event.op) {
            return;
        }

        info!("modified file: {}", event.path.display());
        if let Err(e) = reloader.reload() {
            error!("error: {}", e);
        }
    }

    /// Errors reported by the watch backend are logged and otherwise
    /// ignored.
    pub fn handle_watch_error(&self, error: &notify::Error) {
        error!("watch error: {}", error);
    }
}
