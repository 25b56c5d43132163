pub mod daemon;
pub mod event_handler;
pub mod reloader;
pub mod watcher;

pub use daemon::Daemon;
pub use event_handler::EventHandler;
pub use reloader::{ProcessReloader, ReloadError, Reloader};
pub use watcher::{DirectoryWatcher, WatchEvent, WatchOp};
