use anyhow::Result;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::WatchConfig;
use crate::core::event_handler::EventHandler;
use crate::core::reloader::{ProcessReloader, Reloader};
use crate::core::watcher::{DirectoryWatcher, WatchEvent};

/// Owns the watch loop: one task draining the change and error channels in
/// arrival order, dispatching reload attempts inline.
pub struct Daemon {
    config: WatchConfig,
    event_handler: EventHandler,
    reloader: ProcessReloader,
}

impl Daemon {
    pub fn new(config: WatchConfig) -> Self {
        let event_handler = EventHandler::new(config.verbose);
        let reloader = ProcessReloader::new(config.process_name.clone(), config.reload_signal);

        Self {
            config,
            event_handler,
            reloader,
        }
    }

    /// Establish the directory watches and run the event loop until the
    /// watch channels close or an external shutdown signal arrives.
    ///
    /// Reload attempts run inline: a slow process-table scan delays the next
    /// event rather than overlapping with it.
    pub async fn run(&mut self) -> Result<()> {
        let (_watcher, events, errors) = DirectoryWatcher::new(&self.config.directories)?;

        info!("🔄 Starting watch loop");
        Self::drain(&self.event_handler, &mut self.reloader, events, errors).await;
        info!("👋 Watch loop finished");

        Ok(())
    }

    async fn drain<R: Reloader>(
        handler: &EventHandler,
        reloader: &mut R,
        mut events: mpsc::UnboundedReceiver<WatchEvent>,
        mut errors: mpsc::UnboundedReceiver<notify::Error>,
    ) {
        let mut events_open = true;
        let mut errors_open = true;

        while events_open || errors_open {
            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => handler.handle_event(&event, reloader),
                    None => events_open = false,
                },
                watch_error = errors.recv(), if errors_open => match watch_error {
                    Some(e) => handler.handle_watch_error(&e),
                    None => errors_open = false,
                },
                _ = signal::ctrl_c() => {
                    info!("🛑 Received shutdown signal");
                    break;
                }
            }
        }
    }
}
