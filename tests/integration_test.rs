use std::fs;
use std::time::Duration;

use config_reloader::core::{DirectoryWatcher, EventHandler};
use config_reloader::{ReloadError, Reloader, Signal, WatchConfig, WatchOp};
use tempfile::tempdir;
use tokio::time::timeout;

#[derive(Default)]
struct CountingReloader {
    calls: usize,
}

impl Reloader for CountingReloader {
    fn reload(&mut self) -> Result<(), ReloadError> {
        self.calls += 1;
        Ok(())
    }
}

#[tokio::test]
async fn watcher_reports_changes_in_a_watched_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (_watcher, mut events, _errors) =
        DirectoryWatcher::new(&[dir.path().to_path_buf()]).expect("Failed to watch temp dir");

    fs::write(dir.path().join("app.conf"), "listen 8080").expect("Failed to write config file");

    let event = timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("expected a filesystem event in time")
        .expect("event channel closed unexpectedly");

    assert_ne!(event.op, WatchOp::Chmod);
    assert_eq!(event.path.file_name().unwrap(), "app.conf");
}

#[tokio::test]
async fn a_file_write_drives_a_reload_attempt() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (_watcher, mut events, _errors) =
        DirectoryWatcher::new(&[dir.path().to_path_buf()]).expect("Failed to watch temp dir");

    fs::write(dir.path().join("app.conf"), "worker_processes 2").expect("Failed to write file");

    let event = timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("expected a filesystem event in time")
        .expect("event channel closed unexpectedly");

    let handler = EventHandler::new(false);
    let mut reloader = CountingReloader::default();
    handler.handle_event(&event, &mut reloader);

    assert_eq!(reloader.calls, 1);
}

#[tokio::test]
async fn dropping_the_watcher_closes_both_channels() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (watcher, mut events, mut errors) =
        DirectoryWatcher::new(&[dir.path().to_path_buf()]).expect("Failed to watch temp dir");

    drop(watcher);

    let closed = timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event channel should close once the watcher is gone");
    assert!(closed.is_none());

    let closed = timeout(Duration::from_secs(5), errors.recv())
        .await
        .expect("error channel should close once the watcher is gone");
    assert!(closed.is_none());
}

#[test]
fn config_comes_entirely_from_the_environment() {
    std::env::set_var("CONFIG_DIR", "/etc/app,/etc/app/conf.d");
    std::env::set_var("PROCESS_NAME", "nginx");
    std::env::set_var("VERBOSE", "true");
    std::env::set_var("RELOAD_SIGNAL", "SIGUSR2");

    let config = WatchConfig::from_env().expect("Failed to build config from env");
    assert_eq!(config.directories.len(), 2);
    assert_eq!(config.process_name, "nginx");
    assert!(config.verbose);
    assert_eq!(config.reload_signal, Signal::User2);

    // Startup must fail before any watch is established when CONFIG_DIR is
    // missing.
    std::env::remove_var("CONFIG_DIR");
    assert!(WatchConfig::from_env().is_err());

    std::env::remove_var("PROCESS_NAME");
    std::env::remove_var("VERBOSE");
    std::env::remove_var("RELOAD_SIGNAL");
}
