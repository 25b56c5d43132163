use anyhow::{bail, Result};
use std::path::PathBuf;
use sysinfo::Signal;
use tracing::info;

/// Comma-separated list of directories to watch. Mandatory.
pub const ENV_CONFIG_DIR: &str = "CONFIG_DIR";

/// Exact executable name of the process to signal. Mandatory.
pub const ENV_PROCESS_NAME: &str = "PROCESS_NAME";

/// Set to the literal string "true" to log every raw filesystem event.
pub const ENV_VERBOSE: &str = "VERBOSE";

/// Symbolic name of the signal to deliver on reload. Defaults to SIGHUP.
pub const ENV_RELOAD_SIGNAL: &str = "RELOAD_SIGNAL";

/// Immutable process configuration, built once from the environment at
/// startup and handed by reference to the daemon.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub directories: Vec<PathBuf>,
    pub verbose: bool,
    pub process_name: String,
    pub reload_signal: Signal,
}

impl WatchConfig {
    /// Build the configuration from the process environment.
    ///
    /// Any missing mandatory variable or unresolvable signal name is an
    /// error; the caller is expected to treat that as fatal.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`WatchConfig::from_env`], but reading variables through
    /// `lookup` so callers can supply their own environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_dirs = lookup(ENV_CONFIG_DIR).unwrap_or_default();
        if raw_dirs.is_empty() {
            bail!("mandatory env var {ENV_CONFIG_DIR} is empty");
        }

        let mut directories = Vec::new();
        for entry in raw_dirs.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                bail!("{ENV_CONFIG_DIR} contains an empty path entry: {raw_dirs:?}");
            }
            directories.push(PathBuf::from(shellexpand::tilde(entry).as_ref()));
        }

        let process_name = match lookup(ENV_PROCESS_NAME) {
            Some(name) if !name.is_empty() => name,
            _ => bail!("mandatory env var {ENV_PROCESS_NAME} is empty"),
        };

        let verbose = lookup(ENV_VERBOSE).as_deref() == Some("true");

        let reload_signal = match lookup(ENV_RELOAD_SIGNAL) {
            Some(name) if !name.is_empty() => match parse_signal(&name) {
                Some(signal) => signal,
                None => bail!("cannot find signal for {ENV_RELOAD_SIGNAL}: {name}"),
            },
            _ => {
                info!("{ENV_RELOAD_SIGNAL} is empty, defaulting to SIGHUP");
                Signal::Hangup
            }
        };

        Ok(Self {
            directories,
            verbose,
            process_name,
            reload_signal,
        })
    }
}

/// Resolve a symbolic signal name ("SIGHUP" or the bare "HUP" form) to a
/// signal. Returns `None` for anything unrecognized.
pub fn parse_signal(name: &str) -> Option<Signal> {
    let name = name.strip_prefix("SIG").unwrap_or(name);

    let signal = match name {
        "HUP" => Signal::Hangup,
        "INT" => Signal::Interrupt,
        "QUIT" => Signal::Quit,
        "ILL" => Signal::Illegal,
        "TRAP" => Signal::Trap,
        "ABRT" => Signal::Abort,
        "BUS" => Signal::Bus,
        "FPE" => Signal::FloatingPointException,
        "KILL" => Signal::Kill,
        "USR1" => Signal::User1,
        "SEGV" => Signal::Segv,
        "USR2" => Signal::User2,
        "PIPE" => Signal::Pipe,
        "ALRM" => Signal::Alarm,
        "TERM" => Signal::Term,
        "CHLD" => Signal::Child,
        "CONT" => Signal::Continue,
        "STOP" => Signal::Stop,
        "TSTP" => Signal::TSTP,
        "TTIN" => Signal::TTIN,
        "TTOU" => Signal::TTOU,
        "URG" => Signal::Urgent,
        "XCPU" => Signal::XCPU,
        "XFSZ" => Signal::XFSZ,
        "VTALRM" => Signal::VirtualAlarm,
        "PROF" => Signal::Profiling,
        "WINCH" => Signal::Winch,
        "IO" => Signal::IO,
        "PWR" => Signal::Power,
        "SYS" => Signal::Sys,
        _ => return None,
    };

    Some(signal)
}
