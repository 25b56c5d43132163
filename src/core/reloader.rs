use std::io;

use sysinfo::{Pid, Signal, System};
use thiserror::Error;
use tracing::info;

/// Failures a reload attempt can report. All of them are recoverable: the
/// watch loop logs them and moves on to the next event.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("no process matching {name:?} found")]
    ProcessNotFound { name: String },

    #[error("failed to list processes: {0}")]
    Enumeration(#[source] io::Error),

    #[error("could not send {signal:?} to {name} (pid: {pid}): {reason}")]
    SignalDelivery {
        signal: Signal,
        name: String,
        pid: Pid,
        reason: String,
    },
}

/// One row of a process-table snapshot.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub name: String,
    pub pid: Pid,
}

/// Source of process-table snapshots. A snapshot is taken fresh for every
/// lookup; rows are never cached across reload attempts.
pub trait ProcessTable {
    fn snapshot(&mut self) -> Result<Vec<ProcessRecord>, io::Error>;
}

/// Live process table backed by [`sysinfo`].
pub struct SystemTable {
    system: System,
}

impl SystemTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemTable {
    fn snapshot(&mut self) -> Result<Vec<ProcessRecord>, io::Error> {
        self.system.refresh_processes();
        Ok(self
            .system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessRecord {
                name: process.name().to_string(),
                pid: *pid,
            })
            .collect())
    }
}

/// Dispatch seam between the event loop and the signal path, so tests can
/// substitute a recording implementation.
pub trait Reloader {
    fn reload(&mut self) -> Result<(), ReloadError>;
}

/// Maps an executable name to a live pid and delivers the reload signal.
pub struct ProcessReloader<T = SystemTable> {
    table: T,
    process_name: String,
    signal: Signal,
}

impl ProcessReloader {
    pub fn new(process_name: impl Into<String>, signal: Signal) -> Self {
        Self::with_table(SystemTable::new(), process_name, signal)
    }
}

impl<T: ProcessTable> ProcessReloader<T> {
    pub fn with_table(table: T, process_name: impl Into<String>, signal: Signal) -> Self {
        Self {
            table,
            process_name: process_name.into(),
            signal,
        }
    }

    /// Pid of the first process whose executable name matches exactly.
    ///
    /// The table is re-enumerated on every call. If several processes share
    /// the name, whichever one the enumeration yields first wins; that order
    /// is not guaranteed to be stable across calls.
    pub fn find_pid(&mut self) -> Result<Pid, ReloadError> {
        let records = self.table.snapshot().map_err(ReloadError::Enumeration)?;

        for record in records {
            if record.name == self.process_name {
                info!("found executable {} (pid: {})", record.name, record.pid);
                return Ok(record.pid);
            }
        }

        Err(ReloadError::ProcessNotFound {
            name: self.process_name.clone(),
        })
    }

    fn deliver(&self, pid: Pid) -> Result<(), ReloadError> {
        let mut system = System::new();
        system.refresh_process(pid);

        match system
            .process(pid)
            .map(|process| process.kill_with(self.signal))
        {
            Some(Some(true)) => Ok(()),
            Some(Some(false)) => Err(self.delivery_error(pid, "kill was rejected")),
            Some(None) => Err(self.delivery_error(pid, "signal not supported on this platform")),
            None => Err(self.delivery_error(pid, "process is no longer running")),
        }
    }

    fn delivery_error(&self, pid: Pid, reason: &str) -> ReloadError {
        ReloadError::SignalDelivery {
            signal: self.signal,
            name: self.process_name.clone(),
            pid,
            reason: reason.to_string(),
        }
    }
}

impl<T: ProcessTable> Reloader for ProcessReloader<T> {
    fn reload(&mut self) -> Result<(), ReloadError> {
        let pid = self.find_pid()?;
        self.deliver(pid)?;
        info!(
            "signal {:?} sent to {} (pid: {})",
            self.signal, self.process_name, pid
        );
        Ok(())
    }
}
