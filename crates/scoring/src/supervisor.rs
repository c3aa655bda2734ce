//! Supervised lifecycle for a locally spawned scoring processor.
//!
//! The processor is a sibling service that can also be run out of band;
//! when this service owns it, the supervisor holds the child handle and
//! an explicit lifecycle state behind one lock. A monitor task watches
//! for unexpected exits and resets the state so a crashed processor can
//! be started again.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use swinglab_core::error::CoreError;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

/// How often the monitor task polls the child for exit.
const MONITOR_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Lifecycle state of the supervised processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorState {
    NotRunning,
    Starting,
    Running,
    Stopping,
}

struct Inner {
    state: ProcessorState,
    child: Option<Child>,
}

/// Owns the scoring processor subprocess and its lifecycle state.
pub struct ProcessorSupervisor {
    /// Program and arguments used to launch the processor.
    command: Vec<String>,
    inner: Arc<Mutex<Inner>>,
}

impl ProcessorSupervisor {
    pub fn new(command: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            command,
            inner: Arc::new(Mutex::new(Inner {
                state: ProcessorState::NotRunning,
                child: None,
            })),
        })
    }

    pub async fn state(&self) -> ProcessorState {
        self.inner.lock().await.state
    }

    /// Launch the processor. Rejected unless currently `NotRunning`.
    pub async fn start(&self) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        if inner.state != ProcessorState::NotRunning {
            return Err(CoreError::Conflict(format!(
                "scoring processor is {:?}, cannot start",
                inner.state
            )));
        }

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| CoreError::Internal("processor command is empty".into()))?;
        inner.state = ProcessorState::Starting;

        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                tracing::info!(program = %program, pid = ?child.id(), "scoring processor started");
                inner.child = Some(child);
                inner.state = ProcessorState::Running;
                drop(inner);

                tokio::spawn(monitor(Arc::clone(&self.inner)));
                Ok(())
            }
            Err(e) => {
                inner.state = ProcessorState::NotRunning;
                Err(CoreError::Internal(format!(
                    "failed to spawn scoring processor '{program}': {e}"
                )))
            }
        }
    }

    /// Terminate the processor. Rejected unless currently `Running`.
    pub async fn stop(&self) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        if inner.state != ProcessorState::Running {
            return Err(CoreError::Conflict(format!(
                "scoring processor is {:?}, cannot stop",
                inner.state
            )));
        }
        inner.state = ProcessorState::Stopping;

        if let Some(mut child) = inner.child.take() {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "failed to kill scoring processor");
            }
        }

        inner.state = ProcessorState::NotRunning;
        tracing::info!("scoring processor stopped");
        Ok(())
    }
}

/// Watch for the child exiting on its own (crash or clean exit) and
/// reset the state so a subsequent start is accepted.
async fn monitor(inner: Arc<Mutex<Inner>>) {
    let mut ticker = tokio::time::interval(MONITOR_POLL_INTERVAL);
    loop {
        ticker.tick().await;
        let mut inner = inner.lock().await;
        match inner.state {
            ProcessorState::Running => {
                let Some(child) = inner.child.as_mut() else {
                    return;
                };
                match child.try_wait() {
                    Ok(Some(status)) => {
                        tracing::warn!(%status, "scoring processor exited");
                        inner.child = None;
                        inner.state = ProcessorState::NotRunning;
                        return;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "failed to poll scoring processor");
                        inner.child = None;
                        inner.state = ProcessorState::NotRunning;
                        return;
                    }
                }
            }
            // Stopped (or replaced) elsewhere; this monitor is done.
            _ => return,
        }
    }
}
