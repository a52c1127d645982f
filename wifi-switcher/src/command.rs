//! External command execution.
//!
//! The `nmcli` adapter never spawns processes directly; it goes through a
//! [`CommandRunner`] so the invocation can be observed and replaced.

use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::Result;
use crate::models::AdapterError;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a program to completion and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`.
    ///
    /// A non-zero exit is not an error here; callers inspect
    /// [`CommandOutput::code`].
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Io` if the process cannot be spawned and
    /// `AdapterError::Timeout` if it outlives the runner's timeout.
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs commands on the host with `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    timeout: Option<Duration>,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills the child and fails with `Timeout` once `limit` elapses.
    pub fn with_timeout(limit: Option<Duration>) -> Self {
        Self { timeout: limit }
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!("Running {program} with {} argument(s)", args.len());

        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);
        let child = command.output();

        let output = match self.timeout {
            Some(limit) => match timeout(limit, child).await {
                Ok(res) => res?,
                Err(_) => {
                    warn!("{program} timed out after {limit:?}");
                    return Err(AdapterError::Timeout);
                }
            },
            None => child.await?,
        };

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
