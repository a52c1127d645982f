//! [`WifiAdapter`] implementation over NetworkManager's `nmcli`.
//!
//! Each adapter operation maps to one `nmcli` invocation:
//!
//! - connect: `nmcli device wifi connect <ssid> [password <pw>] [ifname <if>]`
//! - rescan: `nmcli device wifi rescan [ifname <if>] [ssid <ssid>]`
//! - details: `nmcli -t connection show id <id>`
//!
//! Failures are classified from the exit code documented in `nmcli(1)`,
//! except for scan rate limiting which only shows up on stderr.

use async_trait::async_trait;
use log::{debug, warn};

use crate::Result;
use crate::adapter::WifiAdapter;
use crate::command::{CommandOutput, CommandRunner, SystemCommandRunner};
use crate::constants::{defaults, exit_code, stderr_markers};
use crate::models::{AdapterError, ConnectionDetails, NmcliConfig};
use crate::utils::parse_terse_fields;

/// Drives Wi-Fi operations by invoking `nmcli`.
///
/// Whether `sudo` is used, which interface is targeted and how long a
/// command may run all come from the [`NmcliConfig`] given at construction.
#[derive(Debug, Clone)]
pub struct NmcliAdapter<R = SystemCommandRunner> {
    config: NmcliConfig,
    runner: R,
}

impl NmcliAdapter {
    /// Creates an adapter with the default configuration (no `sudo`).
    pub fn new() -> Self {
        Self::with_config(NmcliConfig::default())
    }

    /// Creates an adapter that runs commands on the host.
    pub fn with_config(config: NmcliConfig) -> Self {
        let runner = SystemCommandRunner::with_timeout(config.command_timeout);
        Self { config, runner }
    }
}

impl Default for NmcliAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> NmcliAdapter<R> {
    /// Creates an adapter that runs commands through `runner`.
    pub fn with_runner(config: NmcliConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &NmcliConfig {
        &self.config
    }

    /// Resolves the program and full argument list for an `nmcli` call.
    fn invocation(&self, args: Vec<String>) -> (String, Vec<String>) {
        let mut nmcli_args = Vec::with_capacity(args.len() + 2);
        if let Some(wait) = self.config.wait {
            nmcli_args.push("--wait".to_string());
            nmcli_args.push(wait.as_secs().to_string());
        }
        nmcli_args.extend(args);

        if self.config.use_sudo {
            let mut sudo_args = Vec::with_capacity(nmcli_args.len() + 2);
            sudo_args.push("-n".to_string());
            sudo_args.push(self.config.program.clone());
            sudo_args.extend(nmcli_args);
            (defaults::SUDO_PROGRAM.to_string(), sudo_args)
        } else {
            (self.config.program.clone(), nmcli_args)
        }
    }

    /// Runs `nmcli` and returns stdout, or the classified failure.
    async fn nmcli(&self, args: Vec<String>) -> Result<String> {
        let (program, args) = self.invocation(args);
        let output = self.runner.run(&program, &args).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(classify_failure(&output))
        }
    }

    fn connect_args(&self, ssid: &str, password: &str) -> Vec<String> {
        let mut args = vec![
            "device".to_string(),
            "wifi".to_string(),
            "connect".to_string(),
            ssid.to_string(),
        ];
        if !password.is_empty() {
            args.push("password".to_string());
            args.push(password.to_string());
        }
        if let Some(ifname) = &self.config.ifname {
            args.push("ifname".to_string());
            args.push(ifname.clone());
        }
        args
    }

    fn rescan_args(&self, ssid: Option<&str>) -> Vec<String> {
        let mut args = vec![
            "device".to_string(),
            "wifi".to_string(),
            "rescan".to_string(),
        ];
        if let Some(ifname) = &self.config.ifname {
            args.push("ifname".to_string());
            args.push(ifname.clone());
        }
        if let Some(ssid) = ssid {
            args.push("ssid".to_string());
            args.push(ssid.to_string());
        }
        args
    }

    fn show_args(id: &str) -> Vec<String> {
        vec![
            "-t".to_string(),
            "connection".to_string(),
            "show".to_string(),
            "id".to_string(),
            id.to_string(),
        ]
    }
}

#[async_trait]
impl<R: CommandRunner> WifiAdapter for NmcliAdapter<R> {
    async fn connect(&self, ssid: &str, password: &str) -> Result<()> {
        debug!(
            "nmcli connect to '{ssid}' | secured={} ifname={:?}",
            !password.is_empty(),
            self.config.ifname
        );
        self.nmcli(self.connect_args(ssid, password)).await?;
        Ok(())
    }

    async fn rescan(&self, ssid: Option<&str>) -> Result<()> {
        let args = self.rescan_args(ssid);
        debug!("nmcli {}", args.join(" "));
        self.nmcli(args).await?;
        Ok(())
    }

    async fn show_connection_details(&self, id: &str) -> Result<ConnectionDetails> {
        debug!("nmcli connection show id '{id}'");
        let stdout = self.nmcli(Self::show_args(id)).await?;
        Ok(ConnectionDetails::new(parse_terse_fields(&stdout)))
    }
}

/// Maps a failed `nmcli` run to an [`AdapterError`].
fn classify_failure(output: &CommandOutput) -> AdapterError {
    if output.stderr.contains(stderr_markers::SCANNING_NOT_ALLOWED) {
        return AdapterError::ScanRateLimited;
    }

    let reason = error_line(&output.stderr);
    match output.code {
        Some(exit_code::NOT_FOUND) => AdapterError::ProfileNotFound(reason),
        Some(exit_code::TIMEOUT_EXPIRED) => AdapterError::Timeout,
        Some(exit_code::ACTIVATION_FAILED) => AdapterError::ActivationFailed(reason),
        Some(exit_code::NM_NOT_RUNNING) => AdapterError::NetworkManagerNotRunning,
        Some(exit_code::INVALID_INPUT) => AdapterError::InvalidInput(reason),
        code => {
            warn!("nmcli failed with exit code {code:?}: {reason}");
            AdapterError::CommandFailed {
                code,
                stderr: reason,
            }
        }
    }
}

/// First non-empty stderr line without nmcli's `Error: ` prefix.
fn error_line(stderr: &str) -> String {
    let line = stderr
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    line.strip_prefix("Error: ").unwrap_or(line).to_string()
}
