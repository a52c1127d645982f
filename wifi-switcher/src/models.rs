use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{defaults, fields};

/// Activation state of a saved connection profile.
///
/// Parsed from the `GENERAL.STATE` field that `nmcli connection show`
/// reports for a profile. NetworkManager only prints the `GENERAL.*`
/// section while a profile is active, so a missing field maps to
/// [`ActivationState::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationState {
    /// The field was absent.
    Unknown,
    /// Connection is activating (connecting).
    Activating,
    /// Connection is fully activated (connected).
    Activated,
    /// Connection is deactivating (disconnecting).
    Deactivating,
    /// Connection is fully deactivated (disconnected).
    Deactivated,
    /// A state string not mapped to a specific variant.
    Other(String),
}

impl From<&str> for ActivationState {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "activating" => Self::Activating,
            "activated" => Self::Activated,
            "deactivating" => Self::Deactivating,
            "deactivated" => Self::Deactivated,
            "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for ActivationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Deactivating => write!(f, "deactivating"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Other(s) => write!(f, "unknown state ({s})"),
        }
    }
}

/// Key/value details of a saved connection profile.
///
/// Keys are `nmcli` field names such as `connection.id` or `GENERAL.STATE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    fields: HashMap<String, String>,
}

impl ConnectionDetails {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the profile's activation state from `GENERAL.STATE`.
    pub fn activation_state(&self) -> ActivationState {
        self.get(fields::GENERAL_STATE)
            .map(ActivationState::from)
            .unwrap_or(ActivationState::Unknown)
    }

    pub fn is_activated(&self) -> bool {
        self.activation_state() == ActivationState::Activated
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all fields, sorted by key.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConnectionDetails {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Credentials for a single connection attempt.
///
/// An empty password means the network is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub ssid: String,
    pub password: String,
}

impl ConnectionRequest {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Final state of a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionOutcome {
    /// The profile reports `activated`.
    Connected,
    /// No matching profile or access point and rescanning is disabled.
    NotFound,
    /// No matching profile or access point, even after rescanning.
    NotFoundAfterRescan,
    /// NetworkManager refused the rescan because another one ran recently.
    ScanRateLimited,
    /// No saved profile exists to confirm the connection state.
    Unconfirmed,
    /// A profile exists but is not activated, usually a timeout.
    TimeoutOrUnknown,
    /// The adapter failed in a way the connection flow does not handle.
    AdapterFailure(String),
}

impl ConnectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Builds the user-facing message for this outcome.
    pub fn message(&self, ssid: &str) -> String {
        match self {
            Self::Connected => format!("Connected successfully to network with SSID {ssid}"),
            Self::NotFound => format!(
                "SSID {ssid} not found and rescanning is disabled; check the SSID is correct"
            ),
            Self::NotFoundAfterRescan => {
                format!("SSID {ssid} not found after rescan; check the SSID is correct")
            }
            Self::ScanRateLimited => format!(
                "Failed to scan for network with SSID {ssid}: rescan rate-limited \
                 right after a previous scan, retry in ~30s"
            ),
            Self::Unconfirmed => format!(
                "Attempted to connect to SSID {ssid}, but cannot confirm connection \
                 status, no saved profile found"
            ),
            Self::TimeoutOrUnknown => format!(
                "Unknown connection error while connecting to SSID {ssid}, \
                 likely timeout, retry in ~30s"
            ),
            Self::AdapterFailure(reason) => {
                format!("Failed to connect to SSID {ssid}: {reason}")
            }
        }
    }
}

/// Result reported back to the caller of a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionResult {
    pub successful: bool,
    pub message: String,
    pub outcome: ConnectionOutcome,
}

impl ConnectionResult {
    pub fn new(ssid: &str, outcome: ConnectionOutcome) -> Self {
        Self {
            successful: outcome.is_success(),
            message: outcome.message(ssid),
            outcome,
        }
    }
}

impl From<ConnectionResult> for (bool, String) {
    fn from(result: ConnectionResult) -> Self {
        (result.successful, result.message)
    }
}

/// Errors reported by a [`WifiAdapter`](crate::WifiAdapter).
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The profile, access point or device named in the request does not
    /// exist. Carries nmcli's reason.
    #[error("not found: {0}")]
    ProfileNotFound(String),

    /// A scan was requested too soon after the previous one.
    #[error("scanning not allowed immediately after a previous scan")]
    ScanRateLimited,

    /// The command did not finish in time.
    #[error("operation timed out")]
    Timeout,

    /// NetworkManager could not activate the connection.
    #[error("connection activation failed: {0}")]
    ActivationFailed(String),

    /// The NetworkManager daemon is not running.
    #[error("NetworkManager is not running")]
    NetworkManagerNotRunning,

    /// The arguments were rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any other non-zero exit.
    #[error("command failed (exit code {code:?}): {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    /// The command could not be spawned.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings for invoking `nmcli`.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use wifi_switcher::NmcliConfig;
///
/// let config = NmcliConfig::default()
///     .with_sudo(true)
///     .with_ifname("wlan0")
///     .with_command_timeout(Duration::from_secs(60));
/// assert!(config.use_sudo);
/// ```
#[derive(Debug, Clone)]
pub struct NmcliConfig {
    /// Path or name of the `nmcli` binary.
    pub program: String,
    /// Run `nmcli` through `sudo`.
    pub use_sudo: bool,
    /// Restrict operations to this wireless interface.
    pub ifname: Option<String>,
    /// Value for `nmcli --wait`; `None` keeps nmcli's own default.
    pub wait: Option<Duration>,
    /// Kill `nmcli` if it runs longer than this.
    pub command_timeout: Option<Duration>,
}

impl Default for NmcliConfig {
    /// Defaults:
    /// - `program`: `nmcli`
    /// - `use_sudo`: `false`
    /// - `ifname`, `wait`, `command_timeout`: `None`
    fn default() -> Self {
        Self {
            program: defaults::NMCLI_PROGRAM.to_string(),
            use_sudo: false,
            ifname: None,
            wait: None,
            command_timeout: None,
        }
    }
}

impl NmcliConfig {
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_sudo(mut self, use_sudo: bool) -> Self {
        self.use_sudo = use_sudo;
        self
    }

    pub fn with_ifname(mut self, ifname: impl Into<String>) -> Self {
        self.ifname = Some(ifname.into());
        self
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}

/// Settings for the connection flow.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Rescan-and-retry cycles after the first "not found".
    pub rescan_retries: u32,
    /// Pause before every rescan after the first one.
    pub rescan_delay: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            rescan_retries: defaults::RESCAN_RETRIES,
            rescan_delay: defaults::rescan_delay(),
        }
    }
}

impl ConnectorConfig {
    pub fn with_rescan_retries(mut self, retries: u32) -> Self {
        self.rescan_retries = retries;
        self
    }

    pub fn with_rescan_delay(mut self, delay: Duration) -> Self {
        self.rescan_delay = delay;
        self
    }
}
