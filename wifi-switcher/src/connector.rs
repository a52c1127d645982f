//! Wi-Fi connection attempt orchestration.
//!
//! `nmcli device wifi connect` can exit successfully even though the link
//! never comes up, and it fails outright for networks missing from its scan
//! cache. The connector handles both: it rescans and retries when the network
//! is unknown, then reads the saved profile back to confirm activation.

use futures_timer::Delay;
use log::{debug, info, warn};

use crate::adapter::WifiAdapter;
use crate::constants::profile;
use crate::models::{
    AdapterError, ConnectionDetails, ConnectionOutcome, ConnectionRequest, ConnectionResult,
    ConnectorConfig, NmcliConfig,
};
use crate::nmcli::NmcliAdapter;

/// Runs connection attempts against a [`WifiAdapter`].
///
/// Every attempt produces a [`ConnectionResult`]; adapter failures are
/// reported through [`ConnectionOutcome`] instead of being returned as errors.
#[derive(Debug, Clone)]
pub struct NetworkConnector<A> {
    adapter: A,
    config: ConnectorConfig,
}

impl NetworkConnector<NmcliAdapter> {
    /// Creates a connector backed by `nmcli` on this host.
    pub fn nmcli(nmcli: NmcliConfig, config: ConnectorConfig) -> Self {
        Self::with_config(NmcliAdapter::with_config(nmcli), config)
    }
}

impl<A: WifiAdapter> NetworkConnector<A> {
    /// Creates a connector with the default configuration (one rescan).
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, ConnectorConfig::default())
    }

    pub fn with_config(adapter: A, config: ConnectorConfig) -> Self {
        Self { adapter, config }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Connects to `ssid` and reports whether the connection is active.
    ///
    /// The flow:
    /// 1. Ask the adapter to connect
    /// 2. If the network is unknown, rescan and connect again, up to
    ///    `rescan_retries` times
    /// 3. Load the saved profile (`<ssid>`, then `Auto <ssid>`)
    /// 4. Succeed only if its activation state is `activated`
    pub async fn connect_to_network(&self, ssid: &str, password: &str) -> ConnectionResult {
        info!("Attempting to connect to network with SSID {ssid}");
        let outcome = self.attempt(ssid, password).await;
        match &outcome {
            ConnectionOutcome::Connected => {
                info!("Connected successfully to network with SSID {ssid}")
            }
            other => warn!("Connection to SSID {ssid} did not succeed: {other:?}"),
        }
        ConnectionResult::new(ssid, outcome)
    }

    /// Same as [`connect_to_network`](Self::connect_to_network) for a request value.
    pub async fn connect(&self, request: &ConnectionRequest) -> ConnectionResult {
        self.connect_to_network(&request.ssid, &request.password)
            .await
    }

    async fn attempt(&self, ssid: &str, password: &str) -> ConnectionOutcome {
        match self.adapter.connect(ssid, password).await {
            Ok(()) => {}
            Err(AdapterError::ProfileNotFound(_)) => {
                debug!("No profile or access point for {ssid}, rescanning");
                if let Some(outcome) = self.rescan_and_retry(ssid, password).await {
                    return outcome;
                }
            }
            Err(e) => return ConnectionOutcome::AdapterFailure(e.to_string()),
        }

        self.verify(ssid).await
    }

    /// Returns `None` once a retried connect succeeds, or the final outcome.
    async fn rescan_and_retry(&self, ssid: &str, password: &str) -> Option<ConnectionOutcome> {
        for cycle in 0..self.config.rescan_retries {
            if cycle > 0 && !self.config.rescan_delay.is_zero() {
                debug!("Waiting {:?} before rescanning again", self.config.rescan_delay);
                Delay::new(self.config.rescan_delay).await;
            }

            match self.adapter.rescan(Some(ssid)).await {
                Ok(()) => {}
                Err(AdapterError::ScanRateLimited) => {
                    warn!("Not allowed to scan immediately after another scan");
                    return Some(ConnectionOutcome::ScanRateLimited);
                }
                Err(e) => {
                    warn!("Rescan for {ssid} failed: {e}");
                    return Some(ConnectionOutcome::AdapterFailure(format!("scan failed: {e}")));
                }
            }

            debug!(
                "Scan {} of {} complete, connecting again",
                cycle + 1,
                self.config.rescan_retries
            );
            match self.adapter.connect(ssid, password).await {
                Ok(()) => return None,
                Err(AdapterError::ProfileNotFound(_)) => {
                    debug!("{ssid} still not found after rescan {}", cycle + 1);
                }
                Err(e) => return Some(ConnectionOutcome::AdapterFailure(e.to_string())),
            }
        }

        if self.config.rescan_retries == 0 {
            warn!("Network {ssid} not found and rescanning is disabled");
            return Some(ConnectionOutcome::NotFound);
        }
        warn!("Network {ssid} still not found after rescanning, check the SSID");
        Some(ConnectionOutcome::NotFoundAfterRescan)
    }

    /// Confirms the connection by reading back the saved profile.
    async fn verify(&self, ssid: &str) -> ConnectionOutcome {
        let details = match self.saved_profile(ssid).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                warn!("SSID {ssid} has no saved connection, cannot confirm its status");
                return ConnectionOutcome::Unconfirmed;
            }
            Err(e) => return ConnectionOutcome::AdapterFailure(e.to_string()),
        };

        let state = details.activation_state();
        debug!("Saved profile for {ssid} is {state}");
        if details.is_activated() {
            ConnectionOutcome::Connected
        } else {
            ConnectionOutcome::TimeoutOrUnknown
        }
    }

    /// Looks the profile up by SSID, then by its `Auto <ssid>` alias.
    async fn saved_profile(&self, ssid: &str) -> crate::Result<Option<ConnectionDetails>> {
        match self.adapter.show_connection_details(ssid).await {
            Ok(details) => return Ok(Some(details)),
            Err(AdapterError::ProfileNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let alias = format!("{}{ssid}", profile::AUTO_PREFIX);
        debug!("No profile named {ssid}, trying '{alias}'");
        match self.adapter.show_connection_details(&alias).await {
            Ok(details) => Ok(Some(details)),
            Err(AdapterError::ProfileNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
