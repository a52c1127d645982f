//! Wi-Fi adapter capability consumed by the connector.

use async_trait::async_trait;

use crate::Result;
use crate::models::ConnectionDetails;

/// Operations needed to join a Wi-Fi network and verify the result.
///
/// [`NmcliAdapter`](crate::NmcliAdapter) implements this over the `nmcli`
/// command line tool. Tests can substitute a scripted implementation.
#[async_trait]
pub trait WifiAdapter: Send + Sync {
    /// Attempts to connect to `ssid`. An empty `password` means an open network.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ProfileNotFound` when no saved profile or
    /// visible access point matches the SSID.
    async fn connect(&self, ssid: &str, password: &str) -> Result<()>;

    /// Triggers a Wi-Fi scan, optionally probing for a specific SSID.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ScanRateLimited` when called too soon after a
    /// previous scan.
    async fn rescan(&self, ssid: Option<&str>) -> Result<()>;

    /// Returns the details of the saved profile named `id`.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ProfileNotFound` when no such profile is saved.
    async fn show_connection_details(&self, id: &str) -> Result<ConnectionDetails>;
}
