//! A Rust library for joining Wi-Fi networks through NetworkManager's `nmcli`.
//!
//! The crate wraps a single, opinionated connection flow:
//!
//! - Ask `nmcli` to connect to the SSID with the given password
//! - If no profile or access point matches, rescan and try once more
//! - Confirm the result by reading the saved profile's `GENERAL.STATE`
//!
//! # Example
//!
//! ```no_run
//! # async fn example() {
//! let result = wifi_switcher::connect_to_network("MyNetwork", "password123").await;
//! if result.successful {
//!     println!("{}", result.message);
//! } else {
//!     eprintln!("{}", result.message);
//! }
//! # }
//! ```
//!
//! # Error Handling
//!
//! Adapter operations return `Result<T, AdapterError>`. The connector itself
//! never fails: every adapter error is folded into a [`ConnectionOutcome`]
//! carried by the returned [`ConnectionResult`].
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod constants;
mod utils;

// Public API modules
pub mod adapter;
pub mod command;
pub mod connector;
pub mod models;
pub mod nmcli;

// Re-exported public API
pub use adapter::WifiAdapter;
pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use connector::NetworkConnector;
pub use models::{
    ActivationState, AdapterError, ConnectionDetails, ConnectionOutcome, ConnectionRequest,
    ConnectionResult, ConnectorConfig, NmcliConfig,
};
pub use nmcli::NmcliAdapter;

/// A specialized `Result` type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Connects to a Wi-Fi network using `nmcli` with default settings.
///
/// Builds a [`NetworkConnector`] over an [`NmcliAdapter`] that does not use
/// `sudo`, and performs one connection attempt (with a single rescan if the
/// network is not known yet).
pub async fn connect_to_network(ssid: &str, password: &str) -> ConnectionResult {
    NetworkConnector::new(NmcliAdapter::new())
        .connect_to_network(ssid, password)
        .await
}
