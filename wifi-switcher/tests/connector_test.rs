//! Tests for the connection attempt flow.
//!
//! These tests drive `NetworkConnector` with a scripted adapter so every
//! branch (rescan, rate limiting, profile lookup, activation state) can be
//! exercised without NetworkManager.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use wifi_switcher::{
    AdapterError, ConnectionDetails, ConnectionOutcome, ConnectionRequest, ConnectorConfig,
    NetworkConnector, WifiAdapter,
};

/// Adapter whose answers are queued up front.
///
/// `connect` and `rescan` pop their next result (defaulting to `Ok`), and
/// `show_connection_details` answers from a map of saved profiles.
#[derive(Default)]
struct ScriptedAdapter {
    connects: Mutex<VecDeque<Result<(), AdapterError>>>,
    rescans: Mutex<VecDeque<Result<(), AdapterError>>>,
    profiles: HashMap<String, ConnectionDetails>,
    show_errors: HashMap<String, fn() -> AdapterError>,
    log: Mutex<Vec<String>>,
}

impl ScriptedAdapter {
    fn new() -> Self {
        Self::default()
    }

    fn connect_results(self, results: Vec<Result<(), AdapterError>>) -> Self {
        *self.connects.lock().unwrap() = results.into();
        self
    }

    fn rescan_results(self, results: Vec<Result<(), AdapterError>>) -> Self {
        *self.rescans.lock().unwrap() = results.into();
        self
    }

    fn profile(mut self, id: &str, state: Option<&str>) -> Self {
        let mut fields = vec![("connection.id".to_string(), id.to_string())];
        if let Some(state) = state {
            fields.push(("GENERAL.STATE".to_string(), state.to_string()));
        }
        self.profiles
            .insert(id.to_string(), fields.into_iter().collect());
        self
    }

    fn failing_show(mut self, id: &str, err: fn() -> AdapterError) -> Self {
        self.show_errors.insert(id.to_string(), err);
        self
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn count(&self, op: &str) -> usize {
        self.log().iter().filter(|entry| entry.starts_with(op)).count()
    }
}

fn not_found() -> AdapterError {
    AdapterError::ProfileNotFound("No network with SSID found.".into())
}

#[async_trait]
impl WifiAdapter for ScriptedAdapter {
    async fn connect(&self, ssid: &str, _password: &str) -> wifi_switcher::Result<()> {
        self.log.lock().unwrap().push(format!("connect {ssid}"));
        self.connects.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn rescan(&self, ssid: Option<&str>) -> wifi_switcher::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("rescan {}", ssid.unwrap_or("*")));
        self.rescans.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn show_connection_details(&self, id: &str) -> wifi_switcher::Result<ConnectionDetails> {
        self.log.lock().unwrap().push(format!("show {id}"));
        if let Some(err) = self.show_errors.get(id) {
            return Err(err());
        }
        self.profiles.get(id).cloned().ok_or_else(|| {
            AdapterError::ProfileNotFound(format!("{id} - no such connection profile."))
        })
    }
}

#[tokio::test]
async fn connects_on_first_try_when_profile_is_activated() {
    let adapter = ScriptedAdapter::new().profile("Home", Some("activated"));
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Home", "hunter22").await;

    assert!(result.successful);
    assert_eq!(result.outcome, ConnectionOutcome::Connected);
    assert_eq!(
        result.message,
        "Connected successfully to network with SSID Home"
    );
    assert_eq!(connector.adapter().log(), vec!["connect Home", "show Home"]);
}

#[tokio::test]
async fn rescans_and_retries_when_network_is_unknown() {
    let adapter = ScriptedAdapter::new()
        .connect_results(vec![Err(not_found()), Ok(())])
        .profile("Cafe", Some("activated"));
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Cafe", "latte123").await;

    assert!(result.successful);
    assert_eq!(
        connector.adapter().log(),
        vec!["connect Cafe", "rescan Cafe", "connect Cafe", "show Cafe"]
    );
}

#[tokio::test]
async fn reports_not_found_after_rescan() {
    let adapter = ScriptedAdapter::new().connect_results(vec![
        Err(not_found()),
        Err(not_found()),
    ]);
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Nowhere", "password1").await;

    assert!(!result.successful);
    assert_eq!(result.outcome, ConnectionOutcome::NotFoundAfterRescan);
    assert!(result.message.contains("not found after rescan"));
    assert_eq!(connector.adapter().count("rescan"), 1);
    assert_eq!(connector.adapter().count("show"), 0);
}

#[tokio::test]
async fn rate_limited_rescan_skips_second_connect() {
    let adapter = ScriptedAdapter::new()
        .connect_results(vec![Err(not_found())])
        .rescan_results(vec![Err(AdapterError::ScanRateLimited)]);
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Cafe", "latte123").await;

    assert!(!result.successful);
    assert_eq!(result.outcome, ConnectionOutcome::ScanRateLimited);
    assert!(result.message.contains("retry in ~30s"));
    assert_eq!(connector.adapter().count("connect"), 1);
    assert_eq!(connector.adapter().count("show"), 0);
}

#[tokio::test]
async fn falls_back_to_auto_prefixed_profile() {
    let adapter = ScriptedAdapter::new().profile("Auto Office", Some("activated"));
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Office", "s3cretpass").await;

    assert!(result.successful);
    assert_eq!(
        connector.adapter().log(),
        vec!["connect Office", "show Office", "show Auto Office"]
    );
}

#[tokio::test]
async fn unconfirmed_without_saved_profile() {
    let connector = NetworkConnector::new(ScriptedAdapter::new());

    let result = connector.connect_to_network("Home", "hunter22").await;

    assert!(!result.successful);
    assert_eq!(result.outcome, ConnectionOutcome::Unconfirmed);
    assert!(result.message.contains("cannot confirm"));
    assert_eq!(
        connector.adapter().log(),
        vec!["connect Home", "show Home", "show Auto Home"]
    );
}

#[tokio::test]
async fn inactive_profile_is_timeout_or_unknown() {
    let adapter = ScriptedAdapter::new().profile("Home", Some("activating"));
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Home", "hunter22").await;

    assert!(!result.successful);
    assert_eq!(result.outcome, ConnectionOutcome::TimeoutOrUnknown);
    assert!(result.message.contains("likely timeout"));
}

#[tokio::test]
async fn profile_without_state_is_timeout_or_unknown() {
    let adapter = ScriptedAdapter::new().profile("Home", None);
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Home", "hunter22").await;

    assert_eq!(result.outcome, ConnectionOutcome::TimeoutOrUnknown);
}

#[tokio::test]
async fn unexpected_connect_error_becomes_adapter_failure() {
    let adapter = ScriptedAdapter::new().connect_results(vec![Err(
        AdapterError::ActivationFailed("Secrets were required".into()),
    )]);
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Home", "wrongpass").await;

    assert!(!result.successful);
    assert!(matches!(result.outcome, ConnectionOutcome::AdapterFailure(_)));
    assert!(result.message.contains("Secrets were required"));
    assert_eq!(connector.adapter().log(), vec!["connect Home"]);
}

#[tokio::test]
async fn unexpected_show_error_becomes_adapter_failure() {
    let adapter = ScriptedAdapter::new().failing_show("Home", || AdapterError::NetworkManagerNotRunning);
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Home", "hunter22").await;

    assert_eq!(
        result.outcome,
        ConnectionOutcome::AdapterFailure("NetworkManager is not running".into())
    );
    assert_eq!(connector.adapter().count("show"), 1);
}

#[tokio::test]
async fn configurable_retries_rescan_more_than_once() {
    let adapter = ScriptedAdapter::new()
        .connect_results(vec![
            Err(not_found()),
            Err(not_found()),
            Ok(()),
        ])
        .profile("Cabin", Some("activated"));
    let config = ConnectorConfig::default()
        .with_rescan_retries(3)
        .with_rescan_delay(Duration::from_millis(1));
    let connector = NetworkConnector::with_config(adapter, config);

    let result = connector.connect_to_network("Cabin", "woodstove").await;

    assert!(result.successful);
    assert_eq!(connector.adapter().count("rescan"), 2);
    assert_eq!(connector.adapter().count("connect"), 3);
}

#[tokio::test]
async fn retries_exhausted_reports_not_found() {
    let adapter = ScriptedAdapter::new().connect_results(vec![
        Err(not_found()),
        Err(not_found()),
        Err(not_found()),
    ]);
    let connector =
        NetworkConnector::with_config(adapter, ConnectorConfig::default().with_rescan_retries(2));

    let result = connector.connect_to_network("Nowhere", "password1").await;

    assert_eq!(result.outcome, ConnectionOutcome::NotFoundAfterRescan);
    assert_eq!(connector.adapter().count("rescan"), 2);
}

#[tokio::test]
async fn repeated_attempts_give_the_same_result() {
    let adapter = ScriptedAdapter::new().profile("Home", Some("activated"));
    let connector = NetworkConnector::new(adapter);
    let request = ConnectionRequest::new("Home", "hunter22");

    let first = connector.connect(&request).await;
    let second = connector.connect(&request).await;

    assert!(first.successful);
    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_rescan_reports_scan_failure_with_reason() {
    let adapter = ScriptedAdapter::new()
        .connect_results(vec![Err(not_found())])
        .rescan_results(vec![Err(AdapterError::ProfileNotFound(
            "Device 'wlan9' not found.".into(),
        ))]);
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Cafe", "latte123").await;

    assert!(!result.successful);
    assert_eq!(
        result.outcome,
        ConnectionOutcome::AdapterFailure("scan failed: not found: Device 'wlan9' not found.".into())
    );
    assert!(result.message.contains("Device 'wlan9' not found."));
    assert_eq!(connector.adapter().count("connect"), 1);
    assert_eq!(connector.adapter().count("show"), 0);
}

#[tokio::test]
async fn alias_lookup_error_becomes_adapter_failure() {
    let adapter = ScriptedAdapter::new().failing_show("Auto Home", || AdapterError::Timeout);
    let connector = NetworkConnector::new(adapter);

    let result = connector.connect_to_network("Home", "hunter22").await;

    assert_eq!(
        result.outcome,
        ConnectionOutcome::AdapterFailure("operation timed out".into())
    );
    assert_eq!(
        connector.adapter().log(),
        vec!["connect Home", "show Home", "show Auto Home"]
    );
}

#[tokio::test]
async fn zero_retries_skips_rescan() {
    let adapter = ScriptedAdapter::new().connect_results(vec![Err(not_found())]);
    let connector =
        NetworkConnector::with_config(adapter, ConnectorConfig::default().with_rescan_retries(0));

    let result = connector.connect_to_network("Nowhere", "password1").await;

    assert_eq!(result.outcome, ConnectionOutcome::NotFound);
    assert!(result.message.contains("rescanning is disabled"));
    assert_eq!(connector.adapter().log(), vec!["connect Nowhere"]);
}
