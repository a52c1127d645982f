//! Constants for the `nmcli` command-line interface.
//!
//! These values correspond to the exit codes, field names and message
//! fragments that `nmcli` uses when reporting results.

/// `nmcli` exit status codes, as documented in `nmcli(1)`.
pub mod exit_code {
    // pub const SUCCESS: i32 = 0;
    // pub const UNKNOWN: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const TIMEOUT_EXPIRED: i32 = 3;
    pub const ACTIVATION_FAILED: i32 = 4;
    // pub const DEACTIVATION_FAILED: i32 = 5;
    // pub const DISCONNECT_FAILED: i32 = 6;
    // pub const DELETE_FAILED: i32 = 7;
    pub const NM_NOT_RUNNING: i32 = 8;
    pub const NOT_FOUND: i32 = 10;
}

/// Fragments of `nmcli` stderr used to classify failures.
pub mod stderr_markers {
    /// NetworkManager refuses a scan requested too soon after the last one.
    pub const SCANNING_NOT_ALLOWED: &str = "Scanning not allowed";
}

/// Connection profile field names.
pub mod fields {
    pub const GENERAL_STATE: &str = "GENERAL.STATE";
}

/// Connection profile naming conventions.
pub mod profile {
    /// Some distributions save Wi-Fi profiles as `Auto <ssid>`.
    pub const AUTO_PREFIX: &str = "Auto ";
}

/// Defaults for the `nmcli` adapter and the connector.
pub mod defaults {
    use std::time::Duration;

    pub const NMCLI_PROGRAM: &str = "nmcli";
    pub const SUDO_PROGRAM: &str = "sudo";
    pub const RESCAN_RETRIES: u32 = 1;
    pub const RESCAN_DELAY_SECONDS: u64 = 0;

    pub fn rescan_delay() -> Duration {
        Duration::from_secs(RESCAN_DELAY_SECONDS)
    }
}
