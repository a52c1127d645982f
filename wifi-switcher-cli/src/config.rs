use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use wifi_switcher::{ConnectorConfig, NmcliConfig};

/// Contents of `config.toml`. Every field is optional.
///
/// ```toml
/// [nmcli]
/// use_sudo = false
/// ifname = "wlan0"
/// wait_secs = 30
/// command_timeout_secs = 60
///
/// [connector]
/// rescan_retries = 1
/// rescan_delay_secs = 0
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub nmcli: NmcliSection,
    pub connector: ConnectorSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NmcliSection {
    pub program: Option<String>,
    pub use_sudo: bool,
    pub ifname: Option<String>,
    pub wait_secs: Option<u64>,
    pub command_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorSection {
    pub rescan_retries: Option<u32>,
    pub rescan_delay_secs: Option<u64>,
}

/// `$XDG_CONFIG_HOME/wifi-switcher/config.toml`, if a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("wifi-switcher");
        path.push("config.toml");
        path
    })
}

impl FileConfig {
    /// Loads the config file.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            return Self::parse(&content)
                .with_context(|| format!("Invalid config {}", path.display()));
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content)
                .with_context(|| format!("Invalid config {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config {}", path.display()))
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn nmcli_config(&self) -> NmcliConfig {
        let section = &self.nmcli;
        let mut config = NmcliConfig::default().with_sudo(section.use_sudo);
        if let Some(program) = &section.program {
            config = config.with_program(program.clone());
        }
        if let Some(ifname) = &section.ifname {
            config = config.with_ifname(ifname.clone());
        }
        if let Some(secs) = section.wait_secs {
            config = config.with_wait(Duration::from_secs(secs));
        }
        if let Some(secs) = section.command_timeout_secs {
            config = config.with_command_timeout(Duration::from_secs(secs));
        }
        config
    }

    pub fn connector_config(&self) -> ConnectorConfig {
        let section = &self.connector;
        let mut config = ConnectorConfig::default();
        if let Some(retries) = section.rescan_retries {
            config = config.with_rescan_retries(retries);
        }
        if let Some(secs) = section.rescan_delay_secs {
            config = config.with_rescan_delay(Duration::from_secs(secs));
        }
        config
    }
}
