pub mod config;
pub mod file_lock;

use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use wifi_switcher::{ConnectorConfig, NetworkConnector, NmcliAdapter, NmcliConfig, WifiAdapter};

use crate::config::FileConfig;
use crate::file_lock::acquire_lock;

#[derive(Parser, Debug)]
#[command(name = "wifi-switcher")]
#[command(about = "Connect to a Wi-Fi network through NetworkManager's nmcli")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Run nmcli through sudo
    #[arg(long, global = true, overrides_with = "no_sudo")]
    sudo: bool,

    /// Run nmcli directly, even if the config file enables sudo
    #[arg(long, global = true, overrides_with = "sudo")]
    no_sudo: bool,

    /// Wireless interface to use
    #[arg(long, global = true)]
    ifname: Option<String>,

    /// Rescan-and-retry cycles when the network is not found
    #[arg(long, global = true)]
    rescan_retries: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect to a network and confirm it is activated
    Connect {
        ssid: String,

        /// Network password; leave empty for open networks
        #[arg(long, env = "WIFI_PASSWORD", default_value = "", hide_env_values = true)]
        password: String,
    },
    /// Trigger a Wi-Fi scan
    Rescan {
        /// Scan for a specific (possibly hidden) SSID
        #[arg(long)]
        ssid: Option<String>,
    },
    /// Print the details of a saved connection profile
    Show { id: String },
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Layers command-line flags over the file configuration.
fn resolve_config(args: &Args, file: &FileConfig) -> (NmcliConfig, ConnectorConfig) {
    let mut nmcli = file.nmcli_config();
    if args.sudo {
        nmcli = nmcli.with_sudo(true);
    } else if args.no_sudo {
        nmcli = nmcli.with_sudo(false);
    }
    if let Some(ifname) = &args.ifname {
        nmcli = nmcli.with_ifname(ifname.clone());
    }
    let mut connector = file.connector_config();
    if let Some(retries) = args.rescan_retries {
        connector = connector.with_rescan_retries(retries);
    }
    (nmcli, connector)
}

/// Runs the CLI. Returns whether the requested operation succeeded.
pub async fn run() -> anyhow::Result<bool> {
    let args = Args::parse();
    init_logging(args.debug);

    let file = FileConfig::load(args.config.as_deref())?;
    let (nmcli, connector_config) = resolve_config(&args, &file);
    debug!("nmcli: {nmcli:?}, connector: {connector_config:?}");

    let _lock = acquire_lock()?;
    let adapter = NmcliAdapter::with_config(nmcli);

    match args.command {
        Command::Connect { ssid, password } => {
            let connector = NetworkConnector::with_config(adapter, connector_config);
            let result = connector.connect_to_network(&ssid, &password).await;
            if result.successful {
                println!("{}", result.message);
            } else {
                eprintln!("{}", result.message);
            }
            Ok(result.successful)
        }
        Command::Rescan { ssid } => match adapter.rescan(ssid.as_deref()).await {
            Ok(()) => {
                println!("Scan requested");
                Ok(true)
            }
            Err(e) => {
                eprintln!("Scan failed: {e}");
                Ok(false)
            }
        },
        Command::Show { id } => match adapter.show_connection_details(&id).await {
            Ok(details) => {
                println!("{id}: {}", details.activation_state());
                for (key, value) in details.iter_sorted() {
                    println!("{key:40} {value}");
                }
                Ok(true)
            }
            Err(e) => {
                eprintln!("Cannot show {id}: {e}");
                Ok(false)
            }
        },
    }
}
