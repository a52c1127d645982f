use wifi_switcher::{ConnectorConfig, NetworkConnector, NmcliConfig};

#[tokio::main]
async fn main() {
    let ssid = std::env::args().nth(1).unwrap_or_else(|| "MyNetwork".to_string());
    let password = std::env::var("WIFI_PASSWORD").unwrap_or_default();

    let connector = NetworkConnector::nmcli(NmcliConfig::default(), ConnectorConfig::default());

    println!("Connecting to {ssid}...");
    let (successful, message): (bool, String) =
        connector.connect_to_network(&ssid, &password).await.into();

    println!("{message}");
    if !successful {
        std::process::exit(1);
    }
}
