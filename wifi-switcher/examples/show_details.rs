use wifi_switcher::{NmcliAdapter, WifiAdapter};

#[tokio::main]
async fn main() -> wifi_switcher::Result<()> {
    let id = std::env::args().nth(1).unwrap_or_else(|| "MyNetwork".to_string());

    let adapter = NmcliAdapter::new();
    let details = adapter.show_connection_details(&id).await?;

    println!("{id}: {}", details.activation_state());
    for (key, value) in details.iter_sorted() {
        println!("{key:40} {value}");
    }

    Ok(())
}
