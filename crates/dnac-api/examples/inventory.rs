//! List the managed inventory and each device's reachability.
//!
//! ```sh
//! DNAC_HOST=dnac.example.com DNAC_USER=admin DNAC_PASSWORD=... \
//!     cargo run --example inventory
//! ```

use std::env;

use dnac_api::{ClusterVersion, Credentials, DnacClient, TransportConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnac_api=debug".into()),
        )
        .init();

    let host = env::var("DNAC_HOST")?;
    let user = env::var("DNAC_USER")?;
    let password = env::var("DNAC_PASSWORD")?;

    let client = DnacClient::new(
        DnacClient::cluster_url(Some(&host), None, 443)?,
        ClusterVersion::V1_3_1_4,
        Credentials::new(user, password),
        &TransportConfig::default(),
    )?;

    for device in client.list_devices().await? {
        println!(
            "{:<40} {:<16} {}",
            device.hostname.as_deref().unwrap_or("-"),
            device.management_ip_address.as_deref().unwrap_or("-"),
            device.reachability_status.as_deref().unwrap_or("unknown"),
        );
    }

    Ok(())
}
