//! Run a CLI command on a device and print the output.
//!
//! ```sh
//! DNAC_HOST=... DNAC_USER=... DNAC_PASSWORD=... \
//!     cargo run --example run_command -- sw1.example.com "show version"
//! ```

use std::env;

use dnac_api::{
    ClusterVersion, CommandBatch, Credentials, DnacClient, PollPolicy, TransportConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnac_api=debug".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let hostname = args.next().ok_or("usage: run_command <hostname> <cli>")?;
    let command = args.next().unwrap_or_else(|| "show version".into());

    let host = env::var("DNAC_HOST")?;
    let user = env::var("DNAC_USER")?;
    let password = env::var("DNAC_PASSWORD")?;

    let client = DnacClient::new(
        DnacClient::cluster_url(Some(&host), None, 443)?,
        ClusterVersion::V1_3_1_4,
        Credentials::new(user, password),
        &TransportConfig::default(),
    )?;

    let device_id = client.device_id_for_hostname(&hostname).await?;
    let batch = CommandBatch::single(&command, device_id);

    let outputs = client
        .run_commands_sync(&batch, &PollPolicy::default())
        .await?;

    for output in outputs {
        println!("── {} ──", output.device_uuid);
        for (cmd, text) in &output.command_responses.success {
            println!("$ {cmd}\n{text}");
        }
        for (cmd, text) in &output.command_responses.failure {
            eprintln!("failed: {cmd}: {text}");
        }
    }

    Ok(())
}
