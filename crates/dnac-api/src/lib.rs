// dnac-api: Async Rust client for the Cisco DNA Center intent and system APIs

pub mod auth;
pub mod client;
pub mod error;
pub mod intent;
pub mod poll;
pub mod transport;

pub use auth::{ClusterVersion, Credentials};
pub use client::DnacClient;
pub use error::Error;
pub use intent::archives::ArchiveSelection;
pub use intent::command_runner::CommandBatch;
pub use intent::templates::DeployRequest;
pub use poll::PollPolicy;
pub use transport::{TlsMode, TransportConfig};
