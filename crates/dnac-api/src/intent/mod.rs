// Intent API endpoint modules
//
// Each file adds inherent methods to `DnacClient` for one resource
// family, wrapping the version-gated paths from `ClusterVersion` and the
// `{"response": ...}` envelope handling in `client.rs`.

pub mod archives;
pub mod clients;
pub mod command_runner;
pub mod devices;
pub mod models;
pub mod sites;
pub mod tasks;
pub mod templates;

use chrono::Utc;

/// Current time as epoch milliseconds, the format the assurance
/// endpoints expect in their `timestamp` query parameter.
pub(crate) fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}
