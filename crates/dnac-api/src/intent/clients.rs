// Client (endpoint host) detail
//
// One assurance read keyed by MAC address. The null and broadcast MACs
// are rejected before any HTTP is issued -- the cluster answers them
// with confusing empty payloads.

use tracing::debug;
use url::Url;

use crate::client::DnacClient;
use crate::error::Error;
use crate::intent::epoch_millis;
use crate::intent::models::ClientDetail;

const NULL_MAC: &str = "00:00:00:00:00:00";
const BCAST_MAC: &str = "ff:ff:ff:ff:ff:ff";

impl DnacClient {
    fn client_detail_url(&self) -> Result<Url, Error> {
        let path = self
            .version()
            .client_detail_path()
            .ok_or(Error::UnsupportedVersion {
                version: self.version(),
                resource: "client-detail",
            })?;
        self.url(path)
    }

    /// Assurance detail for the client with the given MAC address.
    ///
    /// `GET /dna/intent/api/v1/client-detail?timestamp=&macAddress=`.
    /// The response is bare JSON (no `response` envelope).
    pub async fn client_detail(&self, mac: &str) -> Result<ClientDetail, Error> {
        let normalized = mac.to_lowercase();
        if normalized == NULL_MAC || normalized == BCAST_MAC {
            return Err(Error::InvalidMac {
                mac: mac.to_owned(),
            });
        }

        let url = self.client_detail_url()?;
        debug!(mac, "fetching client detail");
        self.get_with_params(
            url,
            &[
                ("timestamp", epoch_millis().to_string()),
                ("macAddress", mac.to_owned()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_macs_are_normalized_before_comparison() {
        // The guard is case-insensitive; both spellings must be caught.
        for mac in ["FF:FF:FF:FF:FF:FF", "ff:ff:ff:ff:ff:ff"] {
            assert_eq!(mac.to_lowercase(), BCAST_MAC);
        }
        assert_eq!(NULL_MAC.to_lowercase(), NULL_MAC);
    }
}
