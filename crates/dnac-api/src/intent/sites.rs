// Site health endpoints
//
// Site health is an assurance read: the listing covers every site the
// cluster knows about, and per-site lookup is a client-side filter over
// that listing (the cluster publishes no by-name endpoint).

use tracing::debug;
use url::Url;

use crate::client::DnacClient;
use crate::error::Error;
use crate::intent::epoch_millis;
use crate::intent::models::SiteHealth;

impl DnacClient {
    fn site_health_url(&self) -> Result<Url, Error> {
        let path = self
            .version()
            .site_health_path()
            .ok_or(Error::UnsupportedVersion {
                version: self.version(),
                resource: "site-health",
            })?;
        self.url(path)
    }

    /// Health details for every site.
    ///
    /// `GET /dna/intent/api/v1/site-health?timestamp=<epoch millis>`
    pub async fn site_health(&self) -> Result<Vec<SiteHealth>, Error> {
        let url = self.site_health_url()?;
        debug!("fetching site health");
        self.get_enveloped_with_params(url, &[("timestamp", epoch_millis().to_string())])
            .await
    }

    /// Health details for the named site.
    ///
    /// A site missing from the listing maps to [`Error::NotFound`] --
    /// check the name against the network hierarchy.
    pub async fn site_health_by_name(&self, site_name: &str) -> Result<SiteHealth, Error> {
        let sites = self.site_health().await?;
        sites
            .into_iter()
            .find(|s| s.site_name == site_name)
            .ok_or_else(|| Error::NotFound {
                what: format!("site {site_name}"),
            })
    }
}
