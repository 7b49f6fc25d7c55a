// Network-device inventory endpoints
//
// Read access to the managed-device inventory: listing, filtered lookup
// by hostname/IP (exact or wildcard), VLAN sub-resources, and the
// assurance device-detail search.

use tracing::debug;
use url::Url;

use crate::client::DnacClient;
use crate::error::Error;
use crate::intent::epoch_millis;
use crate::intent::models::{DeviceDetail, DeviceVlan, NetworkDevice};

/// `searchBy` identifier values accepted by the device-detail endpoint.
const IDENTIFIER_MAC: &str = "macAddress";
const IDENTIFIER_UUID: &str = "uuid";
const IDENTIFIER_NAME: &str = "nwDeviceName";

impl DnacClient {
    fn network_device_url(&self, suffix: &str) -> Result<Url, Error> {
        let path = self.version().network_device_path();
        self.url(&format!("{path}{suffix}"))
    }

    fn device_detail_url(&self) -> Result<Url, Error> {
        let path = self
            .version()
            .device_detail_path()
            .ok_or(Error::UnsupportedVersion {
                version: self.version(),
                resource: "device-detail",
            })?;
        self.url(path)
    }

    /// List every device in the managed inventory.
    ///
    /// `GET /dna/intent/api/v1/network-device`
    pub async fn list_devices(&self) -> Result<Vec<NetworkDevice>, Error> {
        let url = self.network_device_url("")?;
        debug!("listing network devices");
        self.get_enveloped(url).await
    }

    /// Get a single device by its UUID.
    ///
    /// `GET /dna/intent/api/v1/network-device/{id}`
    pub async fn get_device(&self, id: &str) -> Result<NetworkDevice, Error> {
        let url = self.network_device_url(&format!("/{id}"))?;
        self.get_enveloped(url).await
    }

    /// Get a single device by its exact hostname.
    ///
    /// Uses the inventory's `?hostname=` filter. An empty result maps to
    /// [`Error::NotFound`] -- check the hostname.
    pub async fn get_device_by_hostname(&self, hostname: &str) -> Result<NetworkDevice, Error> {
        let matches = self.find_devices_by_hostname(hostname).await?;
        matches.into_iter().next().ok_or_else(|| Error::NotFound {
            what: format!("device with hostname {hostname}"),
        })
    }

    /// Find devices whose hostname matches the given pattern.
    ///
    /// The inventory filter accepts regular expressions, so
    /// `".*9300.*"` returns every matching switch. An empty result maps
    /// to [`Error::NotFound`].
    pub async fn find_devices_by_hostname(
        &self,
        pattern: &str,
    ) -> Result<Vec<NetworkDevice>, Error> {
        let url = self.network_device_url("")?;
        debug!(pattern, "searching devices by hostname");
        let devices: Vec<NetworkDevice> = self
            .get_enveloped_with_params(url, &[("hostname", pattern.to_owned())])
            .await?;
        if devices.is_empty() {
            return Err(Error::NotFound {
                what: format!("device with hostname {pattern}"),
            });
        }
        Ok(devices)
    }

    /// Get a single device by its exact management IP address.
    pub async fn get_device_by_ip(&self, ip: &str) -> Result<NetworkDevice, Error> {
        let matches = self.find_devices_by_ip(ip).await?;
        matches.into_iter().next().ok_or_else(|| Error::NotFound {
            what: format!("device with management IP {ip}"),
        })
    }

    /// Find devices whose management IP matches the given pattern.
    ///
    /// As with hostnames, the filter accepts regular expressions
    /// (`"192\\.168\\..*"`). An empty result maps to [`Error::NotFound`].
    pub async fn find_devices_by_ip(&self, pattern: &str) -> Result<Vec<NetworkDevice>, Error> {
        let url = self.network_device_url("")?;
        debug!(pattern, "searching devices by management IP");
        let devices: Vec<NetworkDevice> = self
            .get_enveloped_with_params(url, &[("managementIpAddress", pattern.to_owned())])
            .await?;
        if devices.is_empty() {
            return Err(Error::NotFound {
                what: format!("device with management IP {pattern}"),
            });
        }
        Ok(devices)
    }

    /// Resolve a hostname to the device's UUID.
    pub async fn device_id_for_hostname(&self, hostname: &str) -> Result<String, Error> {
        Ok(self.get_device_by_hostname(hostname).await?.id)
    }

    /// List the VLANs configured on a device.
    ///
    /// `GET /dna/intent/api/v1/network-device/{id}/vlan`
    pub async fn list_device_vlans(&self, id: &str) -> Result<Vec<DeviceVlan>, Error> {
        let url = self.network_device_url(&format!("/{id}/vlan"))?;
        debug!(id, "listing device VLANs");
        self.get_enveloped(url).await
    }

    /// List the VLANs on a device found by hostname.
    pub async fn list_device_vlans_by_hostname(
        &self,
        hostname: &str,
    ) -> Result<Vec<DeviceVlan>, Error> {
        let id = self.device_id_for_hostname(hostname).await?;
        self.list_device_vlans(&id).await
    }

    /// List the VLANs on a device found by management IP.
    pub async fn list_device_vlans_by_ip(&self, ip: &str) -> Result<Vec<DeviceVlan>, Error> {
        let device = self.get_device_by_ip(ip).await?;
        self.list_device_vlans(&device.id).await
    }

    /// Assurance detail for a device found by hostname.
    pub async fn get_device_detail_by_hostname(
        &self,
        hostname: &str,
    ) -> Result<DeviceDetail, Error> {
        self.device_detail(hostname, IDENTIFIER_NAME).await
    }

    /// Assurance detail for a device found by MAC address.
    pub async fn get_device_detail_by_mac(&self, mac: &str) -> Result<DeviceDetail, Error> {
        self.device_detail(mac, IDENTIFIER_MAC).await
    }

    /// Assurance detail for a device found by UUID.
    pub async fn get_device_detail(&self, id: &str) -> Result<DeviceDetail, Error> {
        self.device_detail(id, IDENTIFIER_UUID).await
    }

    /// `GET /dna/intent/api/v1/device-detail?timestamp=&searchBy=&identifier=`
    async fn device_detail(
        &self,
        search_by: &str,
        identifier: &'static str,
    ) -> Result<DeviceDetail, Error> {
        let url = self.device_detail_url()?;
        debug!(search_by, identifier, "fetching device detail");
        self.get_enveloped_with_params(
            url,
            &[
                ("timestamp", epoch_millis().to_string()),
                ("searchBy", search_by.to_owned()),
                ("identifier", identifier.to_owned()),
            ],
        )
        .await
    }
}
