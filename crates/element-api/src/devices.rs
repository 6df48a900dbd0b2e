// Device endpoints.

use tracing::debug;

use crate::client::{deserialize_body, ElementClient};
use crate::error::Error;
use crate::models::Device;

impl ElementClient {
    /// List all devices in `folder`.
    ///
    /// `GET /tags/{folder}/devices` -- paginated, followed to exhaustion.
    pub async fn devices(&self, folder: &str) -> Result<Vec<Device>, Error> {
        let route = format!("tags/{folder}/devices");
        self.fetch_collection(&route, &[], None).await
    }

    /// Hexadecimal addresses of all devices in `folder`.
    ///
    /// Projection of [`devices`](Self::devices).
    pub async fn device_addresses(&self, folder: &str) -> Result<Vec<String>, Error> {
        let devices = self.devices(folder).await?;
        Ok(devices.into_iter().map(|d| d.name).collect())
    }

    /// Fetch a single device by its hexadecimal address.
    ///
    /// `GET /devices/{address}` -- a single record, no pagination. The
    /// address is lowercased at this boundary; everywhere else addresses
    /// are handled exactly as the API returns them.
    pub async fn device(&self, address: &str) -> Result<Device, Error> {
        let route = format!("devices/{}", address.to_lowercase());
        debug!(address, "fetching device");
        let envelope = self.fetch(&route, &[], None).await?;
        deserialize_body::<Device>(envelope.body)
    }
}
