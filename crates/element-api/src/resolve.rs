// Identifier resolution between the two device id spaces.
//
// The Elements platform identifies a device by its hexadecimal address. The
// vendor serial number ("decentlab id") that shows up in reading payloads is
// not a queryable identifier: it appears only at one metadata path and
// inside reading data. The two operations here reconcile the spaces through
// the per-client cache, falling back to the API on a miss.

use tracing::debug;

use crate::client::ElementClient;
use crate::error::Error;
use crate::models::ReadingsQuery;

impl ElementClient {
    /// Resolve a hexadecimal address (e.g. `DEC0054B0`) to its decentlab id
    /// (e.g. `21680`) within `folder`.
    ///
    /// Cache hit: answered without network I/O. Cache miss: one single
    /// device fetch, the serial number is read from
    /// `fields.gerateinformation.seriennummer` and the mapping is cached.
    /// A device record without that path is [`Error::MissingField`].
    pub async fn decentlab_id_from_address(
        &mut self,
        address: &str,
        folder: &str,
    ) -> Result<u64, Error> {
        if let Some(decentlab_id) = self.cache.decentlab_id(folder, address) {
            debug!(address, folder, decentlab_id, "cache hit");
            return Ok(decentlab_id);
        }

        let device = self.device(address).await?;
        let decentlab_id = device.decentlab_id()?;
        // address cached as passed in, not lowercased
        self.cache.insert(folder, decentlab_id, address.to_owned());
        debug!(address, folder, decentlab_id, "cached mapping from device metadata");
        Ok(decentlab_id)
    }

    /// Resolve a decentlab id (e.g. `21680`) to the hexadecimal address
    /// (e.g. `DEC0054B0`) of the device carrying it in `folder`.
    ///
    /// There is no bulk endpoint for this direction, so a cache miss is
    /// expensive: the folder's full device list is fetched and every device
    /// whose id is not yet cached is probed with a one-reading, one-page
    /// fetch until the requested id turns up. Each discovered mapping is
    /// cached immediately, so even an unsuccessful scan speeds up later
    /// calls. Expect the first resolution per folder to be slow --
    /// O(uncached devices) requests -- and subsequent ones cheap.
    ///
    /// Returns [`Error::UnknownDecentlabId`] once every device in the
    /// folder has been probed without a match.
    pub async fn address_from_decentlab_id(
        &mut self,
        decentlab_id: u64,
        folder: &str,
    ) -> Result<String, Error> {
        if let Some(address) = self.cache.address(folder, decentlab_id) {
            debug!(decentlab_id, folder, address, "cache hit");
            return Ok(address.to_owned());
        }

        let devices = self.devices(folder).await?;
        debug!(
            decentlab_id,
            folder,
            device_count = devices.len(),
            "cache miss, probing folder"
        );

        let probe = ReadingsQuery {
            limit: 1,
            max_pages: Some(1),
            ..ReadingsQuery::default()
        };
        for device in devices {
            let address = device.name;
            if self.cache.contains_address(folder, &address) {
                continue;
            }

            let readings = self.readings(&address, &probe).await?;
            let found = readings
                .first()
                .ok_or_else(|| Error::NoReadings {
                    device: address.clone(),
                })?
                .decentlab_id()?;
            self.cache.insert(folder, found, address.clone());
            debug!(address, folder, found, "cached mapping from reading probe");

            if found == decentlab_id {
                return Ok(address);
            }
        }

        Err(Error::UnknownDecentlabId {
            decentlab_id,
            folder: folder.to_owned(),
        })
    }
}
