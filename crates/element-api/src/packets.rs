// Packet endpoints.
//
// Raw transceived frames, queryable per device or per folder. Sort order is
// fixed server-side to transceive time; there is no sort parameter.

use chrono::SecondsFormat;

use crate::client::ElementClient;
use crate::error::Error;
use crate::models::{Packet, PacketsQuery};

impl ElementClient {
    /// Fetch raw packets for a single device.
    ///
    /// `GET /devices/by-name/{device_name}/packets` -- paginated up to
    /// `query.max_pages`, optionally filtered by direction.
    pub async fn packets_by_device(
        &self,
        device_name: &str,
        query: &PacketsQuery,
    ) -> Result<Vec<Packet>, Error> {
        let route = format!("devices/by-name/{device_name}/packets");
        self.packets(&route, query).await
    }

    /// Fetch raw packets for every device in a folder.
    ///
    /// `GET /tags/{folder}/packets` -- same parameters as
    /// [`packets_by_device`](Self::packets_by_device).
    pub async fn packets_by_folder(
        &self,
        folder: &str,
        query: &PacketsQuery,
    ) -> Result<Vec<Packet>, Error> {
        let route = format!("tags/{folder}/packets");
        self.packets(&route, query).await
    }

    async fn packets(&self, route: &str, query: &PacketsQuery) -> Result<Vec<Packet>, Error> {
        if !(1..=100).contains(&query.limit) {
            return Err(Error::InvalidLimit { limit: query.limit });
        }

        let mut params = vec![("limit", query.limit.to_string())];
        if let Some(packet_type) = query.packet_type {
            params.push(("packet_type", packet_type.as_str().to_owned()));
        }
        if let Some(start) = query.start {
            params.push(("after", start.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }
        if let Some(end) = query.end {
            params.push(("before", end.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }

        self.fetch_collection(route, &params, query.max_pages).await
    }
}
