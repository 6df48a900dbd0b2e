// Reading endpoints.
//
// Two distinct operations share the same request: `readings` returns the
// typed records, `readings_frame` the flat tabular projection. The split
// replaces the origin system's boolean flag that switched the return shape.

use chrono::SecondsFormat;
use tracing::info;

use crate::client::ElementClient;
use crate::error::Error;
use crate::frame::ReadingFrame;
use crate::models::{Reading, ReadingsQuery};

impl ElementClient {
    /// Fetch decoded readings for a device.
    ///
    /// `GET /devices/by-name/{device_name}/readings` -- paginated up to
    /// `query.max_pages`. `query.start`/`query.end` become the `after`/
    /// `before` ISO-8601 parameters when present.
    pub async fn readings(
        &self,
        device_name: &str,
        query: &ReadingsQuery,
    ) -> Result<Vec<Reading>, Error> {
        if !(1..=100).contains(&query.limit) {
            return Err(Error::InvalidLimit { limit: query.limit });
        }

        let mut params = vec![
            ("sort", query.sort.as_str().to_owned()),
            ("sort_direction", query.sort_direction.as_str().to_owned()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(start) = query.start {
            params.push(("after", start.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }
        if let Some(end) = query.end {
            params.push(("before", end.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }

        let route = format!("devices/by-name/{device_name}/readings");
        self.fetch_collection(&route, &params, query.max_pages).await
    }

    /// Fetch readings and project them into a [`ReadingFrame`].
    ///
    /// One flat row per reading (its `data` map), indexed by `measured_at`
    /// in the order the API returned the records. A device with zero
    /// readings yields an empty frame and an informational log line, not an
    /// error.
    pub async fn readings_frame(
        &self,
        device_name: &str,
        query: &ReadingsQuery,
    ) -> Result<ReadingFrame, Error> {
        let readings = self.readings(device_name, query).await?;
        if readings.is_empty() {
            info!(device_name, "no data for device");
        }
        Ok(ReadingFrame::from_readings(&readings))
    }
}
