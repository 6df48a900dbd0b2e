// Wire types for the Elements API.
//
// Every endpoint wraps its payload in the `Envelope<T>` below. Resource
// structs model the fields this crate relies on explicitly; everything else
// lands in `extra` because the platform adds fields without notice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

// ── Response envelope ────────────────────────────────────────────────

/// Standard Elements API response envelope.
///
/// ```json
/// { "body": <record-or-array>, "retrieve_after_id": "optional-cursor" }
/// ```
///
/// `retrieve_after_id` is an opaque continuation token; its presence means
/// more pages remain.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub body: T,
    #[serde(default)]
    pub retrieve_after_id: Option<String>,
}

// ── Folder ───────────────────────────────────────────────────────────

/// A folder ("tag"): a named grouping of devices, identified by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Stable, URL-safe identifier, e.g.
    /// `stadt-dortmund-klimasensoren-aktiv-sht35`.
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Device ───────────────────────────────────────────────────────────

/// A registered sensor/gateway unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Hexadecimal device address, e.g. `DEC0054B0`. Stored as returned by
    /// the API; lowercased only when used in a single-device fetch URL.
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Nested metadata tree. The vendor serial number lives at
    /// `gerateinformation.seriennummer` as a decimal string.
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// Extract the vendor serial number ("decentlab id") from the metadata
    /// tree at `fields.gerateinformation.seriennummer`.
    pub fn decentlab_id(&self) -> Result<u64, Error> {
        self.fields
            .get("gerateinformation")
            .and_then(|v| v.get("seriennummer"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .ok_or(Error::MissingField {
                path: "fields.gerateinformation.seriennummer",
            })
    }
}

// ── Reading ──────────────────────────────────────────────────────────

/// One decoded measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub measured_at: DateTime<Utc>,
    pub inserted_at: DateTime<Utc>,
    /// Decoded sensor fields, e.g. `air_temperature`, `battery_voltage`.
    /// Includes `device_id`, the vendor serial number.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reading {
    /// The vendor serial number ("decentlab id") carried in the payload.
    pub fn decentlab_id(&self) -> Result<u64, Error> {
        self.data
            .get("device_id")
            .and_then(Value::as_u64)
            .ok_or(Error::MissingField {
                path: "data.device_id",
            })
    }
}

// ── Packet ───────────────────────────────────────────────────────────

/// Direction of a raw radio frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacketType {
    Up,
    Down,
}

impl PacketType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// One raw transceived frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packet {
    pub transceived_at: DateTime<Utc>,
    pub packet_type: PacketType,
    #[serde(default)]
    pub payload: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Query parameters ─────────────────────────────────────────────────

/// Sort key for readings. Packets are always sorted by transceive time
/// server-side and take no sort parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    MeasuredAt,
    InsertedAt,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MeasuredAt => "measured_at",
            Self::InsertedAt => "inserted_at",
        }
    }
}

/// Sort direction for readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters for [`readings`](crate::ElementClient::readings).
///
/// `limit` is per request (the API accepts 1..=100); `max_pages` caps how
/// many pages the paginator follows, counting the first request as page 1.
#[derive(Debug, Clone)]
pub struct ReadingsQuery {
    pub sort: SortField,
    pub sort_direction: SortDirection,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: u32,
    pub max_pages: Option<u32>,
}

impl Default for ReadingsQuery {
    fn default() -> Self {
        Self {
            sort: SortField::default(),
            sort_direction: SortDirection::default(),
            start: None,
            end: None,
            limit: 100,
            max_pages: None,
        }
    }
}

/// Query parameters for the packet accessors. Same shape as
/// [`ReadingsQuery`] minus the sort controls, plus the direction filter.
#[derive(Debug, Clone)]
pub struct PacketsQuery {
    pub packet_type: Option<PacketType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: u32,
    pub max_pages: Option<u32>,
}

impl Default for PacketsQuery {
    fn default() -> Self {
        Self {
            packet_type: None,
            start: None,
            end: None,
            limit: 100,
            max_pages: None,
        }
    }
}
