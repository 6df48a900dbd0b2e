// element-api: Async Rust client for the Elements IoT telemetry platform
//
// Typed access to folders, devices, readings, and raw packets, a
// cursor-following paginated fetch engine, and an opportunistic per-client
// cache reconciling hexadecimal device addresses with vendor serial numbers
// ("decentlab ids").

mod cache;
mod client;
mod devices;
mod folders;
mod packets;
mod readings;
mod resolve;

pub mod decode;
pub mod error;
pub mod frame;
pub mod models;
pub mod transport;

pub use client::ElementClient;
pub use decode::{decode_atm41, decode_blg, decode_sth35, DecodedPayload, SensorValue};
pub use error::Error;
pub use frame::ReadingFrame;
pub use models::{
    Device, Envelope, Folder, Packet, PacketType, PacketsQuery, Reading, ReadingsQuery,
    SortDirection, SortField,
};
pub use transport::TransportConfig;
