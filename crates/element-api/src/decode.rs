// Decentlab payload decoders.
//
// Raw uplink payloads share one frame layout: a protocol version byte, a
// big-endian 16-bit device id, a 16-bit sensor-presence bitmap, then one
// fixed-size block of big-endian 16-bit words per flagged sensor group.
// Each supported sensor model gets its own entry point converting the raw
// words into physical values; the frame walking is shared.

use std::collections::BTreeMap;

use crate::error::Error;

/// The only frame protocol version these decoders understand.
pub const PROTOCOL_VERSION: u8 = 2;

/// One converted sensor channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorValue {
    pub value: f64,
    /// Unit symbol, `None` for dimensionless channels.
    pub unit: Option<&'static str>,
}

/// A decoded uplink frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    pub protocol_version: u8,
    /// The vendor serial number ("decentlab id") of the sender.
    pub device_id: u16,
    /// Converted channels keyed by display name. Only the sensor groups
    /// flagged present in the frame contribute channels.
    pub channels: BTreeMap<&'static str, SensorValue>,
}

// ── Sensor model tables ──────────────────────────────────────────────

struct Channel {
    name: &'static str,
    unit: Option<&'static str>,
    convert: fn(&[u16]) -> f64,
}

struct SensorGroup {
    length: usize,
    channels: &'static [Channel],
}

/// Decode a DL-SHT35 frame (air temperature / humidity probe).
pub fn decode_sth35(payload: &str) -> Result<DecodedPayload, Error> {
    decode(payload, STH35)
}

/// Decode a DL-BLG frame (black globe thermometer).
pub fn decode_blg(payload: &str) -> Result<DecodedPayload, Error> {
    decode(payload, BLG)
}

/// Decode a DL-ATM41 frame (all-in-one weather station).
pub fn decode_atm41(payload: &str) -> Result<DecodedPayload, Error> {
    decode(payload, ATM41)
}

static STH35: &[SensorGroup] = &[
    SensorGroup {
        length: 2,
        channels: &[
            Channel {
                name: "Air temperature",
                unit: Some("°C"),
                convert: |x| 175.0 * f64::from(x[0]) / 65535.0 - 45.0,
            },
            Channel {
                name: "Air humidity",
                unit: Some("%"),
                convert: |x| 100.0 * f64::from(x[1]) / 65535.0,
            },
        ],
    },
    SensorGroup {
        length: 1,
        channels: &[Channel {
            name: "Battery voltage",
            unit: Some("V"),
            convert: |x| f64::from(x[0]) / 1000.0,
        }],
    },
];

static BLG: &[SensorGroup] = &[
    SensorGroup {
        length: 2,
        channels: &[
            Channel {
                name: "Voltage ratio",
                unit: None,
                convert: blg_voltage_ratio,
            },
            Channel {
                name: "Thermistor resistance",
                unit: Some("Ω"),
                convert: blg_thermistor_resistance,
            },
            Channel {
                name: "Temperature",
                unit: Some("°C"),
                convert: blg_temperature,
            },
        ],
    },
    SensorGroup {
        length: 1,
        channels: &[Channel {
            name: "Battery voltage",
            unit: Some("V"),
            convert: |x| f64::from(x[0]) / 1000.0,
        }],
    },
];

/// Ratio of the thermistor bridge voltage, reassembled from a 24-bit
/// fixed-point value spread over two words.
fn blg_voltage_ratio(x: &[u16]) -> f64 {
    ((f64::from(x[0]) + f64::from(x[1]) * 65536.0) / 8_388_608.0 - 1.0) / 2.0
}

fn blg_thermistor_resistance(x: &[u16]) -> f64 {
    1000.0 / blg_voltage_ratio(x) - 41000.0
}

/// Steinhart-Hart with the vendor's thermistor coefficients.
fn blg_temperature(x: &[u16]) -> f64 {
    let r = blg_thermistor_resistance(x);
    1.0 / (0.000_827_111_1 + 0.000_208_802 * r.ln() + 0.000_000_080_592 * r.ln().powi(3))
        - 273.15
}

static ATM41: &[SensorGroup] = &[
    SensorGroup {
        length: 17,
        channels: &[
            Channel {
                name: "Solar radiation",
                unit: Some("W⋅m⁻²"),
                convert: |x| signed(x[0]),
            },
            Channel {
                name: "Precipitation",
                unit: Some("mm"),
                convert: |x| signed(x[1]) / 1000.0,
            },
            Channel {
                name: "Lightning strike count",
                unit: None,
                convert: |x| signed(x[2]),
            },
            Channel {
                name: "Lightning average distance",
                unit: Some("km"),
                convert: |x| signed(x[3]),
            },
            Channel {
                name: "Wind speed",
                unit: Some("m⋅s⁻¹"),
                convert: |x| signed(x[4]) / 100.0,
            },
            Channel {
                name: "Wind direction",
                unit: Some("°"),
                convert: |x| signed(x[5]) / 10.0,
            },
            Channel {
                name: "Maximum wind speed",
                unit: Some("m⋅s⁻¹"),
                convert: |x| signed(x[6]) / 100.0,
            },
            Channel {
                name: "Air temperature",
                unit: Some("°C"),
                convert: |x| signed(x[7]) / 10.0,
            },
            Channel {
                name: "Vapor pressure",
                unit: Some("kPa"),
                convert: |x| signed(x[8]) / 100.0,
            },
            Channel {
                name: "Atmospheric pressure",
                unit: Some("kPa"),
                convert: |x| signed(x[9]) / 100.0,
            },
            Channel {
                name: "Relative humidity",
                unit: Some("%"),
                convert: |x| signed(x[10]) / 10.0,
            },
            Channel {
                name: "Sensor temperature (internal)",
                unit: Some("°C"),
                convert: |x| signed(x[11]) / 10.0,
            },
            Channel {
                name: "X orientation angle",
                unit: Some("°"),
                convert: |x| signed(x[12]) / 10.0,
            },
            Channel {
                name: "Y orientation angle",
                unit: Some("°"),
                convert: |x| signed(x[13]) / 10.0,
            },
            Channel {
                name: "Compass heading",
                unit: Some("°"),
                convert: |x| signed(x[14]),
            },
            Channel {
                name: "North wind speed",
                unit: Some("m⋅s⁻¹"),
                convert: |x| signed(x[15]) / 100.0,
            },
            Channel {
                name: "East wind speed",
                unit: Some("m⋅s⁻¹"),
                convert: |x| signed(x[16]) / 100.0,
            },
        ],
    },
    SensorGroup {
        length: 1,
        channels: &[Channel {
            name: "Battery voltage",
            unit: Some("V"),
            convert: |x| f64::from(x[0]) / 1000.0,
        }],
    },
];

/// ATM41 words carry signed quantities with a 32768 offset.
fn signed(word: u16) -> f64 {
    f64::from(word) - 32768.0
}

// ── Frame walking ────────────────────────────────────────────────────

struct RawFrame {
    device_id: u16,
    flags: u16,
    words: Vec<u16>,
}

fn parse_frame(payload: &str) -> Result<RawFrame, Error> {
    let bytes = hex::decode(payload.trim()).map_err(|e| Error::PayloadDecode {
        reason: format!("invalid hex payload: {e}"),
    })?;

    let [version, id_hi, id_lo, flags_hi, flags_lo, rest @ ..] = bytes.as_slice() else {
        return Err(Error::PayloadDecode {
            reason: "frame shorter than the 5-byte header".to_owned(),
        });
    };
    if *version != PROTOCOL_VERSION {
        return Err(Error::PayloadDecode {
            reason: format!("protocol version {version} doesn't match v{PROTOCOL_VERSION}"),
        });
    }
    if rest.len() % 2 != 0 {
        return Err(Error::PayloadDecode {
            reason: "dangling byte after the last 16-bit word".to_owned(),
        });
    }

    Ok(RawFrame {
        device_id: u16::from_be_bytes([*id_hi, *id_lo]),
        flags: u16::from_be_bytes([*flags_hi, *flags_lo]),
        words: rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect(),
    })
}

fn decode(payload: &str, groups: &[SensorGroup]) -> Result<DecodedPayload, Error> {
    let frame = parse_frame(payload)?;
    let mut channels = BTreeMap::new();
    let mut offset = 0;

    for (bit, group) in groups.iter().enumerate() {
        if frame.flags & (1 << bit) == 0 {
            continue;
        }
        let end = offset + group.length;
        let words = frame
            .words
            .get(offset..end)
            .ok_or_else(|| Error::PayloadDecode {
                reason: format!(
                    "frame truncated: sensor group needs words {offset}..{end}, got {}",
                    frame.words.len()
                ),
            })?;
        for channel in group.channels {
            channels.insert(
                channel.name,
                SensorValue {
                    value: (channel.convert)(words),
                    unit: channel.unit,
                },
            );
        }
        offset = end;
    }

    Ok(DecodedPayload {
        protocol_version: PROTOCOL_VERSION,
        device_id: frame.device_id,
        channels,
    })
}
