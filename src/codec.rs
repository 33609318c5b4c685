//! Wire-format definitions for protocol messages.
//!
//! Every datagram exchanged with a device starts with a fixed 8-byte
//! [`Header`]; the bytes after it are the message body, interpreted according
//! to the header's `msg_id`.  This module is responsible for:
//! - Defining the on-wire binary layout (header fields, known bodies).
//! - Serialising a [`Header`] / [`EnvironmentBody`] into bytes ready for
//!   transmission.
//! - Deserialising a raw byte slice back into those types, returning errors
//!   for truncated or wrongly sized input.
//!
//! No I/O happens here; everything is pure byte manipulation.
//!
//! # Wire format
//!
//! All multi-byte integers and floats are **little-endian**.
//!
//! ```text
//!  offset  0               2       3       4               6
//!         +---------------+-------+-------+---------------+---------------+
//!         |     msgId     |version| flags |    source     |     spare     |
//!         |     (u16)     | (u8)  | (u8)  |     (u16)     |     (u16)     |
//!         +---------------+-------+-------+---------------+---------------+
//!  offset  8 (environment body, msgId 0x1234 only)
//!         +---------------+---------------+---------------+-------+
//!         |  temperature  |   pressure    |   humidity    | rad.  |
//!         |     (f32)     |     (f32)     |     (f32)     | (u16) |
//!         +---------------+---------------+---------------+-------+
//! ```
//!
//! Header size: [`HEADER_LEN`] = 8 bytes.
//! Environment body size: [`ENV_BODY_LEN`] = 14 bytes.

/// Byte length of the fixed-size header on the wire.
pub const HEADER_LEN: usize = 8;

/// Byte length of the environment message body.
pub const ENV_BODY_LEN: usize = 14;

/// Message id of the environment report ([`EnvironmentBody`]).
pub const MSG_ENVIRONMENT: u16 = 0x1234;

/// Message id of "message type 1" (no body layout defined).
pub const MSG_TYPE_1: u16 = 0x0001;

// Byte offsets of each field within the serialised header.
const OFF_MSG_ID: usize = 0;
const OFF_VERSION: usize = 2;
const OFF_FLAGS: usize = 3;
const OFF_SOURCE: usize = 4;
const OFF_SPARE: usize = 6;

// Byte offsets within the environment body (relative to the body start).
const OFF_TEMPERATURE: usize = 0;
const OFF_PRESSURE: usize = 4;
const OFF_HUMIDITY: usize = 8;
const OFF_RADIATION: usize = 12;

/// Fixed-size message header.
///
/// Fields are in host byte order; [`Header::encode`] converts to
/// little-endian on the wire and [`Header::decode`] converts back.  No field
/// value is validated at decode time — any `msg_id`/`flags`/etc. value is
/// structurally acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Message type id; selects the body interpretation.
    pub msg_id: u16,
    /// Protocol version of the message (0 as default).
    pub version: u8,
    /// Bit-ORed flags defining special features.
    pub flags: u8,
    /// Source of the message (an enumeration owned by the devices).
    pub source: u16,
    /// Padding to keep the body aligned to 4 bytes.
    pub spare: u16,
}

impl Header {
    /// Serialise this header into its 8-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[OFF_MSG_ID..OFF_MSG_ID + 2].copy_from_slice(&self.msg_id.to_le_bytes());
        buf[OFF_VERSION] = self.version;
        buf[OFF_FLAGS] = self.flags;
        buf[OFF_SOURCE..OFF_SOURCE + 2].copy_from_slice(&self.source.to_le_bytes());
        buf[OFF_SPARE..OFF_SPARE + 2].copy_from_slice(&self.spare.to_le_bytes());
        buf
    }

    /// Parse a [`Header`] from the first [`HEADER_LEN`] bytes of `buf`.
    ///
    /// Bytes past the header are ignored; callers treat them as the body.
    /// Returns [`Err`] only if `buf` is shorter than [`HEADER_LEN`] — a
    /// fixed-width unpack of a long-enough slice cannot fail.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() < HEADER_LEN {
            return Err(DecodeError::ShortHeader { actual: buf.len() });
        }

        Ok(Header {
            msg_id: u16::from_le_bytes(buf[OFF_MSG_ID..OFF_MSG_ID + 2].try_into().unwrap()),
            version: buf[OFF_VERSION],
            flags: buf[OFF_FLAGS],
            source: u16::from_le_bytes(buf[OFF_SOURCE..OFF_SOURCE + 2].try_into().unwrap()),
            spare: u16::from_le_bytes(buf[OFF_SPARE..OFF_SPARE + 2].try_into().unwrap()),
        })
    }
}

/// Body of an environment report (`msg_id` [`MSG_ENVIRONMENT`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentBody {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Atmospheric pressure in Pascal.
    pub pressure: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Radiation level in counts per second.
    pub radiation_level: u16,
}

impl EnvironmentBody {
    /// Serialise this body into its 14-byte wire form.
    pub fn encode(&self) -> [u8; ENV_BODY_LEN] {
        let mut buf = [0u8; ENV_BODY_LEN];
        buf[OFF_TEMPERATURE..OFF_TEMPERATURE + 4]
            .copy_from_slice(&self.temperature.to_le_bytes());
        buf[OFF_PRESSURE..OFF_PRESSURE + 4].copy_from_slice(&self.pressure.to_le_bytes());
        buf[OFF_HUMIDITY..OFF_HUMIDITY + 4].copy_from_slice(&self.humidity.to_le_bytes());
        buf[OFF_RADIATION..OFF_RADIATION + 2]
            .copy_from_slice(&self.radiation_level.to_le_bytes());
        buf
    }

    /// Parse an [`EnvironmentBody`] from a raw body slice.
    ///
    /// The slice must be exactly [`ENV_BODY_LEN`] bytes; anything else is
    /// malformed and returns [`DecodeError::BodyLength`].
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() != ENV_BODY_LEN {
            return Err(DecodeError::BodyLength {
                expected: ENV_BODY_LEN,
                actual: buf.len(),
            });
        }

        Ok(EnvironmentBody {
            temperature: f32::from_le_bytes(
                buf[OFF_TEMPERATURE..OFF_TEMPERATURE + 4].try_into().unwrap(),
            ),
            pressure: f32::from_le_bytes(buf[OFF_PRESSURE..OFF_PRESSURE + 4].try_into().unwrap()),
            humidity: f32::from_le_bytes(buf[OFF_HUMIDITY..OFF_HUMIDITY + 4].try_into().unwrap()),
            radiation_level: u16::from_le_bytes(
                buf[OFF_RADIATION..OFF_RADIATION + 2].try_into().unwrap(),
            ),
        })
    }
}

/// Errors that can arise when parsing a raw datagram.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Too few bytes for the fixed header.
    ShortHeader { actual: usize },
    /// Body slice does not match the expected size for its message type.
    BodyLength { expected: usize, actual: usize },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::ShortHeader { actual } => {
                write!(f, "too few bytes for header (got {actual}, need {HEADER_LEN})")
            }
            DecodeError::BodyLength { expected, actual } => {
                write!(f, "invalid body size (expected {expected} bytes, got {actual})")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
