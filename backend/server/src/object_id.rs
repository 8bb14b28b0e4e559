//! # Object ids
//!
//! 12-byte document ids in the familiar document-store layout:
//!
//! - 4 bytes: seconds since the Unix epoch, big-endian
//! - 5 bytes: random value fixed for the lifetime of the process
//! - 3 bytes: counter, big-endian, seeded randomly
//!
//! Rendered as 24 lowercase hex characters. Because the timestamp leads,
//! sorting ids sorts documents by creation time.
use std::{
    fmt,
    str::FromStr,
    sync::{
        LazyLock,
        atomic::{AtomicU32, Ordering},
    },
};

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random);
static COUNTER: LazyLock<AtomicU32> =
    LazyLock::new(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid object id: {0}")]
pub struct InvalidObjectId(pub String);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        Self::from_parts(seconds, *PROCESS_UNIQUE, count)
    }

    pub fn from_parts(seconds: u32, unique: [u8; 5], count: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&unique);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes)
    }

    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 {
            return Err(InvalidObjectId(s.to_string()));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidObjectId(s.to_string()))?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let id = ObjectId::from_parts(0x5f00_0001, [1, 2, 3, 4, 5], 0x00ab_cdef);
        assert_eq!(id.to_string(), "5f0000010102030405abcdef");
        assert_eq!(id.timestamp(), 0x5f00_0001);
    }

    #[test]
    fn test_counter_wraps_to_three_bytes() {
        let id = ObjectId::from_parts(0, [0; 5], 0xff12_3456);
        assert_eq!(&id.to_string()[18..], "123456");
    }

    #[test]
    fn test_parse_accepts_hex_in_either_case() {
        let lower: ObjectId = "5f0000010102030405abcdef".parse().unwrap();
        let upper: ObjectId = "5F0000010102030405ABCDEF".parse().unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<ObjectId>().is_err());
        assert!("1234".parse::<ObjectId>().is_err());
        assert!("5f0000010102030405abcdeg".parse::<ObjectId>().is_err());
        assert!("5f0000010102030405abcdef00".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_new_ids_are_increasing_within_a_second() {
        let first = ObjectId::new();
        let second = ObjectId::new();
        assert_ne!(first, second);
        if first.timestamp() == second.timestamp() && first.bytes()[9..] != [0xff, 0xff, 0xff] {
            assert!(second > first);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let id = ObjectId::from_parts(1, [0; 5], 2);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"000000010000000000000002\"");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
