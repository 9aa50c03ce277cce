use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use const_hex as hex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A 32-byte buffer, used for root claims, hashes and identities.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct Buf32([u8; 32]);

impl Buf32 {
    pub fn new(data: [u8; 32]) -> Self {
        Self(data)
    }

    /// Returns an all-zeroes buf.
    pub fn zero() -> Self {
        Self([0; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Buf32 {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl From<Buf32> for [u8; 32] {
    fn from(value: Buf32) -> Self {
        value.0
    }
}

impl AsRef<[u8; 32]> for Buf32 {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Buf32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Buf32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buf32({})", hex::encode(self.0))
    }
}

impl Serialize for Buf32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Buf32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        let mut data = [0u8; 32];
        hex::decode_to_slice(stripped, &mut data).map_err(de::Error::custom)?;
        Ok(Self(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let mut data = [0u8; 32];
        data[0] = 0xde;
        data[31] = 0x01;
        let buf = Buf32::new(data);

        let ser = serde_json::to_string(&buf).unwrap();
        let de: Buf32 = serde_json::from_str(&ser).unwrap();
        assert_eq!(buf, de);
    }

    #[test]
    fn test_accepts_prefixed_hex() {
        let s = format!("\"0x{}\"", "11".repeat(32));
        let buf: Buf32 = serde_json::from_str(&s).unwrap();
        assert_eq!(buf, Buf32::new([0x11; 32]));
    }
}
