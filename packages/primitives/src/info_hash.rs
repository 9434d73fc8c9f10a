//! The `BitTorrent` info hash, the unique identifier of a swarm.
use std::fmt;
use std::str::FromStr;

/// Number of bytes in an info hash.
pub const INFO_HASH_BYTES_LEN: usize = 20;

/// A 20-byte `BitTorrent` info hash.
///
/// The info hash is the SHA-1 hash of the "info" dictionary in a torrent
/// file. The tracker treats it as an opaque identifier: equality and hashing
/// are bytewise, and the first four bytes select the storage shard.
///
/// There are two common text representations, byte arrays and hex strings:
///
/// ```rust
/// use swarm_tracker_primitives::info_hash::InfoHash;
/// use std::str::FromStr;
///
/// let info_hash: InfoHash = [255u8; 20].into();
///
/// assert_eq!(
///     info_hash,
///     InfoHash::from_str("ffffffffffffffffffffffffffffffffffffffff").unwrap()
/// );
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct InfoHash(pub [u8; INFO_HASH_BYTES_LEN]);

impl InfoHash {
    /// Returns the underlying bytes.
    #[must_use]
    pub fn bytes(&self) -> [u8; INFO_HASH_BYTES_LEN] {
        self.0
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({self})")
    }
}

impl From<[u8; INFO_HASH_BYTES_LEN]> for InfoHash {
    fn from(bytes: [u8; INFO_HASH_BYTES_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for InfoHash {
    type Error = ParseInfoHashError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; INFO_HASH_BYTES_LEN] = bytes
            .try_into()
            .map_err(|_| ParseInfoHashError::InvalidByteLength { len: bytes.len() })?;
        Ok(Self(bytes))
    }
}

impl FromStr for InfoHash {
    type Err = ParseInfoHashError;

    /// Parses the 40-character lowercase or uppercase hex representation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != INFO_HASH_BYTES_LEN * 2 {
            return Err(ParseInfoHashError::InvalidTextLength { len: s.len() });
        }

        let mut bytes = [0u8; INFO_HASH_BYTES_LEN];

        for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            let (Some(high), Some(low)) = (hex_to_nibble(chunk[0]), hex_to_nibble(chunk[1])) else {
                let offending = if hex_to_nibble(chunk[0]).is_none() { chunk[0] } else { chunk[1] };
                return Err(ParseInfoHashError::InvalidHexChar {
                    character: char::from(offending),
                });
            };
            bytes[i] = (high << 4) | low;
        }

        Ok(Self(bytes))
    }
}

impl serde::Serialize for InfoHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for InfoHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InfoHashVisitor;

        impl serde::de::Visitor<'_> for InfoHashVisitor {
            type Value = InfoHash;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 40 character hex string")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(InfoHashVisitor)
    }
}

fn hex_to_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Error returned when parsing an [`InfoHash`] fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseInfoHashError {
    /// The text form must be exactly 40 hex characters.
    #[error("invalid info hash length {len}, expected 40 hex characters")]
    InvalidTextLength { len: usize },

    /// The byte form must be exactly 20 bytes.
    #[error("invalid info hash length {len}, expected 20 bytes")]
    InvalidByteLength { len: usize },

    /// A character outside `[0-9a-fA-F]` was found.
    #[error("invalid hex character {character:?} in info hash")]
    InvalidHexChar { character: char },
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{InfoHash, ParseInfoHashError};

    #[test]
    fn it_should_parse_the_hex_string_representation() {
        let info_hash = InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap();

        assert_eq!(
            info_hash.bytes()[..4],
            [0x3b, 0x24, 0x55, 0x04],
            "the leading bytes should match the leading hex digits"
        );
    }

    #[test]
    fn it_should_accept_uppercase_hex() {
        assert_eq!(
            InfoHash::from_str("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF").unwrap(),
            InfoHash::from([255u8; 20])
        );
    }

    #[test]
    fn it_should_display_as_lowercase_hex() {
        let info_hash = InfoHash::from([255u8; 20]);

        assert_eq!(info_hash.to_string(), "ffffffffffffffffffffffffffffffffffffffff");
    }

    #[test]
    fn it_should_reject_text_with_the_wrong_length() {
        assert_eq!(
            InfoHash::from_str("deadbeef"),
            Err(ParseInfoHashError::InvalidTextLength { len: 8 })
        );
    }

    #[test]
    fn it_should_reject_text_with_invalid_characters() {
        let result = InfoHash::from_str("zz245504cf5f11bbdbe1201cea6a6bf45aee1bc0");

        assert_eq!(result, Err(ParseInfoHashError::InvalidHexChar { character: 'z' }));
    }

    #[test]
    fn it_should_be_built_from_a_byte_slice_of_the_right_length() {
        let bytes = [7u8; 20];

        assert_eq!(InfoHash::try_from(&bytes[..]).unwrap(), InfoHash(bytes));
        assert_eq!(
            InfoHash::try_from(&bytes[..19]),
            Err(ParseInfoHashError::InvalidByteLength { len: 19 })
        );
    }

    #[test]
    fn it_should_deserialize_from_a_hex_string() {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;
        use serde::Deserialize;

        let deserializer: StrDeserializer<'_, Error> =
            "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".into_deserializer();

        let info_hash = InfoHash::deserialize(deserializer).unwrap();

        assert_eq!(
            info_hash,
            InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap()
        );
    }
}
