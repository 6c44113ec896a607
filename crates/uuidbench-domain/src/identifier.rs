//! 128-bit identifiers and their canonical storage encoding.
//!
//! The encoded form is the big-endian concatenation of the two 64-bit
//! halves, most-significant half first:
//!
//! ```text
//!  byte:  0 ........ 7   8 ........ 15
//!        [ msb, BE     ] [ lsb, BE     ]
//! ```
//!
//! This layout is what existing `BINARY(16)` rows hold, so it must not change.

use std::fmt;

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Length in bytes of an encoded identifier.
pub const ENCODED_LEN: usize = 16;

/// Storage representation of an [`Identifier`].
pub type EncodedIdentifier = [u8; ENCODED_LEN];

/// A 128-bit identifier made of a most-significant and a least-significant half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    msb: u64,
    lsb: u64,
}

impl Identifier {
    /// Creates an identifier from its two halves.
    pub const fn from_halves(msb: u64, lsb: u64) -> Self {
        Self { msb, lsb }
    }

    /// Creates an identifier from a single 128-bit value.
    pub const fn from_u128(value: u128) -> Self {
        Self {
            msb: (value >> 64) as u64,
            lsb: value as u64,
        }
    }

    pub const fn most_significant_bits(&self) -> u64 {
        self.msb
    }

    pub const fn least_significant_bits(&self) -> u64 {
        self.lsb
    }

    pub const fn as_u128(&self) -> u128 {
        ((self.msb as u128) << 64) | self.lsb as u128
    }

    /// Encodes this identifier into its 16-byte storage form.
    pub fn encode(&self) -> EncodedIdentifier {
        encode(self)
    }

    /// Decodes an identifier from a byte slice read back from storage.
    ///
    /// Fails if the slice is not exactly [`ENCODED_LEN`] bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> DomainResult<Self> {
        let encoded: &EncodedIdentifier =
            bytes.try_into().map_err(|_| DomainError::InvalidLength {
                expected: ENCODED_LEN,
                actual: bytes.len(),
            })?;
        Ok(decode(encoded))
    }
}

/// Encodes an identifier: msb big-endian in bytes 0..8, lsb big-endian in 8..16.
pub fn encode(identifier: &Identifier) -> EncodedIdentifier {
    let mut bytes = [0u8; ENCODED_LEN];
    bytes[..8].copy_from_slice(&identifier.msb.to_be_bytes());
    bytes[8..].copy_from_slice(&identifier.lsb.to_be_bytes());
    bytes
}

/// Inverse of [`encode`].
pub fn decode(bytes: &EncodedIdentifier) -> Identifier {
    let mut msb = [0u8; 8];
    let mut lsb = [0u8; 8];
    msb.copy_from_slice(&bytes[..8]);
    lsb.copy_from_slice(&bytes[8..]);
    Identifier {
        msb: u64::from_be_bytes(msb),
        lsb: u64::from_be_bytes(lsb),
    }
}

impl From<Uuid> for Identifier {
    fn from(uuid: Uuid) -> Self {
        let (msb, lsb) = uuid.as_u64_pair();
        Self { msb, lsb }
    }
}

impl From<Identifier> for Uuid {
    fn from(identifier: Identifier) -> Self {
        Uuid::from_u64_pair(identifier.msb, identifier.lsb)
    }
}

impl From<u128> for Identifier {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Uuid::from(*self).hyphenated(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_writes_msb_then_lsb_big_endian() {
        let id = Identifier::from_halves(0x0011_2233_4455_6677, 0x8899_aabb_ccdd_eeff);
        assert_eq!(
            id.encode(),
            [
                0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
                0xee, 0xff
            ]
        );
    }

    #[test]
    fn test_encode_matches_uuid_byte_order() {
        // The canonical layout coincides with RFC 4122 byte order.
        let uuid = Uuid::parse_str("f81d4fae-7dec-11d0-a765-00a0c91e6bf6").unwrap();
        let id = Identifier::from(uuid);
        assert_eq!(&id.encode(), uuid.as_bytes());
    }

    #[test]
    fn test_halves_with_high_bit_set() {
        let id = Identifier::from_halves(u64::MAX, 1 << 63);
        let bytes = id.encode();
        assert_eq!(&bytes[..8], &[0xff; 8]);
        assert_eq!(&bytes[8..], &[0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode(&bytes), id);
        assert_eq!(id.most_significant_bits(), u64::MAX);
        assert_eq!(id.least_significant_bits(), 1 << 63);
    }

    #[test]
    fn test_halves_split_u128_at_bit_64() {
        let id = Identifier::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
        assert_eq!(id.most_significant_bits(), 0x0011_2233_4455_6677);
        assert_eq!(id.least_significant_bits(), 0x8899_aabb_ccdd_eeff);
        assert_eq!(
            Identifier::from_halves(id.most_significant_bits(), id.least_significant_bits()),
            id
        );
    }

    #[test]
    fn test_zero_and_max_round_trip() {
        for value in [0u128, u128::MAX] {
            let id = Identifier::from_u128(value);
            assert_eq!(decode(&encode(&id)), id);
            assert_eq!(id.as_u128(), value);
        }
    }

    #[test]
    fn test_try_from_slice_rejects_wrong_length() {
        let err = Identifier::try_from_slice(&[0u8; 15]).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidLength {
                expected: 16,
                actual: 15
            }
        );
        assert!(Identifier::try_from_slice(&[0u8; 17]).is_err());
        assert!(Identifier::try_from_slice(&[]).is_err());
    }

    #[test]
    fn test_try_from_slice_accepts_encoded_bytes() {
        let id = Identifier::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
        let bytes = id.encode();
        assert_eq!(Identifier::try_from_slice(&bytes).unwrap(), id);
    }

    #[test]
    fn test_display_is_hyphenated_uuid() {
        let id = Identifier::from_halves(0xf81d_4fae_7dec_11d0, 0xa765_00a0_c91e_6bf6);
        assert_eq!(id.to_string(), "f81d4fae-7dec-11d0-a765-00a0c91e6bf6");
    }

    #[test]
    fn test_uuid_conversion_round_trip() {
        let uuid = Uuid::new_v4();
        let id = Identifier::from(uuid);
        assert_eq!(Uuid::from(id), uuid);
    }
}
