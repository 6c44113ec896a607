//! Property-based tests for identifier encoding.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::identifier::{decode, encode, Identifier};

    proptest! {
        #[test]
        fn test_decode_inverts_encode(value in any::<u128>()) {
            let id = Identifier::from_u128(value);
            prop_assert_eq!(decode(&encode(&id)), id);
        }

        #[test]
        fn test_encode_inverts_decode(bytes in any::<[u8; 16]>()) {
            prop_assert_eq!(encode(&decode(&bytes)), bytes);
        }

        #[test]
        fn test_encoding_is_u128_big_endian(value in any::<u128>()) {
            // Two big-endian halves, msb first, is exactly the u128 in big-endian.
            let id = Identifier::from_u128(value);
            prop_assert_eq!(id.encode(), value.to_be_bytes());
        }

        #[test]
        fn test_encoding_preserves_ordering(a in any::<u128>(), b in any::<u128>()) {
            let (ia, ib) = (Identifier::from_u128(a), Identifier::from_u128(b));
            prop_assert_eq!(ia.cmp(&ib), ia.encode().cmp(&ib.encode()));
        }
    }
}
