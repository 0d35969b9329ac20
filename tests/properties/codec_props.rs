use proptest::prelude::*;

use dvd_search::storage::codec::{decode_vector, dims_of, encode_vector};

fn arb_bits_vector() -> impl Strategy<Value = Vec<f32>> {
    // Raw bit patterns cover NaN payloads, infinities and subnormals.
    prop::collection::vec(any::<u32>().prop_map(f32::from_bits), 0..256)
}

proptest! {
    #[test]
    fn encode_decode_is_bit_exact(values in arb_bits_vector()) {
        let bytes = encode_vector(&values);
        prop_assert_eq!(bytes.len(), values.len() * 4);
        prop_assert_eq!(dims_of(bytes.len()), Some(values.len()));

        let decoded = decode_vector(&bytes).unwrap();
        let original: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
        let roundtrip: Vec<u32> = decoded.iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(original, roundtrip);
    }

    #[test]
    fn ragged_blobs_are_rejected(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let result = decode_vector(&bytes);
        prop_assert_eq!(result.is_ok(), bytes.len() % 4 == 0);
    }
}
