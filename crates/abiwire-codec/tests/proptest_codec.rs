//! Property-based tests for the codec laws.
//!
//! Random type trees are paired with random values of that type, then
//! checked for round-trip, word alignment and static-size properties.

use abiwire_codec::{
    classify, decode, decode_values, encode, static_words, AbiParameter, AbiType, Address, Class,
    DecodeOptions, Value, I256, U256,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn leaf_type() -> impl Strategy<Value = AbiType> {
    prop_oneof![
        Just(AbiType::Bool),
        Just(AbiType::Address),
        (1usize..=32).prop_map(|n| AbiType::Uint(n * 8)),
        (1usize..=32).prop_map(|n| AbiType::Int(n * 8)),
        (1usize..=32).prop_map(AbiType::FixedBytes),
        Just(AbiType::Bytes),
        Just(AbiType::String),
    ]
}

fn abi_type() -> impl Strategy<Value = AbiType> {
    leaf_type().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| AbiType::Array(Box::new(t))),
            (inner.clone(), 1usize..=3).prop_map(|(t, n)| AbiType::FixedArray(Box::new(t), n)),
            vec(inner, 1..=4).prop_map(|types| {
                AbiType::Tuple(types.into_iter().map(AbiParameter::new).collect())
            }),
        ]
    })
}

/// Random value representable by `ty`, covering the full integer range
fn value_for(ty: &AbiType) -> BoxedStrategy<Value> {
    match ty {
        AbiType::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        AbiType::Address => any::<[u8; 20]>()
            .prop_map(|bytes| Value::Address(Address::from_bytes(bytes)))
            .boxed(),
        AbiType::Uint(bits) => {
            let keep = bits / 8;
            any::<[u8; 32]>()
                .prop_map(move |mut word| {
                    word[..32 - keep].fill(0);
                    Value::Uint(U256::from_big_endian(&word))
                })
                .boxed()
        }
        AbiType::Int(bits) => {
            let keep = bits / 8;
            any::<[u8; 32]>()
                .prop_map(move |mut word| {
                    let fill = if word[32 - keep] & 0x80 != 0 { 0xff } else { 0 };
                    word[..32 - keep].fill(fill);
                    Value::Int(I256::from_word(&word))
                })
                .boxed()
        }
        AbiType::FixedBytes(size) => vec(any::<u8>(), *size).prop_map(Value::FixedBytes).boxed(),
        AbiType::Bytes => vec(any::<u8>(), 0..70).prop_map(Value::Bytes).boxed(),
        AbiType::String => ".{0,24}".prop_map(Value::String).boxed(),
        AbiType::Array(inner) => vec(value_for(inner), 0..4).prop_map(Value::Array).boxed(),
        AbiType::FixedArray(inner, len) => {
            vec(value_for(inner), *len).prop_map(Value::Array).boxed()
        }
        AbiType::Tuple(components) => components
            .iter()
            .map(|c| value_for(&c.ty))
            .collect::<Vec<_>>()
            .prop_map(Value::Tuple)
            .boxed(),
    }
}

/// A parameter list of one to three random types with matching values
fn params_and_values() -> impl Strategy<Value = (Vec<AbiParameter>, Vec<Value>)> {
    vec(abi_type(), 1..=3).prop_flat_map(|types| {
        let values = types.iter().map(value_for).collect::<Vec<_>>();
        let params = types.into_iter().map(AbiParameter::new).collect::<Vec<_>>();
        (Just(params), values)
    })
}

proptest! {
    #[test]
    fn roundtrip((params, values) in params_and_values()) {
        let data = encode(&params, &values).unwrap();
        let decoded = decode_values(&params, &data, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn output_is_word_aligned((params, values) in params_and_values()) {
        let data = encode(&params, &values).unwrap();
        prop_assert_eq!(data.len() % 32, 0);
    }

    #[test]
    fn static_lists_have_fixed_size((params, values) in params_and_values()) {
        let data = encode(&params, &values).unwrap();
        if let Some(words) = static_words(&params) {
            prop_assert_eq!(data.len(), words * 32);
        }
    }

    #[test]
    fn classifier_laws(ty in abi_type()) {
        match &ty {
            AbiType::Array(_) | AbiType::Bytes | AbiType::String => {
                prop_assert_eq!(classify(&ty), Class::Dynamic);
            }
            AbiType::FixedArray(inner, _) => {
                prop_assert_eq!(classify(&ty), classify(inner));
            }
            AbiType::Tuple(components) => {
                let any_dynamic = components.iter().any(|c| c.ty.is_dynamic());
                prop_assert_eq!(ty.is_dynamic(), any_dynamic);
            }
            _ => prop_assert_eq!(classify(&ty), Class::Static),
        }
    }

    #[test]
    fn truncation_is_detected((params, values) in params_and_values()) {
        let data = encode(&params, &values).unwrap();
        let result = decode(&params, &data[..data.len() - 1], &DecodeOptions::default());
        prop_assert!(result.is_err());
    }

    #[test]
    fn arbitrary_input_never_panics(
        ty in abi_type(),
        data in vec(any::<u8>(), 0..256),
    ) {
        let params = [AbiParameter::new(ty)];
        let _ = decode(&params, &data, &DecodeOptions::default());
        let _ = decode(&params, &data, &DecodeOptions::object().lenient());
    }

    #[test]
    fn out_of_range_uint_rejected(n in 1usize..32, excess in 1u8..=255) {
        let bits = n * 8;
        let mut word = [0u8; 32];
        word[31 - n] = excess;
        let value = Value::Uint(U256::from_big_endian(&word));
        let result = encode(&[AbiParameter::new(AbiType::Uint(bits))], &[value]);
        prop_assert!(result.is_err());
    }
}
