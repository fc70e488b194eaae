//! Item lookup and overload resolution tests

use std::sync::Arc;
use std::thread;

use abiwire_codec::{
    Abi, CodecConfig, CodecError, ItemKind, Lookup, Query, Resolver, SignatureCache, Value,
};

const OVERLOADED_ABI: &str = r#"[
    {"type":"function","name":"balanceOf","inputs":[{"name":"account","type":"bytes"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
    {"type":"function","name":"balanceOf","inputs":[{"name":"id","type":"uint256"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
    {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
    {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256"}]},
    {"type":"error","name":"Unauthorized","inputs":[{"name":"caller","type":"address"}]}
]"#;

fn abi() -> Abi {
    Abi::from_json(OVERLOADED_ABI).unwrap()
}

// ==================== Encode-Direction Tests ====================

/// An integer argument selects the uint256 overload
#[test]
fn test_integer_selects_uint_overload() {
    let abi = abi();
    let resolver = Resolver::default();

    let lookup = Lookup::name("balanceOf").with_args(vec![Value::uint(1)]);
    let resolution = resolver.resolve(&abi, &lookup).unwrap();

    assert_eq!(resolution.signature, "balanceOf(uint256)");
    assert_eq!(resolution.selector(), [0x9c, 0xc7, 0xf7, 0x08]);
    assert_eq!(resolution.attempts.len(), 1);
    assert_eq!(resolution.attempts[0].signature, "balanceOf(bytes)");
}

/// A byte-string argument selects the bytes overload
#[test]
fn test_bytes_selects_bytes_overload() {
    let abi = abi();
    let lookup = Lookup::name("balanceOf")
        .with_args(vec![Value::Bytes(hex::decode("deadbeef").unwrap())]);
    let resolution = Resolver::default().resolve(&abi, &lookup).unwrap();

    assert_eq!(resolution.signature, "balanceOf(bytes)");
    assert_eq!(resolution.selector(), [0x78, 0x41, 0x53, 0x65]);
    assert!(resolution.attempts.is_empty());
}

/// Every rejected overload is reported with its error
#[test]
fn test_no_overload_accepts_arguments() {
    let abi = abi();
    let lookup = Lookup::name("balanceOf").with_args(vec![Value::string("alice")]);
    let err = Resolver::default().resolve(&abi, &lookup).unwrap_err();

    match err {
        CodecError::SelectorNotFound(message) => {
            assert!(message.contains("balanceOf(bytes)"));
            assert!(message.contains("balanceOf(uint256)"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

/// A single candidate is returned without trial encoding
#[test]
fn test_single_candidate_skips_trial() {
    let abi = abi();
    let lookup = Lookup::name("transfer").with_args(vec![Value::Bool(true)]);
    let resolution = Resolver::default().resolve(&abi, &lookup).unwrap();
    assert_eq!(resolution.signature, "transfer(address,uint256)");
    assert!(resolution.attempts.is_empty());
}

// ==================== Decode-Direction Tests ====================

/// Call data picks the overload by selector
#[test]
fn test_call_data_selects_overload() {
    let abi = abi();
    let mut data = vec![0x78, 0x41, 0x53, 0x65];
    data.extend([0u8; 64]);

    let item = Resolver::default()
        .extract(&abi, &Lookup::call_data(data))
        .unwrap();
    assert_eq!(item.signature().as_deref(), Some("balanceOf(bytes)"));
}

/// Error selectors resolve to custom errors
#[test]
fn test_error_selector() {
    let abi = abi();
    let resolver = Resolver::default();
    let selector = resolver.cache().selector("Unauthorized(address)");

    let item = resolver.extract(&abi, &Lookup::selector(selector)).unwrap();
    assert_eq!(item.kind(), ItemKind::Error);

    let err = resolver
        .extract(&abi, &Lookup::selector(selector).of_kind(ItemKind::Function))
        .unwrap_err();
    assert!(matches!(err, CodecError::SelectorNotFound(_)));
}

/// Topics resolve to events
#[test]
fn test_topic_selects_event() {
    let abi = abi();
    let topic = abiwire_codec::H256::from_hex(
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
    )
    .unwrap();
    let item = Resolver::default().extract(&abi, &Lookup::topic(topic)).unwrap();
    assert_eq!(item.name(), Some("Transfer"));
}

// ==================== Ambiguity Tests ====================

/// Overloads without arguments are ambiguous
#[test]
fn test_ambiguous_without_args() {
    let abi = abi();
    let err = Resolver::default()
        .extract(&abi, &Lookup::from("balanceOf"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "ambiguous overload for `balanceOf`: balanceOf(bytes), balanceOf(uint256)"
    );
}

/// Distinct signatures sharing a selector are ambiguous unless args decide
#[test]
fn test_colliding_selectors() {
    // burn(uint256) and collate_propagate_storage(bytes16) both hash to 0x42966c68
    let abi = Abi::from_json(
        r#"[
        {"type":"function","name":"collate_propagate_storage","inputs":[{"name":"","type":"bytes16"}],"outputs":[]},
        {"type":"function","name":"burn","inputs":[{"name":"amount","type":"uint256"}],"outputs":[]}
    ]"#,
    )
    .unwrap();
    let resolver = Resolver::default();
    let selector = [0x42, 0x96, 0x6c, 0x68];

    let err = resolver.extract(&abi, &Lookup::selector(selector)).unwrap_err();
    assert_eq!(
        err,
        CodecError::AmbiguousOverload {
            name: "0x42966c68".to_string(),
            candidates: vec![
                "collate_propagate_storage(bytes16)".to_string(),
                "burn(uint256)".to_string(),
            ],
        }
    );

    let lookup = Lookup::selector(selector).with_args(vec![Value::uint(1)]);
    let resolution = resolver.resolve(&abi, &lookup).unwrap();
    assert_eq!(resolution.signature, "burn(uint256)");
    assert_eq!(resolution.selector(), selector);
    assert_eq!(resolution.attempts.len(), 1);
    assert_eq!(
        resolution.attempts[0].signature,
        "collate_propagate_storage(bytes16)"
    );
}

/// A full signature is never ambiguous
#[test]
fn test_signature_lookup() {
    let abi = abi();
    let lookup = Lookup::from("balanceOf(bytes)");
    assert!(matches!(lookup.query, Query::Signature(_)));

    let item = Resolver::default().extract(&abi, &lookup).unwrap();
    assert_eq!(item.inputs()[0].name(), "account");
}

/// Unknown names are not found
#[test]
fn test_unknown_name() {
    let abi = abi();
    let err = Resolver::default()
        .extract(&abi, &Lookup::from("mint"))
        .unwrap_err();
    assert_eq!(err, CodecError::SelectorNotFound("mint".to_string()));
}

// ==================== Cache Tests ====================

/// Resolvers can share one cache across threads
#[test]
fn test_shared_cache_across_threads() {
    let abi = Arc::new(abi());
    let cache = Arc::new(SignatureCache::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let abi = Arc::clone(&abi);
            let resolver = Resolver::with_cache(CodecConfig::default(), Arc::clone(&cache));
            thread::spawn(move || {
                let lookup = Lookup::name("balanceOf").with_args(vec![Value::uint(i)]);
                let resolution = resolver.resolve(&abi, &lookup)?;
                Ok::<_, CodecError>(resolution.signature)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "balanceOf(uint256)");
    }

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.hits() + cache.misses(), 8);
}

/// Turning the cache off still resolves correctly
#[test]
fn test_resolution_without_cache() {
    let abi = abi();
    let config = CodecConfig::from_json(r#"{"cache_signatures": false}"#).unwrap();
    let resolver = Resolver::new(config);

    let lookup = Lookup::name("balanceOf").with_args(vec![Value::uint(1)]);
    assert_eq!(
        resolver.resolve(&abi, &lookup).unwrap().signature,
        "balanceOf(uint256)"
    );
    assert!(resolver.cache().is_empty());
}
