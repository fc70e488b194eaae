//! # abiwire-codec
//!
//! Ethereum contract ABI parameter codec.
//!
//! ## Features
//!
//! - **AbiType / AbiParameter**: parsed type descriptors with static/dynamic
//!   classification
//! - **encode / decode**: the head/tail word layout, with range checks on
//!   both sides and bounds checks on every offset and length
//! - **Resolver**: picks a function, error or event by name, signature,
//!   selector or topic, disambiguating overloads by trial encoding
//! - **Contract**: call data, return data, revert data and logs for one ABI
//!
//! ## Quick Start
//!
//! ```rust
//! use abiwire_codec::{decode, encode, AbiParameter, AbiType, DecodeOptions, Decoded, Value};
//!
//! let params = [
//!     AbiParameter::new(AbiType::Bool),
//!     AbiParameter::new(AbiType::Uint(256)),
//! ];
//! let values = [Value::Bool(true), Value::uint(123)];
//!
//! let data = encode(&params, &values)?;
//! assert_eq!(data.len(), 64);
//! assert_eq!(data[63], 0x7b);
//!
//! let decoded = decode(&params, &data, &DecodeOptions::default())?;
//! assert_eq!(decoded, Decoded::Values(values.to_vec()));
//! # Ok::<(), abiwire_codec::CodecError>(())
//! ```
//!
//! ## Overloads
//!
//! ```rust
//! use abiwire_codec::{Contract, Value};
//!
//! let contract = Contract::from_json(r#"[
//!     {"type":"function","name":"balanceOf","inputs":[{"name":"","type":"bytes"}],"outputs":[]},
//!     {"type":"function","name":"balanceOf","inputs":[{"name":"","type":"uint256"}],"outputs":[]}
//! ]"#)?;
//!
//! let data = contract.encode_call("balanceOf", &[Value::uint(1)])?;
//! assert_eq!(&data[..4], &contract.function("balanceOf(uint256)")?.selector());
//! # Ok::<(), abiwire_codec::CodecError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod classify;
pub mod config;
pub mod contract;
pub mod decode;
pub mod encode;
pub mod error;
pub mod event;
pub mod function;
pub mod item;
pub mod resolve;
pub mod types;
pub mod value;

pub use cache::SignatureCache;
pub use classify::{classify, static_words, Class};
pub use config::{CodecConfig, DecodeMode, DecodeOptions};
pub use contract::{erc20, Contract};
pub use decode::{decode, decode_value, decode_values};
pub use encode::{encode, encode_value, encode_with_selector, Encoded};
pub use error::{CodecError, Result};
pub use event::{decode_event_log, encode_event_topics};
pub use function::{
    decode_error_result, decode_function_data, decode_function_result, encode_deploy_data,
    encode_function_data, encode_function_result, panic_reason, DecodedError, PANIC_SELECTOR,
    REVERT_SELECTOR,
};
pub use item::{
    Abi, AbiItem, Constructor, CustomError, Event, Function, ItemKind, Special, StateMutability,
};
pub use resolve::{Attempt, Lookup, Query, Resolution, Resolver};
pub use types::{canonical_list, AbiParameter, AbiType};
pub use value::{Decoded, Value};

pub use abiwire_primitives::{Address, Selector, H256, I256, U256};
