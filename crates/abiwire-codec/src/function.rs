//! Call data, return data and revert data

use std::fmt;

use abiwire_primitives::{Selector, U256};

use crate::config::{CodecConfig, DecodeOptions};
use crate::decode::{decode, decode_value};
use crate::encode::{encode, encode_with_selector};
use crate::error::{CodecError, Result};
use crate::item::{Abi, Constructor, CustomError, Function, ItemKind};
use crate::resolve::{call_selector, Lookup, Resolver};
use crate::types::AbiType;
use crate::value::{Decoded, Value};

/// Selector of the built-in `Error(string)` revert
pub const REVERT_SELECTOR: Selector = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of the built-in `Panic(uint256)` revert
pub const PANIC_SELECTOR: Selector = [0x4e, 0x48, 0x7b, 0x71];

/// Selector followed by the encoded inputs
pub fn encode_function_data(function: &Function, args: &[Value]) -> Result<Vec<u8>> {
    encode_with_selector(function.selector(), &function.inputs, args)
}

/// Find the function addressed by `data` and decode its arguments
pub fn decode_function_data<'a>(
    abi: &'a Abi,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<(&'a Function, Decoded)> {
    decode_function_data_with(&uncached(options), abi, data)
}

pub(crate) fn decode_function_data_with<'a>(
    resolver: &Resolver,
    abi: &'a Abi,
    data: &[u8],
) -> Result<(&'a Function, Decoded)> {
    let lookup = Lookup::call_data(data).of_kind(ItemKind::Function);
    let function = resolver
        .extract(abi, &lookup)?
        .as_function()
        .ok_or_else(|| CodecError::SelectorNotFound(lookup.query.to_string()))?;
    let decoded = decode(&function.inputs, &data[4..], &resolver.config().decode)?;
    Ok((function, decoded))
}

/// Encode return values against the function's outputs
pub fn encode_function_result(function: &Function, values: &[Value]) -> Result<Vec<u8>> {
    encode(&function.outputs, values)
}

/// Decode return data against the function's outputs
pub fn decode_function_result(
    function: &Function,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Decoded> {
    decode(&function.outputs, data, options)
}

/// Creation code followed by the encoded constructor arguments
pub fn encode_deploy_data(
    constructor: Option<&Constructor>,
    bytecode: &[u8],
    args: &[Value],
) -> Result<Vec<u8>> {
    let mut data = bytecode.to_vec();
    match constructor {
        Some(constructor) => data.extend(encode(&constructor.inputs, args)?),
        None if !args.is_empty() => return Err(CodecError::count_mismatch(0, args.len())),
        None => {}
    }
    Ok(data)
}

/// Decoded revert data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedError<'a> {
    /// `Error(string)` from `require` or `revert("...")`
    Revert(String),
    /// `Panic(uint256)` raised by the compiler
    Panic {
        /// Panic code
        code: U256,
        /// Description of well-known codes
        reason: Option<&'static str>,
    },
    /// A custom error declared in the ABI
    Custom {
        /// The matching declaration
        error: &'a CustomError,
        /// Its decoded arguments
        args: Decoded,
    },
}

impl fmt::Display for DecodedError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedError::Revert(message) => write!(f, "reverted: {message}"),
            DecodedError::Panic {
                code,
                reason: Some(reason),
            } => write!(f, "panic 0x{code:x}: {reason}"),
            DecodedError::Panic { code, reason: None } => write!(f, "panic 0x{code:x}"),
            DecodedError::Custom { error, .. } => write!(f, "reverted with {}", error.signature()),
        }
    }
}

/// Decode revert data: the built-in `Error`/`Panic` reverts first, then
/// custom errors declared in `abi`
pub fn decode_error_result<'a>(
    abi: &'a Abi,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<DecodedError<'a>> {
    decode_error_result_with(&uncached(options), abi, data)
}

pub(crate) fn decode_error_result_with<'a>(
    resolver: &Resolver,
    abi: &'a Abi,
    data: &[u8],
) -> Result<DecodedError<'a>> {
    let options = &resolver.config().decode;
    let selector = call_selector(data)?;
    let payload = &data[4..];

    if selector == REVERT_SELECTOR {
        let message = decode_value(&AbiType::String, payload, options)?;
        return match message {
            Value::String(message) => Ok(DecodedError::Revert(message)),
            other => Err(CodecError::invalid_value(format!(
                "expected revert string, got {}",
                other.kind()
            ))),
        };
    }

    if selector == PANIC_SELECTOR {
        let code = decode_value(&AbiType::Uint(256), payload, options)?
            .as_uint()
            .ok_or_else(|| CodecError::invalid_value("expected panic code"))?;
        return Ok(DecodedError::Panic {
            code,
            reason: panic_reason(&code),
        });
    }

    let lookup = Lookup::call_data(data).of_kind(ItemKind::Error);
    let error = resolver
        .extract(abi, &lookup)?
        .as_error()
        .ok_or_else(|| CodecError::SelectorNotFound(lookup.query.to_string()))?;
    let args = decode(&error.inputs, payload, options)?;
    Ok(DecodedError::Custom { error, args })
}

/// Meaning of a compiler panic code
pub fn panic_reason(code: &U256) -> Option<&'static str> {
    if code.bits() > 8 {
        return None;
    }
    let reason = match code.low_u64() {
        0x00 => "generic compiler panic",
        0x01 => "assertion failed",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x22 => "corrupted storage byte array",
        0x31 => "pop on empty array",
        0x32 => "array index out of bounds",
        0x41 => "out of memory",
        0x51 => "call to uninitialized internal function",
        _ => return None,
    };
    Some(reason)
}

fn uncached(options: &DecodeOptions) -> Resolver {
    Resolver::new(CodecConfig {
        decode: options.clone(),
        cache_signatures: false,
    })
}
