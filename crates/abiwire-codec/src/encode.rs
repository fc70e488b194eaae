//! ABI encoding

use abiwire_primitives::{I256, U256, WORD_SIZE};

use crate::error::{CodecError, Result, Segment};
use crate::types::{AbiParameter, AbiType};
use crate::value::Value;

/// Head and tail of one encoding scope.
///
/// The head holds inline static values and offsets; offsets are measured
/// from the start of the head.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Inline values and tail offsets
    pub head: Vec<u8>,
    /// Dynamic payloads in parameter order
    pub tail: Vec<u8>,
}

impl Encoded {
    /// Concatenate head then tail
    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = self.head;
        out.extend(self.tail);
        out
    }
}

/// Encode values against a parameter list.
///
/// The output length is always a multiple of 32.
pub fn encode(params: &[AbiParameter], values: &[Value]) -> Result<Vec<u8>> {
    for param in params {
        param.ty.validate()?;
    }
    if params.len() != values.len() {
        return Err(CodecError::count_mismatch(params.len(), values.len()));
    }
    let items: Vec<(&AbiType, &Value, Segment)> = params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (p, v))| (&p.ty, v, Segment::Index(i)))
        .collect();
    Ok(encode_scope(&items)?.into_bytes())
}

/// Encode a single value of the given type, as it would appear inside its
/// parent's tail (dynamic) or head (static).
pub fn encode_value(ty: &AbiType, value: &Value) -> Result<Vec<u8>> {
    ty.validate()?;
    encode_token(ty, value)
}

/// Encode function call (selector + params)
pub fn encode_with_selector(
    selector: [u8; 4],
    params: &[AbiParameter],
    values: &[Value],
) -> Result<Vec<u8>> {
    let mut result = selector.to_vec();
    result.extend(encode(params, values)?);
    Ok(result)
}

/// Lay out one scope: static values inline, dynamic ones as offsets into
/// the tail. Each item carries the path segment used in error reports.
pub(crate) fn encode_scope(items: &[(&AbiType, &Value, Segment<'_>)]) -> Result<Encoded> {
    let head_size = items
        .iter()
        .try_fold(0usize, |acc, (ty, _, _)| acc.checked_add(ty.head_size()?))
        .ok_or_else(|| CodecError::InvalidType("encoded head overflows usize".to_string()))?;

    // Capacity follows the supplied values, never the declared widths.
    let mut encoded = Encoded {
        head: Vec::with_capacity(items.len() * WORD_SIZE),
        tail: Vec::new(),
    };

    for (ty, value, segment) in items {
        let bytes = encode_token(ty, value).map_err(|e| e.nested(&segment.render()))?;
        if ty.is_dynamic() {
            let offset = head_size + encoded.tail.len();
            encoded.head.extend(encode_usize(offset));
            encoded.tail.extend(bytes);
        } else {
            encoded.head.extend(bytes);
        }
    }

    Ok(encoded)
}

/// Encode a single token
fn encode_token(ty: &AbiType, value: &Value) -> Result<Vec<u8>> {
    match (ty, value) {
        (AbiType::Bool, Value::Bool(b)) => {
            let mut buf = [0u8; 32];
            buf[31] = u8::from(*b);
            Ok(buf.to_vec())
        }
        (AbiType::Address, Value::Address(addr)) => Ok(addr.to_word().to_vec()),
        (AbiType::Uint(bits), Value::Uint(v)) => encode_uint(*bits, v),
        (AbiType::Uint(bits), Value::Int(v)) => {
            if v.is_negative() {
                return Err(CodecError::invalid_value(format!(
                    "negative value {v} for uint{bits}"
                )));
            }
            encode_uint(*bits, &v.abs())
        }
        (AbiType::Int(bits), Value::Int(v)) => encode_int(*bits, v),
        (AbiType::Int(bits), Value::Uint(v)) => encode_int(*bits, &I256::from(*v)),
        (AbiType::FixedBytes(size), Value::FixedBytes(data) | Value::Bytes(data)) => {
            if data.len() != *size {
                return Err(CodecError::invalid_value(format!(
                    "expected {size} bytes for bytes{size}, got {}",
                    data.len()
                )));
            }
            let mut buf = [0u8; 32];
            buf[..data.len()].copy_from_slice(data);
            Ok(buf.to_vec())
        }
        (AbiType::Bytes, Value::Bytes(data) | Value::FixedBytes(data)) => Ok(encode_bytes(data)),
        (AbiType::String, Value::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (AbiType::Array(inner), Value::Array(values)) => {
            let mut result = encode_usize(values.len()).to_vec();
            result.extend(encode_elements(inner, values)?.into_bytes());
            Ok(result)
        }
        (AbiType::FixedArray(inner, len), Value::Array(values)) => {
            if values.len() != *len {
                return Err(CodecError::count_mismatch(*len, values.len()));
            }
            Ok(encode_elements(inner, values)?.into_bytes())
        }
        (AbiType::Tuple(components), Value::Tuple(values)) => {
            if values.len() != components.len() {
                return Err(CodecError::count_mismatch(components.len(), values.len()));
            }
            let items: Vec<(&AbiType, &Value, Segment)> = components
                .iter()
                .zip(values)
                .enumerate()
                .map(|(i, (c, v))| (&c.ty, v, Segment::component(c, i)))
                .collect();
            Ok(encode_scope(&items)?.into_bytes())
        }
        (AbiType::Tuple(components), Value::Struct(fields)) => {
            if fields.len() != components.len() {
                return Err(CodecError::count_mismatch(components.len(), fields.len()));
            }
            let mut items = Vec::with_capacity(components.len());
            for (i, component) in components.iter().enumerate() {
                let name = component.name.as_deref().ok_or_else(|| {
                    CodecError::invalid_value(format!(
                        "component {i} is unnamed; pass the tuple positionally"
                    ))
                })?;
                let value = fields.get(name).ok_or_else(|| {
                    CodecError::invalid_value(format!("missing field `{name}`"))
                })?;
                items.push((&component.ty, value, Segment::Field(name)));
            }
            Ok(encode_scope(&items)?.into_bytes())
        }
        (ty, value) => Err(CodecError::invalid_value(format!(
            "expected {ty}, got {}",
            value.kind()
        ))),
    }
}

fn encode_elements(inner: &AbiType, values: &[Value]) -> Result<Encoded> {
    let items: Vec<(&AbiType, &Value, Segment)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (inner, v, Segment::Index(i)))
        .collect();
    encode_scope(&items)
}

fn encode_uint(bits: usize, value: &U256) -> Result<Vec<u8>> {
    if value.bits() > bits {
        return Err(CodecError::invalid_value(format!(
            "value {value} out of range for uint{bits}"
        )));
    }
    Ok(encode_u256(value).to_vec())
}

fn encode_int(bits: usize, value: &I256) -> Result<Vec<u8>> {
    if !value.fits_bits(bits) {
        return Err(CodecError::invalid_value(format!(
            "value {value} out of range for int{bits}"
        )));
    }
    value
        .to_word()
        .map(|word| word.to_vec())
        .ok_or_else(|| CodecError::invalid_value(format!("value {value} out of range for int256")))
}

/// Encode a U256 as 32 bytes
pub(crate) fn encode_u256(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

pub(crate) fn encode_usize(value: usize) -> [u8; 32] {
    encode_u256(&U256::from(value))
}

/// Encode dynamic bytes
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_usize(data.len()).to_vec();

    // Pad to 32 bytes
    let padded_len = data.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}
