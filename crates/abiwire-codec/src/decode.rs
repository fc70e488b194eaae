//! ABI decoding

use std::collections::HashSet;
use std::iter;

use abiwire_primitives::{Address, I256, U256, WORD_SIZE};
use indexmap::IndexMap;

use crate::config::{DecodeMode, DecodeOptions};
use crate::error::{CodecError, Result, Segment};
use crate::types::{AbiParameter, AbiType};
use crate::value::{Decoded, Value};

/// Decode a buffer against a parameter list.
///
/// A single parameter yields [`Decoded::Single`]; in object mode a list whose
/// parameters are all uniquely named yields [`Decoded::Record`]. Bytes past
/// the last parameter are ignored.
pub fn decode(params: &[AbiParameter], data: &[u8], options: &DecodeOptions) -> Result<Decoded> {
    let values = decode_values(params, data, options)?;
    Ok(assemble(params, values, options.mode))
}

/// Decode a buffer into one value per parameter, in declaration order
pub fn decode_values(
    params: &[AbiParameter],
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<Value>> {
    for param in params {
        param.ty.validate()?;
    }
    let decoder = Decoder { data, options };
    decoder.decode_scope(
        params
            .iter()
            .enumerate()
            .map(|(i, p)| (&p.ty, Segment::Index(i))),
        0,
    )
}

/// Decode a single value laid out at the start of `data`, as a standalone
/// parameter would be.
pub fn decode_value(ty: &AbiType, data: &[u8], options: &DecodeOptions) -> Result<Value> {
    ty.validate()?;
    let decoder = Decoder { data, options };
    let pos = if ty.is_dynamic() {
        decoder.offset_at(0, 0)?
    } else {
        0
    };
    decoder.decode_token(ty, pos)
}

/// Shape positional values per the decode mode
pub(crate) fn assemble(params: &[AbiParameter], mut values: Vec<Value>, mode: DecodeMode) -> Decoded {
    if values.len() == 1 {
        if let Some(value) = values.pop() {
            return Decoded::Single(value);
        }
    }
    match mode {
        DecodeMode::Object if uniquely_named(params) => Decoded::Record(zip_named(params, values)),
        _ => Decoded::Values(values),
    }
}

fn uniquely_named(params: &[AbiParameter]) -> bool {
    let mut seen = HashSet::with_capacity(params.len());
    !params.is_empty()
        && params
            .iter()
            .all(|p| p.name.as_deref().is_some_and(|name| seen.insert(name)))
}

fn zip_named(params: &[AbiParameter], values: Vec<Value>) -> IndexMap<String, Value> {
    params
        .iter()
        .map(|p| p.name().to_string())
        .zip(values)
        .collect()
}

struct Decoder<'a> {
    data: &'a [u8],
    options: &'a DecodeOptions,
}

impl<'a> Decoder<'a> {
    /// Decode one scope whose head starts at `base`
    fn decode_scope<'t>(
        &self,
        items: impl Iterator<Item = (&'t AbiType, Segment<'t>)>,
        base: usize,
    ) -> Result<Vec<Value>> {
        let capacity = items.size_hint().0.min(self.data.len() / WORD_SIZE);
        let mut values = Vec::with_capacity(capacity);
        let mut cursor = base;

        for (ty, segment) in items {
            let value = if ty.is_dynamic() {
                let start = self.offset_at(cursor, base)?;
                self.decode_token(ty, start)
            } else {
                self.decode_token(ty, cursor)
            };
            values.push(value.map_err(|e| e.nested(&segment.render()))?);
            cursor = ty
                .head_size()
                .and_then(|size| cursor.checked_add(size))
                .ok_or_else(|| self.out_of_bounds(usize::MAX))?;
        }

        Ok(values)
    }

    /// Decode a single token whose encoding starts at `pos`
    fn decode_token(&self, ty: &AbiType, pos: usize) -> Result<Value> {
        match ty {
            AbiType::Bool => {
                let word = self.word(pos)?;
                if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                    return Err(CodecError::invalid_value("bool word is neither 0 nor 1"));
                }
                Ok(Value::Bool(word[31] == 1))
            }
            AbiType::Address => {
                let word = self.word(pos)?;
                if self.options.strict_padding && word[..12].iter().any(|b| *b != 0) {
                    return Err(CodecError::invalid_value("non-zero address padding"));
                }
                Ok(Value::Address(Address::from_word(word)))
            }
            AbiType::Uint(bits) => {
                let value = U256::from_big_endian(self.word(pos)?);
                if value.bits() > *bits {
                    return Err(CodecError::invalid_value(format!(
                        "value {value} out of range for uint{bits}"
                    )));
                }
                Ok(Value::Uint(value))
            }
            AbiType::Int(bits) => {
                let value = I256::from_word(self.word(pos)?);
                if !value.fits_bits(*bits) {
                    return Err(CodecError::invalid_value(format!(
                        "value {value} out of range for int{bits}"
                    )));
                }
                Ok(Value::Int(value))
            }
            AbiType::FixedBytes(size) => {
                let word = self.word(pos)?;
                if self.options.strict_padding && word[*size..].iter().any(|b| *b != 0) {
                    return Err(CodecError::invalid_value(format!(
                        "non-zero padding after bytes{size}"
                    )));
                }
                Ok(Value::FixedBytes(word[..*size].to_vec()))
            }
            AbiType::Bytes => Ok(Value::Bytes(self.bytes_at(pos)?.to_vec())),
            AbiType::String => {
                let bytes = self.bytes_at(pos)?.to_vec();
                let s = String::from_utf8(bytes)
                    .map_err(|e| CodecError::invalid_value(format!("invalid UTF-8: {e}")))?;
                Ok(Value::String(s))
            }
            AbiType::Array(inner) => {
                let len = self.length_at(pos)?;
                let start = pos + WORD_SIZE;
                self.check_element_count(inner, len, start)?;
                let values = self.decode_scope(
                    iter::repeat(inner.as_ref())
                        .take(len)
                        .enumerate()
                        .map(|(i, ty)| (ty, Segment::Index(i))),
                    start,
                )?;
                Ok(Value::Array(values))
            }
            AbiType::FixedArray(inner, len) => {
                self.check_element_count(inner, *len, pos)?;
                let values = self.decode_scope(
                    iter::repeat(inner.as_ref())
                        .take(*len)
                        .enumerate()
                        .map(|(i, ty)| (ty, Segment::Index(i))),
                    pos,
                )?;
                Ok(Value::Array(values))
            }
            AbiType::Tuple(components) => {
                let values = self.decode_scope(
                    components
                        .iter()
                        .enumerate()
                        .map(|(i, c)| (&c.ty, Segment::component(c, i))),
                    pos,
                )?;
                if self.options.mode == DecodeMode::Object && uniquely_named(components) {
                    Ok(Value::Struct(zip_named(components, values)))
                } else {
                    Ok(Value::Tuple(values))
                }
            }
        }
    }

    /// The 32-byte word at `pos`
    fn word(&self, pos: usize) -> Result<&'a [u8; 32]> {
        pos.checked_add(WORD_SIZE)
            .and_then(|end| self.data.get(pos..end))
            .and_then(|slice| <&[u8; 32]>::try_from(slice).ok())
            .ok_or_else(|| self.out_of_bounds(pos))
    }

    /// The word at `pos` as a usize, `None` if it does not fit
    fn usize_at(&self, pos: usize) -> Result<Option<usize>> {
        let value = U256::from_big_endian(self.word(pos)?);
        if value.bits() > 64 {
            return Ok(None);
        }
        Ok(usize::try_from(value.low_u64()).ok())
    }

    /// Follow the offset stored at `pos`, relative to `base`
    fn offset_at(&self, pos: usize, base: usize) -> Result<usize> {
        let start = self
            .usize_at(pos)?
            .and_then(|offset| base.checked_add(offset))
            .ok_or_else(|| self.out_of_bounds(usize::MAX))?;
        if start >= self.data.len() {
            return Err(self.out_of_bounds(start));
        }
        Ok(start)
    }

    /// Length word at `pos`
    fn length_at(&self, pos: usize) -> Result<usize> {
        self.usize_at(pos)?.ok_or(CodecError::BufferTooSmall {
            needed: usize::MAX,
            available: self.data.len(),
        })
    }

    /// Payload of a `bytes`/`string` whose length word is at `pos`
    fn bytes_at(&self, pos: usize) -> Result<&'a [u8]> {
        let len = self.length_at(pos)?;
        let start = pos + WORD_SIZE;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.too_small(start.saturating_add(len)))?;

        if self.options.strict_padding {
            let padded_end = start
                .checked_add(len.div_ceil(WORD_SIZE) * WORD_SIZE)
                .filter(|padded_end| *padded_end <= self.data.len())
                .ok_or_else(|| self.too_small(end.saturating_add(WORD_SIZE - len % WORD_SIZE)))?;
            if self.data[end..padded_end].iter().any(|b| *b != 0) {
                return Err(CodecError::invalid_value(
                    "non-zero padding after dynamic bytes",
                ));
            }
        }

        Ok(&self.data[start..end])
    }

    /// Reject element counts the bytes from `start` cannot possibly hold,
    /// before allocating for them. Applies to declared and encoded lengths.
    fn check_element_count(&self, inner: &AbiType, len: usize, start: usize) -> Result<()> {
        let available = self.data.len().saturating_sub(start);
        let element_size = inner.head_size().ok_or_else(|| self.too_small(usize::MAX))?;
        let fits = if element_size == 0 {
            len <= self.data.len()
        } else {
            len <= available / element_size
        };
        if fits {
            Ok(())
        } else {
            Err(self.too_small(start.saturating_add(len.saturating_mul(element_size))))
        }
    }

    fn out_of_bounds(&self, offset: usize) -> CodecError {
        CodecError::OffsetOutOfBounds {
            offset,
            len: self.data.len(),
        }
    }

    fn too_small(&self, needed: usize) -> CodecError {
        CodecError::BufferTooSmall {
            needed,
            available: self.data.len(),
        }
    }
}
