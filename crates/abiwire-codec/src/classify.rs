//! Static/dynamic classification of ABI types

use abiwire_primitives::WORD_SIZE;

use crate::types::{AbiParameter, AbiType};

/// Whether a type has a fixed head width or is tail-encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Fixed number of words, encoded inline in the head
    Static,
    /// Variable width, referenced from the head by an offset
    Dynamic,
}

/// Classify a type. Depends only on the type grammar, never on a value.
pub fn classify(ty: &AbiType) -> Class {
    let dynamic = match ty {
        AbiType::Bool
        | AbiType::Address
        | AbiType::Uint(_)
        | AbiType::Int(_)
        | AbiType::FixedBytes(_) => false,
        AbiType::Bytes | AbiType::String | AbiType::Array(_) => true,
        AbiType::FixedArray(inner, _) => classify(inner) == Class::Dynamic,
        AbiType::Tuple(components) => components
            .iter()
            .any(|c| classify(&c.ty) == Class::Dynamic),
    };
    if dynamic {
        Class::Dynamic
    } else {
        Class::Static
    }
}

impl AbiType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        classify(self) == Class::Dynamic
    }

    /// Words this type takes in its enclosing head: the full static width
    /// for static types, one offset word for dynamic ones. Saturates at
    /// `usize::MAX` for static types too wide to address.
    pub fn head_words(&self) -> usize {
        self.checked_head_words().unwrap_or(usize::MAX)
    }

    /// Head width in bytes, `None` if it overflows `usize`
    pub(crate) fn head_size(&self) -> Option<usize> {
        self.checked_head_words()?.checked_mul(WORD_SIZE)
    }

    fn checked_head_words(&self) -> Option<usize> {
        match self {
            AbiType::FixedArray(inner, len) if !self.is_dynamic() => {
                inner.checked_head_words()?.checked_mul(*len)
            }
            AbiType::Tuple(components) if !self.is_dynamic() => components
                .iter()
                .try_fold(0usize, |acc, c| acc.checked_add(c.ty.checked_head_words()?)),
            _ => Some(1),
        }
    }
}

/// Encoded size in words of a parameter list when every parameter is
/// static; `None` if any is dynamic.
pub fn static_words(params: &[AbiParameter]) -> Option<usize> {
    params.iter().try_fold(0usize, |acc, p| {
        (!p.ty.is_dynamic()).then(|| acc.saturating_add(p.ty.head_words()))
    })
}
