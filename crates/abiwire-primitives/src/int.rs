//! Signed 256-bit integer

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use thiserror::Error;

/// Signed integer parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntError {
    /// Not a decimal integer
    #[error("invalid integer literal: {0}")]
    InvalidLiteral(String),
    /// Magnitude does not fit in 256 bits
    #[error("integer literal out of range: {0}")]
    OutOfRange(String),
}

/// Signed 256-bit integer in sign-magnitude form.
///
/// Zero is always non-negative. Values whose magnitude exceeds the int256
/// range can be represented but cannot be written to a word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256([0, 0, 0, 0]),
        negative: false,
    };

    /// Create from magnitude and sign
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Absolute value
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value lies in `[-2^(bits-1), 2^(bits-1) - 1]`.
    ///
    /// `bits` must be in `1..=256`.
    pub fn fits_bits(&self, bits: usize) -> bool {
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// Two's-complement big-endian word, or `None` outside the int256 range
    pub fn to_word(&self) -> Option<[u8; 32]> {
        if !self.fits_bits(256) {
            return None;
        }
        let value = if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        };
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        Some(word)
    }

    /// Interpret a big-endian word as a two's-complement int256
    pub fn from_word(word: &[u8; 32]) -> Self {
        let raw = U256::from_big_endian(word);
        if word[0] & 0x80 != 0 {
            Self::new((!raw).overflowing_add(U256::one()).0, true)
        } else {
            Self::new(raw, false)
        }
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<U256> for I256 {
    fn from(value: U256) -> Self {
        Self::new(value, false)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl fmt::Debug for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I256({})", self)
    }
}

impl FromStr for I256 {
    type Err = IntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IntError::InvalidLiteral(s.to_string()));
        }
        let abs = U256::from_dec_str(digits).map_err(|_| IntError::OutOfRange(s.to_string()))?;
        Ok(Self::new(abs, negative))
    }
}
