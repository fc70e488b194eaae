//! # abiwire-primitives
//!
//! Fixed-width value types carried by ABI words: addresses, 32-byte hashes,
//! and 256-bit signed/unsigned integers.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod int;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{Hash, HashError, H256};
pub use int::{IntError, I256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// Four-byte function or error selector
pub type Selector = [u8; 4];
