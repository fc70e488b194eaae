//! Runtime values carried through the codec

use abiwire_primitives::{Address, H256, I256, U256};
use indexmap::IndexMap;

/// A value to encode, or one produced by decoding.
///
/// Arrays are untyped lists; whether one is fixed or dynamic comes from the
/// parameter it is encoded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Fixed or dynamic array
    Array(Vec<Value>),
    /// Tuple with positional components
    Tuple(Vec<Value>),
    /// Tuple with named components, in declaration order
    Struct(IndexMap<String, Value>),
}

impl Value {
    /// Create a uint value from u128
    pub fn uint(value: u128) -> Self {
        Value::Uint(U256::from(value))
    }

    /// Create an int value from i128
    pub fn int(value: i128) -> Self {
        Value::Int(I256::from_i128(value))
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a bytes32 value
    pub fn bytes32(hash: H256) -> Self {
        Value::FixedBytes(hash.as_bytes().to_vec())
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Address(_) => "address",
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
            Value::Struct(_) => "struct",
        }
    }

    /// Get the bool if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the address if this is one
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Value::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Get the unsigned integer if this is one
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the signed integer if this is one
    pub fn as_int(&self) -> Option<I256> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the raw bytes of a `bytes` or `bytesN` value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) | Value::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the string if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of an array or positional tuple
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Named member of a struct value
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.get(name),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Value::Address(a)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(U256::from(v))
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(I256::from(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

/// Result of decoding a parameter list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Positional values, for zero or several parameters
    Values(Vec<Value>),
    /// The bare value of a single-parameter list
    Single(Value),
    /// Values keyed by parameter name, when every parameter is named
    Record(IndexMap<String, Value>),
}

impl Decoded {
    /// Number of decoded top-level values
    pub fn len(&self) -> usize {
        match self {
            Decoded::Values(values) => values.len(),
            Decoded::Single(_) => 1,
            Decoded::Record(fields) => fields.len(),
        }
    }

    /// True when the parameter list was empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positional access regardless of shape
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Decoded::Values(values) => values.get(index),
            Decoded::Single(value) => (index == 0).then_some(value),
            Decoded::Record(fields) => fields.get_index(index).map(|(_, v)| v),
        }
    }

    /// Access by name, for record results
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Decoded::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Flatten to positional values in declaration order
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Decoded::Values(values) => values,
            Decoded::Single(value) => vec![value],
            Decoded::Record(fields) => fields.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::uint(7).as_uint(), Some(U256::from(7)));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("lol").as_str(), Some("lol"));
        assert_eq!(Value::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(Value::int(-1).as_int(), Some(I256::from(-1i64)));
        assert!(Value::uint(7).as_str().is_none());
    }

    #[test]
    fn test_decoded_shapes() {
        let single = Decoded::Single(Value::uint(1));
        assert_eq!(single.len(), 1);
        assert_eq!(single.get(0), Some(&Value::uint(1)));
        assert_eq!(single.get(1), None);

        let mut fields = IndexMap::new();
        fields.insert("a".to_string(), Value::uint(1));
        fields.insert("b".to_string(), Value::from(false));
        let record = Decoded::Record(fields);
        assert_eq!(record.field("b"), Some(&Value::from(false)));
        assert_eq!(record.get(0), Some(&Value::uint(1)));
        assert_eq!(
            record.into_values(),
            vec![Value::uint(1), Value::from(false)]
        );

        assert!(Decoded::Values(vec![]).is_empty());
    }
}
