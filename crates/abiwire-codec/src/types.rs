//! ABI type grammar and parameter descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// Boolean
    Bool,
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// Dynamic bytes
    Bytes,
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<AbiType>),
    /// Fixed-size array
    FixedArray(Box<AbiType>, usize),
    /// Tuple (struct)
    Tuple(Vec<AbiParameter>),
}

impl AbiType {
    /// Parse a JSON-ABI type string such as `uint256`, `bytes32[]` or
    /// `tuple[2]`. `components` supplies the members of a `tuple` base type.
    pub fn parse(s: &str, components: &[AbiParameter]) -> Result<Self> {
        let s = s.trim();

        if let Some(open) = s.strip_suffix(']').and_then(|rest| rest.rfind('[')) {
            let inner = Self::parse(&s[..open], components)?;
            let size = &s[open + 1..s.len() - 1];
            if size.is_empty() {
                return Ok(AbiType::Array(Box::new(inner)));
            }
            let len = parse_size(size).ok_or_else(|| invalid(s))?;
            if len == 0 {
                return Err(CodecError::InvalidType(format!(
                    "zero-length fixed array: {s}"
                )));
            }
            return Ok(AbiType::FixedArray(Box::new(inner), len));
        }

        match s {
            "bool" => return Ok(AbiType::Bool),
            "address" => return Ok(AbiType::Address),
            "string" => return Ok(AbiType::String),
            "bytes" => return Ok(AbiType::Bytes),
            "uint" => return Ok(AbiType::Uint(256)),
            "int" => return Ok(AbiType::Int(256)),
            "tuple" => {
                if components.is_empty() {
                    return Err(CodecError::InvalidType(
                        "tuple without components".to_string(),
                    ));
                }
                return Ok(AbiType::Tuple(components.to_vec()));
            }
            _ => {}
        }

        // uint<N> / int<N> / bytes<N>
        let parsed = if let Some(rest) = s.strip_prefix("uint") {
            parse_size(rest).map(AbiType::Uint)
        } else if let Some(rest) = s.strip_prefix("int") {
            parse_size(rest).map(AbiType::Int)
        } else if let Some(rest) = s.strip_prefix("bytes") {
            parse_size(rest).map(AbiType::FixedBytes)
        } else {
            None
        };

        let ty = parsed.ok_or_else(|| invalid(s))?;
        ty.validate()?;
        Ok(ty)
    }

    /// Check size constraints that the enum itself cannot express
    pub fn validate(&self) -> Result<()> {
        match self {
            AbiType::Uint(bits) | AbiType::Int(bits) => {
                if *bits == 0 || *bits > 256 || bits % 8 != 0 {
                    return Err(CodecError::InvalidType(format!(
                        "integer width must be a multiple of 8 in 8..=256, got {bits}"
                    )));
                }
            }
            AbiType::FixedBytes(size) => {
                if *size == 0 || *size > 32 {
                    return Err(CodecError::InvalidType(format!(
                        "fixed bytes size must be in 1..=32, got {size}"
                    )));
                }
            }
            AbiType::Array(inner) => inner.validate()?,
            AbiType::FixedArray(inner, len) => {
                if *len == 0 {
                    return Err(CodecError::InvalidType(
                        "zero-length fixed array".to_string(),
                    ));
                }
                inner.validate()?;
                self.check_head_size()?;
            }
            AbiType::Tuple(components) => {
                for component in components {
                    component.ty.validate()?;
                }
                self.check_head_size()?;
            }
            AbiType::Bool | AbiType::Address | AbiType::Bytes | AbiType::String => {}
        }
        Ok(())
    }

    fn check_head_size(&self) -> Result<()> {
        match self.head_size() {
            Some(_) => Ok(()),
            None => Err(CodecError::InvalidType(format!(
                "static size of {self} overflows the address space"
            ))),
        }
    }

    /// Canonical type string used in signatures, e.g. `(uint256,bytes)[]`
    pub fn canonical(&self) -> String {
        match self {
            AbiType::Bool => "bool".to_string(),
            AbiType::Address => "address".to_string(),
            AbiType::Uint(bits) => format!("uint{bits}"),
            AbiType::Int(bits) => format!("int{bits}"),
            AbiType::FixedBytes(size) => format!("bytes{size}"),
            AbiType::Bytes => "bytes".to_string(),
            AbiType::String => "string".to_string(),
            AbiType::Array(inner) => format!("{}[]", inner.canonical()),
            AbiType::FixedArray(inner, len) => format!("{}[{len}]", inner.canonical()),
            AbiType::Tuple(components) => format!("({})", canonical_list(components)),
        }
    }

    /// JSON-ABI rendering: the type string with tuples spelled `tuple`, and
    /// the tuple components if the innermost element is a tuple.
    fn json_parts(&self) -> (String, &[AbiParameter]) {
        match self {
            AbiType::Tuple(components) => ("tuple".to_string(), components),
            AbiType::Array(inner) => {
                let (base, components) = inner.json_parts();
                (format!("{base}[]"), components)
            }
            AbiType::FixedArray(inner, len) => {
                let (base, components) = inner.json_parts();
                (format!("{base}[{len}]"), components)
            }
            other => (other.canonical(), &[]),
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Comma-joined canonical types of a parameter list, names omitted
pub fn canonical_list(params: &[AbiParameter]) -> String {
    params
        .iter()
        .map(|p| p.ty.canonical())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_size(digits: &str) -> Option<usize> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

fn invalid(s: &str) -> CodecError {
    CodecError::InvalidType(format!("unknown type: {s}"))
}

/// A named, typed slot in a function, error or event signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParameter", into = "RawParameter")]
pub struct AbiParameter {
    /// Parameter name; `None` when the ABI leaves it blank
    pub name: Option<String>,
    /// Parameter type
    pub ty: AbiType,
    /// Whether an event parameter is stored in a topic
    pub indexed: bool,
    /// Compiler-level type name, kept for round-tripping JSON
    pub internal_type: Option<String>,
}

impl AbiParameter {
    /// Unnamed parameter
    pub fn new(ty: AbiType) -> Self {
        Self {
            name: None,
            ty,
            indexed: false,
            internal_type: None,
        }
    }

    /// Named parameter
    pub fn named(name: impl Into<String>, ty: AbiType) -> Self {
        let name = name.into();
        Self {
            name: (!name.is_empty()).then_some(name),
            ..Self::new(ty)
        }
    }

    /// Mark as an indexed event parameter
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Parameter with a type parsed from its JSON-ABI string
    pub fn parse(name: impl Into<String>, ty: &str) -> Result<Self> {
        Ok(Self::named(name, AbiType::parse(ty, &[])?))
    }

    /// Parameter name or `""`
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Wire shape of a parameter in JSON ABI files
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParameter {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    components: Vec<AbiParameter>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    indexed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    internal_type: Option<String>,
}

impl TryFrom<RawParameter> for AbiParameter {
    type Error = CodecError;

    fn try_from(raw: RawParameter) -> Result<Self> {
        let ty = AbiType::parse(&raw.ty, &raw.components)?;
        Ok(AbiParameter {
            name: (!raw.name.is_empty()).then_some(raw.name),
            ty,
            indexed: raw.indexed,
            internal_type: raw.internal_type,
        })
    }
}

impl From<AbiParameter> for RawParameter {
    fn from(param: AbiParameter) -> Self {
        let (ty, components) = param.ty.json_parts();
        RawParameter {
            name: param.name.clone().unwrap_or_default(),
            ty,
            components: components.to_vec(),
            indexed: param.indexed,
            internal_type: param.internal_type,
        }
    }
}
