//! Contract interaction helpers

use abiwire_primitives::H256;

use crate::config::CodecConfig;
use crate::decode::decode;
use crate::encode::{encode, encode_with_selector};
use crate::error::{CodecError, Result};
use crate::event::{decode_event_fields, encode_event_topics};
use crate::function::{decode_error_result_with, decode_function_data_with, encode_deploy_data, DecodedError};
use crate::item::{Abi, AbiItem, Event, Function, ItemKind, StateMutability};
use crate::resolve::{Lookup, Resolver};
use crate::types::{AbiParameter, AbiType};
use crate::value::{Decoded, Value};

/// Contract helper for encoding and decoding calls, results, reverts and
/// logs against one ABI
#[derive(Debug, Clone)]
pub struct Contract {
    abi: Abi,
    resolver: Resolver,
}

impl Contract {
    /// Create a contract helper with the default configuration
    pub fn new(abi: Abi) -> Self {
        Self::with_resolver(abi, Resolver::default())
    }

    /// Create a contract helper with a custom configuration
    pub fn with_config(abi: Abi, config: CodecConfig) -> Self {
        Self::with_resolver(abi, Resolver::new(config))
    }

    /// Create a contract helper around an existing resolver, e.g. one whose
    /// signature cache is shared with other contracts
    pub fn with_resolver(abi: Abi, resolver: Resolver) -> Self {
        Self { abi, resolver }
    }

    /// Parse a JSON ABI
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Abi::from_json(json)?))
    }

    /// The ABI
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// The resolver
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Get a function by name, signature or selector
    pub fn function(&self, lookup: impl Into<Lookup>) -> Result<&Function> {
        let lookup = lookup.into().of_kind(ItemKind::Function);
        self.resolver
            .extract(&self.abi, &lookup)?
            .as_function()
            .ok_or_else(|| CodecError::SelectorNotFound(lookup.query.to_string()))
    }

    /// Get an event by name or signature
    pub fn event(&self, lookup: impl Into<Lookup>) -> Result<&Event> {
        let lookup = lookup.into().of_kind(ItemKind::Event);
        self.resolver
            .extract(&self.abi, &lookup)?
            .as_event()
            .ok_or_else(|| CodecError::SelectorNotFound(lookup.query.to_string()))
    }

    /// Encode a function call, picking the overload that accepts `args`
    pub fn encode_call(&self, name: &str, args: &[Value]) -> Result<Vec<u8>> {
        let lookup = Lookup::name(name)
            .with_args(args.to_vec())
            .of_kind(ItemKind::Function);
        let resolution = self.resolver.resolve(&self.abi, &lookup)?;
        encode_with_selector(resolution.selector(), resolution.item.inputs(), args)
    }

    /// Identify and decode call data
    pub fn decode_call(&self, data: &[u8]) -> Result<(&Function, Decoded)> {
        decode_function_data_with(&self.resolver, &self.abi, data)
    }

    /// Encode return values of a function
    pub fn encode_output(&self, lookup: impl Into<Lookup>, values: &[Value]) -> Result<Vec<u8>> {
        let function = self.function(lookup)?;
        encode(&function.outputs, values)
    }

    /// Decode return data of a function
    pub fn decode_output(&self, lookup: impl Into<Lookup>, data: &[u8]) -> Result<Decoded> {
        let function = self.function(lookup)?;
        decode(&function.outputs, data, &self.resolver.config().decode)
    }

    /// Decode revert data
    pub fn decode_error(&self, data: &[u8]) -> Result<DecodedError<'_>> {
        decode_error_result_with(&self.resolver, &self.abi, data)
    }

    /// Topic filter for an event; `None` entries match anything
    pub fn event_topics(
        &self,
        lookup: impl Into<Lookup>,
        args: &[Option<Value>],
    ) -> Result<Vec<Option<H256>>> {
        encode_event_topics(self.event(lookup)?, args)
    }

    /// Identify a log by its signature topic and decode it
    pub fn decode_log(&self, topics: &[H256], data: &[u8]) -> Result<(&Event, Decoded)> {
        let (first, rest) = topics
            .split_first()
            .ok_or_else(|| CodecError::SelectorNotFound("log without topics".to_string()))?;
        let lookup = Lookup::topic(*first);
        let event = self
            .resolver
            .extract(&self.abi, &lookup)?
            .as_event()
            .ok_or_else(|| CodecError::SelectorNotFound(lookup.query.to_string()))?;
        let decoded = decode_event_fields(event, rest, data, &self.resolver.config().decode)?;
        Ok((event, decoded))
    }

    /// Creation code followed by the encoded constructor arguments
    pub fn encode_deploy(&self, bytecode: &[u8], args: &[Value]) -> Result<Vec<u8>> {
        encode_deploy_data(self.abi.constructor(), bytecode, args)
    }
}

/// Create an ERC20 contract helper
pub fn erc20() -> Contract {
    fn param(name: &str, ty: AbiType) -> AbiParameter {
        AbiParameter::named(name, ty)
    }
    fn view(name: &str, inputs: Vec<AbiParameter>, output: AbiType) -> AbiItem {
        AbiItem::Function(Function {
            state_mutability: StateMutability::View,
            ..Function::new(name, inputs, vec![AbiParameter::new(output)])
        })
    }
    fn call(name: &str, inputs: Vec<AbiParameter>) -> AbiItem {
        AbiItem::Function(Function::new(name, inputs, vec![AbiParameter::new(AbiType::Bool)]))
    }
    fn event(name: &str, a: &str, b: &str) -> AbiItem {
        AbiItem::Event(Event::new(
            name,
            vec![
                param(a, AbiType::Address).indexed(),
                param(b, AbiType::Address).indexed(),
                param("value", AbiType::Uint(256)),
            ],
        ))
    }

    let abi = Abi::from(vec![
        view("name", vec![], AbiType::String),
        view("symbol", vec![], AbiType::String),
        view("decimals", vec![], AbiType::Uint(8)),
        view("totalSupply", vec![], AbiType::Uint(256)),
        view("balanceOf", vec![param("owner", AbiType::Address)], AbiType::Uint(256)),
        call(
            "transfer",
            vec![param("to", AbiType::Address), param("value", AbiType::Uint(256))],
        ),
        call(
            "approve",
            vec![param("spender", AbiType::Address), param("value", AbiType::Uint(256))],
        ),
        view(
            "allowance",
            vec![param("owner", AbiType::Address), param("spender", AbiType::Address)],
            AbiType::Uint(256),
        ),
        call(
            "transferFrom",
            vec![
                param("from", AbiType::Address),
                param("to", AbiType::Address),
                param("value", AbiType::Uint(256)),
            ],
        ),
        event("Transfer", "from", "to"),
        event("Approval", "owner", "spender"),
    ]);
    Contract::new(abi)
}
