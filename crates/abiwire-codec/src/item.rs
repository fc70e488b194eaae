//! ABI items: functions, errors, events and the contract-level entries

use abiwire_crypto::keccak256;
use abiwire_primitives::{Selector, H256};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{canonical_list, AbiParameter};

/// Function state mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    /// Reads nothing from state
    Pure,
    /// Reads but does not modify state
    View,
    /// Modifies state, rejects value
    #[default]
    NonPayable,
    /// Modifies state, accepts value
    Payable,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// Function name
    pub name: String,
    /// Input parameters
    #[serde(default)]
    pub inputs: Vec<AbiParameter>,
    /// Output parameters
    #[serde(default)]
    pub outputs: Vec<AbiParameter>,
    /// State mutability
    #[serde(default)]
    pub state_mutability: StateMutability,
}

impl Function {
    /// Create a new non-payable function definition
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<AbiParameter>,
        outputs: Vec<AbiParameter>,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
            state_mutability: StateMutability::NonPayable,
        }
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        signature(&self.name, &self.inputs)
    }

    /// First four bytes of the signature hash
    pub fn selector(&self) -> Selector {
        keccak256(self.signature()).selector()
    }
}

/// Custom error definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomError {
    /// Error name
    pub name: String,
    /// Error arguments
    #[serde(default)]
    pub inputs: Vec<AbiParameter>,
}

impl CustomError {
    /// Create a new error definition
    pub fn new(name: impl Into<String>, inputs: Vec<AbiParameter>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    /// Canonical signature
    pub fn signature(&self) -> String {
        signature(&self.name, &self.inputs)
    }

    /// First four bytes of the signature hash
    pub fn selector(&self) -> Selector {
        keccak256(self.signature()).selector()
    }
}

/// Event definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Event fields; `indexed` ones live in topics
    #[serde(default)]
    pub inputs: Vec<AbiParameter>,
    /// Anonymous events carry no signature topic
    #[serde(default)]
    pub anonymous: bool,
}

impl Event {
    /// Create a new non-anonymous event definition
    pub fn new(name: impl Into<String>, inputs: Vec<AbiParameter>) -> Self {
        Self {
            name: name.into(),
            inputs,
            anonymous: false,
        }
    }

    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> String {
        signature(&self.name, &self.inputs)
    }

    /// Full signature hash, the value of topic 0
    pub fn topic(&self) -> H256 {
        keccak256(self.signature())
    }
}

/// Constructor definition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    /// Constructor arguments
    #[serde(default)]
    pub inputs: Vec<AbiParameter>,
    /// State mutability
    #[serde(default)]
    pub state_mutability: StateMutability,
}

/// Fallback or receive entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Special {
    /// State mutability
    #[serde(default)]
    pub state_mutability: StateMutability,
}

/// Kind of an ABI item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Function
    Function,
    /// Custom error
    Error,
    /// Event
    Event,
    /// Constructor
    Constructor,
    /// Fallback
    Fallback,
    /// Receive
    Receive,
}

/// One entry of a JSON ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiItem {
    /// Function
    Function(Function),
    /// Custom error
    Error(CustomError),
    /// Event
    Event(Event),
    /// Constructor
    Constructor(Constructor),
    /// Fallback
    Fallback(Special),
    /// Receive
    Receive(Special),
}

impl AbiItem {
    /// Item kind
    pub fn kind(&self) -> ItemKind {
        match self {
            AbiItem::Function(_) => ItemKind::Function,
            AbiItem::Error(_) => ItemKind::Error,
            AbiItem::Event(_) => ItemKind::Event,
            AbiItem::Constructor(_) => ItemKind::Constructor,
            AbiItem::Fallback(_) => ItemKind::Fallback,
            AbiItem::Receive(_) => ItemKind::Receive,
        }
    }

    /// Name of a function, error or event
    pub fn name(&self) -> Option<&str> {
        match self {
            AbiItem::Function(f) => Some(&f.name),
            AbiItem::Error(e) => Some(&e.name),
            AbiItem::Event(e) => Some(&e.name),
            _ => None,
        }
    }

    /// Input parameters; empty for fallback and receive
    pub fn inputs(&self) -> &[AbiParameter] {
        match self {
            AbiItem::Function(f) => &f.inputs,
            AbiItem::Error(e) => &e.inputs,
            AbiItem::Event(e) => &e.inputs,
            AbiItem::Constructor(c) => &c.inputs,
            AbiItem::Fallback(_) | AbiItem::Receive(_) => &[],
        }
    }

    /// Canonical signature of a named item
    pub fn signature(&self) -> Option<String> {
        self.name().map(|name| signature(name, self.inputs()))
    }

    /// Function, if this is one
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            AbiItem::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Custom error, if this is one
    pub fn as_error(&self) -> Option<&CustomError> {
        match self {
            AbiItem::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Event, if this is one
    pub fn as_event(&self) -> Option<&Event> {
        match self {
            AbiItem::Event(e) => Some(e),
            _ => None,
        }
    }
}

fn signature(name: &str, inputs: &[AbiParameter]) -> String {
    format!("{name}({})", canonical_list(inputs))
}

/// A parsed contract ABI, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abi {
    items: Vec<AbiItem>,
}

impl Abi {
    /// Parse a standard JSON ABI array
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as a JSON ABI array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// All items
    pub fn items(&self) -> &[AbiItem] {
        &self.items
    }

    /// Functions in declaration order
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(AbiItem::as_function)
    }

    /// Custom errors in declaration order
    pub fn errors(&self) -> impl Iterator<Item = &CustomError> {
        self.items.iter().filter_map(AbiItem::as_error)
    }

    /// Events in declaration order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.items.iter().filter_map(AbiItem::as_event)
    }

    /// The constructor, if declared
    pub fn constructor(&self) -> Option<&Constructor> {
        self.items.iter().find_map(|item| match item {
            AbiItem::Constructor(c) => Some(c),
            _ => None,
        })
    }
}

impl From<Vec<AbiItem>> for Abi {
    fn from(items: Vec<AbiItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<AbiItem> for Abi {
    fn from_iter<I: IntoIterator<Item = AbiItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AbiType;

    const ERC20_FRAGMENT: &str = r#"[
        {"type":"constructor","inputs":[{"name":"supply","type":"uint256"}],"stateMutability":"nonpayable"},
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
        {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
        {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}],"anonymous":false},
        {"type":"error","name":"InsufficientBalance","inputs":[{"name":"available","type":"uint256"},{"name":"required","type":"uint256"}]},
        {"type":"receive","stateMutability":"payable"}
    ]"#;

    #[test]
    fn test_parse_json_abi() {
        let abi = Abi::from_json(ERC20_FRAGMENT).unwrap();
        assert_eq!(abi.items().len(), 6);
        assert_eq!(abi.functions().count(), 2);
        assert_eq!(abi.events().count(), 1);
        assert_eq!(abi.errors().count(), 1);
        assert_eq!(abi.constructor().unwrap().inputs.len(), 1);

        let balance_of = abi.functions().nth(1).unwrap();
        assert_eq!(balance_of.state_mutability, StateMutability::View);
        assert_eq!(balance_of.outputs[0].ty, AbiType::Uint(256));
        assert_eq!(abi.items()[5].kind(), ItemKind::Receive);
    }

    #[test]
    fn test_function_selector() {
        let f = Function::new(
            "transfer",
            vec![
                AbiParameter::named("to", AbiType::Address),
                AbiParameter::named("amount", AbiType::Uint(256)),
            ],
            vec![AbiParameter::new(AbiType::Bool)],
        );
        assert_eq!(f.signature(), "transfer(address,uint256)");
        assert_eq!(f.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_event_topic() {
        let abi = Abi::from_json(ERC20_FRAGMENT).unwrap();
        let transfer = abi.events().next().unwrap();
        assert_eq!(transfer.signature(), "Transfer(address,address,uint256)");
        assert_eq!(
            transfer.topic().to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_tuple_signature_expands_components() {
        let order = AbiType::Tuple(vec![
            AbiParameter::named("maker", AbiType::Address),
            AbiParameter::named("amounts", AbiType::FixedArray(Box::new(AbiType::Uint(256)), 2)),
        ]);
        let f = Function::new(
            "fill",
            vec![AbiParameter::named("orders", AbiType::Array(Box::new(order)))],
            vec![],
        );
        assert_eq!(f.signature(), "fill((address,uint256[2])[])");
    }

    #[test]
    fn test_item_accessors() {
        let abi = Abi::from_json(ERC20_FRAGMENT).unwrap();
        let items = abi.items();
        assert_eq!(items[0].name(), None);
        assert_eq!(items[0].signature(), None);
        assert_eq!(items[4].signature().as_deref(), Some("InsufficientBalance(uint256,uint256)"));
        assert!(items[5].inputs().is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let abi = Abi::from_json(ERC20_FRAGMENT).unwrap();
        let again = Abi::from_json(&abi.to_json().unwrap()).unwrap();
        assert_eq!(abi, again);
    }

    #[test]
    fn test_unknown_item_type_rejected() {
        assert!(Abi::from_json(r#"[{"type":"modifier","name":"onlyOwner"}]"#).is_err());
    }
}
