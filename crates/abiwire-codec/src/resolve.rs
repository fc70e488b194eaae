//! ABI item lookup and overload resolution
//!
//! A [`Lookup`] names an item by name, canonical signature, selector, call
//! data or event topic. When several items survive the query:
//!
//! - with arguments, candidates are tried in declaration order and the
//!   first one whose inputs accept the arguments wins; every rejected
//!   candidate is kept in [`Resolution::attempts`]
//! - without arguments the lookup fails with
//!   [`CodecError::AmbiguousOverload`]
//!
//! An item declared twice with the same canonical signature resolves to
//! its first declaration. Distinct signatures that share a selector are
//! ambiguous.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use abiwire_primitives::{Selector, H256};

use crate::cache::SignatureCache;
use crate::config::CodecConfig;
use crate::encode::encode;
use crate::error::{CodecError, Result};
use crate::item::{Abi, AbiItem, ItemKind};
use crate::value::Value;

/// What to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Item name, e.g. `balanceOf`
    Name(String),
    /// Canonical signature, e.g. `balanceOf(address)`
    Signature(String),
    /// Four-byte function or error selector
    Selector(Selector),
    /// Call or revert data; its first four bytes are the selector
    CallData(Vec<u8>),
    /// Event signature topic
    Topic(H256),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Name(name) => write!(f, "{name}"),
            Query::Signature(sig) => write!(f, "{sig}"),
            Query::Selector(sel) => write!(f, "0x{}", hex::encode(sel)),
            Query::CallData(data) => {
                write!(f, "0x{}", hex::encode(&data[..data.len().min(4)]))
            }
            Query::Topic(topic) => write!(f, "{topic}"),
        }
    }
}

/// A query plus the optional context that narrows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// What to match
    pub query: Query,
    /// Arguments used to pick between overloads
    pub args: Option<Vec<Value>>,
    /// Restrict candidates to one item kind
    pub kind: Option<ItemKind>,
}

impl Lookup {
    /// Look up by bare name, or by signature if `name` contains `(`
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        let query = if name.contains('(') {
            Query::Signature(name)
        } else {
            Query::Name(name)
        };
        Self::new(query)
    }

    /// Look up by four-byte selector
    pub fn selector(selector: Selector) -> Self {
        Self::new(Query::Selector(selector))
    }

    /// Look up by the selector prefix of call or revert data
    pub fn call_data(data: impl Into<Vec<u8>>) -> Self {
        Self::new(Query::CallData(data.into()))
    }

    /// Look up an event by signature topic
    pub fn topic(topic: H256) -> Self {
        Self::new(Query::Topic(topic)).of_kind(ItemKind::Event)
    }

    fn new(query: Query) -> Self {
        Self {
            query,
            args: None,
            kind: None,
        }
    }

    /// Disambiguate overloads by trial-encoding these arguments
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = Some(args);
        self
    }

    /// Only consider items of this kind
    pub fn of_kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl From<&str> for Lookup {
    fn from(name: &str) -> Self {
        Lookup::name(name)
    }
}

impl From<String> for Lookup {
    fn from(name: String) -> Self {
        Lookup::name(name)
    }
}

impl From<Query> for Lookup {
    fn from(query: Query) -> Self {
        Lookup::new(query)
    }
}

/// A candidate rejected during overload resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Canonical signature of the candidate
    pub signature: String,
    /// Why the arguments did not encode against it
    pub error: CodecError,
}

/// Outcome of a successful lookup
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// The chosen item
    pub item: &'a AbiItem,
    /// Its canonical signature
    pub signature: String,
    /// keccak256 of the signature
    pub hash: H256,
    /// Overloads tried and rejected before `item`, in order
    pub attempts: Vec<Attempt>,
}

impl Resolution<'_> {
    /// Function or error selector
    pub fn selector(&self) -> Selector {
        self.hash.selector()
    }
}

struct Candidate<'a> {
    item: &'a AbiItem,
    signature: String,
    hash: H256,
}

/// Resolves lookups against an ABI, memoizing signature hashes
#[derive(Debug, Clone)]
pub struct Resolver {
    cache: Arc<SignatureCache>,
    config: CodecConfig,
}

impl Resolver {
    /// Create a resolver with its own cache
    pub fn new(config: CodecConfig) -> Self {
        let cache = if config.cache_signatures {
            SignatureCache::new()
        } else {
            SignatureCache::disabled()
        };
        Self::with_cache(config, Arc::new(cache))
    }

    /// Create a resolver sharing an existing cache
    pub fn with_cache(config: CodecConfig, cache: Arc<SignatureCache>) -> Self {
        Self { cache, config }
    }

    /// The signature cache
    pub fn cache(&self) -> &Arc<SignatureCache> {
        &self.cache
    }

    /// The configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Find the single item matching `lookup`
    pub fn extract<'a>(&self, abi: &'a Abi, lookup: &Lookup) -> Result<&'a AbiItem> {
        self.resolve(abi, lookup).map(|resolution| resolution.item)
    }

    /// Find the single item matching `lookup`, reporting rejected overloads
    pub fn resolve<'a>(&self, abi: &'a Abi, lookup: &Lookup) -> Result<Resolution<'a>> {
        let mut candidates = self.candidates(abi, lookup)?;

        if candidates.is_empty() {
            return Err(CodecError::SelectorNotFound(lookup.query.to_string()));
        }
        if candidates.len() == 1 {
            let only = candidates.remove(0);
            tracing::debug!(query = %lookup.query, signature = %only.signature, "resolved ABI item");
            return Ok(resolution(only, Vec::new()));
        }

        let Some(args) = &lookup.args else {
            return Err(CodecError::AmbiguousOverload {
                name: lookup.query.to_string(),
                candidates: candidates.into_iter().map(|c| c.signature).collect(),
            });
        };

        let mut attempts = Vec::new();
        for candidate in candidates {
            match encode(candidate.item.inputs(), args) {
                Ok(_) => {
                    tracing::debug!(
                        query = %lookup.query,
                        signature = %candidate.signature,
                        rejected = attempts.len(),
                        "resolved overload"
                    );
                    return Ok(resolution(candidate, attempts));
                }
                Err(error) => {
                    tracing::debug!(signature = %candidate.signature, %error, "overload rejected");
                    attempts.push(Attempt {
                        signature: candidate.signature,
                        error,
                    });
                }
            }
        }

        Err(CodecError::SelectorNotFound(format!(
            "no overload of {} accepts the arguments (tried {})",
            lookup.query,
            attempts
                .iter()
                .map(|a| a.signature.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    /// Items matching the query, first declaration of each signature only
    fn candidates<'a>(&self, abi: &'a Abi, lookup: &Lookup) -> Result<Vec<Candidate<'a>>> {
        let selector = match &lookup.query {
            Query::Selector(selector) => Some(*selector),
            Query::CallData(data) => Some(call_selector(data)?),
            _ => None,
        };
        let wanted_signature = match &lookup.query {
            Query::Signature(sig) => Some(normalize_signature(sig)),
            _ => None,
        };

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for item in abi.items() {
            if lookup.kind.is_some_and(|kind| kind != item.kind()) {
                continue;
            }
            let (Some(name), Some(signature)) = (item.name(), item.signature()) else {
                continue;
            };

            let matches = match &lookup.query {
                Query::Name(wanted) => name == wanted,
                Query::Signature(_) => wanted_signature.as_deref() == Some(signature.as_str()),
                Query::Selector(_) | Query::CallData(_) => {
                    item.kind() != ItemKind::Event
                        && selector == Some(self.cache.selector(&signature))
                }
                Query::Topic(topic) => {
                    item.as_event().is_some_and(|event| !event.anonymous)
                        && self.cache.topic(&signature) == *topic
                }
            };

            if matches && seen.insert(signature.clone()) {
                let hash = self.cache.hash(&signature);
                candidates.push(Candidate {
                    item,
                    signature,
                    hash,
                });
            }
        }

        Ok(candidates)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

fn resolution(candidate: Candidate<'_>, attempts: Vec<Attempt>) -> Resolution<'_> {
    Resolution {
        item: candidate.item,
        signature: candidate.signature,
        hash: candidate.hash,
        attempts,
    }
}

/// First four bytes of call data
pub(crate) fn call_selector(data: &[u8]) -> Result<Selector> {
    data.get(..4)
        .and_then(|prefix| <Selector>::try_from(prefix).ok())
        .ok_or(CodecError::BufferTooSmall {
            needed: 4,
            available: data.len(),
        })
}

fn normalize_signature(signature: &str) -> String {
    signature.chars().filter(|c| !c.is_whitespace()).collect()
}
