//! Event log topics and data
//!
//! Indexed inputs live in topics, one word each. Static values are stored
//! as their encoded word; `string` and `bytes` are stored as the keccak256
//! of their content and cannot be recovered, so they decode to the 32-byte
//! hash.

use abiwire_crypto::keccak256;
use abiwire_primitives::H256;

use crate::config::DecodeOptions;
use crate::decode::{assemble, decode_value, decode_values};
use crate::encode::encode_value;
use crate::error::{CodecError, Result, Segment};
use crate::item::Event;
use crate::types::{AbiParameter, AbiType};
use crate::value::{Decoded, Value};

/// Build a topic filter for `event`.
///
/// `args` holds one entry per indexed input, in order; `None` (or a missing
/// trailing entry) matches any value. The signature topic comes first unless
/// the event is anonymous.
pub fn encode_event_topics(event: &Event, args: &[Option<Value>]) -> Result<Vec<Option<H256>>> {
    let indexed: Vec<(usize, &AbiParameter)> = event
        .inputs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.indexed)
        .collect();

    if args.len() > indexed.len() {
        return Err(CodecError::count_mismatch(indexed.len(), args.len()));
    }

    let mut topics = Vec::with_capacity(indexed.len() + 1);
    if !event.anonymous {
        topics.push(Some(event.topic()));
    }

    for (n, (position, param)) in indexed.into_iter().enumerate() {
        let topic = match args.get(n) {
            Some(Some(value)) => Some(
                encode_topic(&param.ty, value)
                    .map_err(|e| e.nested(&Segment::component(param, position).render()))?,
            ),
            _ => None,
        };
        topics.push(topic);
    }

    Ok(topics)
}

/// Topic word for one indexed value
fn encode_topic(ty: &AbiType, value: &Value) -> Result<H256> {
    match (ty, value) {
        (AbiType::String, Value::String(s)) => Ok(keccak256(s.as_bytes())),
        (AbiType::Bytes, Value::Bytes(b) | Value::FixedBytes(b)) => Ok(keccak256(b)),
        (AbiType::Array(_) | AbiType::FixedArray(..) | AbiType::Tuple(_), _) => {
            Err(CodecError::invalid_value(format!(
                "cannot filter on indexed {ty}"
            )))
        }
        _ => {
            let word = encode_value(ty, value)?;
            H256::from_slice(&word).map_err(|e| CodecError::invalid_value(e.to_string()))
        }
    }
}

/// Decode a log emitted by `event`
pub fn decode_event_log(
    event: &Event,
    topics: &[H256],
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Decoded> {
    let indexed_topics = if event.anonymous {
        topics
    } else {
        let (first, rest) = topics
            .split_first()
            .ok_or_else(|| CodecError::count_mismatch(indexed_count(event) + 1, 0))?;
        if *first != event.topic() {
            return Err(CodecError::SelectorNotFound(format!(
                "topic {first} does not match {}",
                event.signature()
            )));
        }
        rest
    };

    decode_event_fields(event, indexed_topics, data, options)
}

/// Decode indexed inputs from `topics` (signature topic already removed) and
/// the rest from `data`, merged in declaration order
pub(crate) fn decode_event_fields(
    event: &Event,
    topics: &[H256],
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Decoded> {
    let expected = indexed_count(event);
    if topics.len() != expected {
        let offset = usize::from(!event.anonymous);
        return Err(CodecError::count_mismatch(expected + offset, topics.len() + offset));
    }

    tracing::debug!(event = %event.name, topics = topics.len(), data_len = data.len(), "decoding event log");

    let body: Vec<AbiParameter> = event.inputs.iter().filter(|p| !p.indexed).cloned().collect();
    let mut body_values = decode_values(&body, data, options)?.into_iter();
    let mut topics = topics.iter();

    let mut values = Vec::with_capacity(event.inputs.len());
    for (position, param) in event.inputs.iter().enumerate() {
        let value = if param.indexed {
            let topic = topics
                .next()
                .ok_or_else(|| CodecError::count_mismatch(expected, position))?;
            decode_topic(&param.ty, topic, options)
                .map_err(|e| e.nested(&Segment::component(param, position).render()))?
        } else {
            body_values
                .next()
                .ok_or_else(|| CodecError::count_mismatch(body.len(), position))?
        };
        values.push(value);
    }

    Ok(assemble(&event.inputs, values, options.mode))
}

fn decode_topic(ty: &AbiType, topic: &H256, options: &DecodeOptions) -> Result<Value> {
    match ty {
        AbiType::String
        | AbiType::Bytes
        | AbiType::Array(_)
        | AbiType::FixedArray(..)
        | AbiType::Tuple(_) => Ok(Value::bytes32(*topic)),
        _ => decode_value(ty, topic.as_bytes(), options),
    }
}

fn indexed_count(event: &Event) -> usize {
    event.inputs.iter().filter(|p| p.indexed).count()
}
