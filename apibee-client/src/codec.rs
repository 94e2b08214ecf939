//! Structured-data codecs used by hooks.

use std::io;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;

use crate::{ApiError, Result};

/// Encoder/decoder for a structured-data format.
pub trait Codec: Send + Sync {
    /// Encode a value into its textual form.
    fn encode(&self, value: &Value) -> Result<String>;

    /// Decode text into a value.
    fn decode(&self, raw: &str) -> Result<Value>;
}

/// JSON codec. Object keys are written in sorted order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(&sorted(value))?)
    }

    fn decode(&self, raw: &str) -> Result<Value> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// JSON codec writing `", "` and `": "` separators, the layout many
/// dynamic-language JSON encoders emit by default. Keys are sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedJsonCodec;

impl Codec for SpacedJsonCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        sorted(value).serialize(&mut serializer)?;
        String::from_utf8(out).map_err(|e| ApiError::Codec(e.to_string()))
    }

    fn decode(&self, raw: &str) -> Result<Value> {
        JsonCodec.decode(raw)
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

// Rebuilds objects through a BTreeMap so key order does not depend on
// serde_json's map backend.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered: std::collections::BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, sorted(v))).collect();
            Value::Object(ordered.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
