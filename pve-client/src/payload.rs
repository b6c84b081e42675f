///! Response envelope handling
///!
///! Every PVE response is `{"data": ...}`. The transport unwraps it into a
///! [`Payload`] so resource code can ask for the shape its endpoint returns.

use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Unwrapped `data` field of a response envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl Payload {
    /// Parse a response body. Anything but an object with an object or
    /// array `data` field is a protocol error.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let envelope: Value = serde_json::from_slice(body)
            .map_err(|e| ClientError::protocol(format!("response is not JSON: {}", e)))?;

        let Value::Object(mut envelope) = envelope else {
            return Err(ClientError::protocol("response is not a JSON object"));
        };

        match envelope.remove("data") {
            Some(Value::Object(map)) => Ok(Payload::Object(map)),
            Some(Value::Array(items)) => Ok(Payload::Array(items)),
            Some(Value::Null) | None => Err(ClientError::protocol("response has no data")),
            Some(other) => Err(ClientError::protocol(format!(
                "response data is a {}, expected an object or array",
                kind(&other)
            ))),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Payload::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Payload::Array(_))
    }

    pub fn into_object(self) -> Result<Map<String, Value>> {
        match self {
            Payload::Object(map) => Ok(map),
            Payload::Array(_) => Err(ClientError::protocol("expected an object, got an array")),
        }
    }

    pub fn into_array(self) -> Result<Vec<Value>> {
        match self {
            Payload::Array(items) => Ok(items),
            Payload::Object(_) => Err(ClientError::protocol("expected an array, got an object")),
        }
    }

    /// Array payload whose elements are all objects, as index endpoints return
    pub fn into_objects(self) -> Result<Vec<Map<String, Value>>> {
        self.into_array()?
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(ClientError::protocol(format!(
                    "expected an array of objects, found a {}",
                    kind(&other)
                ))),
            })
            .collect()
    }

    pub fn into_value(self) -> Value {
        match self {
            Payload::Object(map) => Value::Object(map),
            Payload::Array(items) => Value::Array(items),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Materialize an object payload into a record.
///
/// Field names are matched case-insensitively, unknown fields are ignored
/// and `null` counts as missing, so missing fields take the record's
/// default. A field of the wrong structure is a decode error.
pub fn decode_record<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T> {
    let folded: Map<String, Value> = map
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.to_ascii_lowercase(), value))
        .collect();

    Ok(serde_json::from_value(Value::Object(folded))?)
}

/// Read a string field from an index entry
pub fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::protocol(format!("missing string field '{}'", key)))
}
