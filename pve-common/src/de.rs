///! Lenient field deserializers
///!
///! The access API is loosely typed: flags come back as `1`, `"1"` or `true`,
///! list fields are sometimes comma-separated strings and unset fields may be
///! sent as `null`. These helpers accept every shape the server is known to
///! produce and reject only structural mismatches (an object where a scalar
///! is expected, and so on).

use serde::de::{Deserialize, Deserializer, Error, Unexpected};
use serde_json::Value;
use std::collections::BTreeSet;

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) => Unexpected::Float(f),
            None => Unexpected::Other("number"),
        },
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Boolean flag sent as `0`/`1`, a JSON boolean or a numeric string.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        Value::String(s) => match s.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(D::Error::invalid_value(unexpected(&value), &"0, 1 or a boolean")),
        },
        _ => Err(D::Error::invalid_type(unexpected(&value), &"0, 1 or a boolean")),
    }
}

/// Unix timestamp; `0` means "never". Floats are truncated.
pub fn epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::invalid_value(unexpected(&value), &"a unix timestamp")),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .or_else(|_| s.trim().parse::<f64>().map(|f| f as i64))
            .map_err(|_| D::Error::invalid_value(unexpected(&value), &"a unix timestamp")),
        _ => Err(D::Error::invalid_type(unexpected(&value), &"a unix timestamp")),
    }
}

fn split_list(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split([',', ';', ' '])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn strings<'de, D>(items: Vec<Value>) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(D::Error::invalid_type(unexpected(&other), &"a string")),
        })
        .collect()
}

/// List of identifiers, either a JSON array or a comma-separated string.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => strings::<D>(items),
        Value::String(s) => Ok(split_list(&s).collect()),
        other => Err(D::Error::invalid_type(unexpected(&other), &"a list of strings")),
    }
}

/// Privilege set. The per-role endpoint returns `{"Priv.Name": 1, ...}`,
/// the role index returns `"Priv.A,Priv.B"`; only the names are kept.
pub fn privilege_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(BTreeSet::new()),
        Value::Object(map) => Ok(map.into_iter().map(|(name, _)| name).collect()),
        Value::Array(items) => Ok(strings::<D>(items)?.into_iter().collect()),
        Value::String(s) => Ok(split_list(&s).collect()),
        other => Err(D::Error::invalid_type(unexpected(&other), &"a set of privileges")),
    }
}
