//! C9: structured audit events. Each event name carries a fixed set of
//! required fields; emitting with a field missing is a bug in the
//! caller, not a transient condition, so it comes back as an error
//! rather than being silently dropped.
//!
//! Events are logged through `tracing` at the `naas::audit` target as a
//! single structured JSON value, one per emission, so they can be
//! shipped to whatever the deployment's log pipeline is without this
//! crate knowing about it.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Str(&'a str),
    Int(i64),
    Bool(bool),
}

impl Field<'_> {
    fn to_json(self) -> serde_json::Value {
        match self {
            Field::Str(s) => serde_json::Value::String(s.to_string()),
            Field::Int(i) => serde_json::Value::Number(i.into()),
            Field::Bool(b) => serde_json::Value::Bool(b),
        }
    }
}

fn required_fields(event: &str) -> Result<&'static [&'static str]> {
    Ok(match event {
        "job.submitted" => &["ip", "platform", "port", "command_count", "user_hash", "request_id"],
        "job.completed" => &["request_id", "status", "duration_ms"],
        "job.cancelled" => &["request_id", "cancelled_by_hash"],
        "device.locked_out" => &["ip", "failure_count"],
        "circuit.opened" => &["ip"],
        "circuit.closed" => &["ip"],
        other => return Err(Error::Internal(format!("unknown audit event: {other}"))),
    })
}

/// Emit `event` with `fields`, rejecting the call if a field the event's
/// schema requires is absent.
pub fn emit(event: &str, fields: &[(&str, Field)]) -> Result<()> {
    let required = required_fields(event)?;
    let present: BTreeMap<&str, Field> = fields.iter().copied().collect();

    for name in required {
        if !present.contains_key(name) {
            return Err(Error::Internal(format!(
                "audit event {event} missing required field {name}"
            )));
        }
    }

    let mut payload = serde_json::Map::new();
    payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));
    for (key, value) in fields {
        payload.insert((*key).to_string(), value.to_json());
    }

    let rendered = serde_json::Value::Object(payload);
    tracing::info!(target: "naas::audit", audit = %rendered);
    Ok(())
}
