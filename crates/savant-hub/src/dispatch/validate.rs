//! Tool argument validation against a tool's `inputSchema`.
//!
//! Covers the subset engines declare: `required`, and per-property `type`
//! (`string`, `integer`, `boolean`, `array`, `object`, `null`) or `anyOf`.
//! Values are coerced where the intent is unambiguous (`"3"` → `3`,
//! `7` → `"7"`, `"TRUE"` → `true`). Properties without a schema pass through.

use serde_json::Value;

use savant_core::error::{HubError, Result};

type Coerced = std::result::Result<Value, &'static str>;

/// Check `args` against `schema`, returning the coerced arguments.
///
/// Failures are `HubError::InvalidParams` naming the offending key.
pub fn validate_args(schema: &Value, args: Value) -> Result<Value> {
    let Value::Object(mut args) = args else {
        return Err(invalid("invalid arguments: expected object"));
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for key in required.iter().filter_map(Value::as_str) {
            if args.get(key).map_or(true, Value::is_null) {
                return Err(invalid(format!("missing required: {key}")));
            }
        }
    }

    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            let Some(slot) = args.get_mut(name) else { continue };
            let val = slot.take();
            *slot = coerce(prop, val).map_err(|e| invalid(format!("{name}: {e}")))?;
        }
    }

    Ok(Value::Object(args))
}

fn invalid(msg: impl Into<String>) -> HubError {
    HubError::InvalidParams(msg.into())
}

fn coerce(prop: &Value, val: Value) -> Coerced {
    if let Some(alts) = prop.get("anyOf").and_then(Value::as_array) {
        return coerce_any_of(alts, val);
    }

    match prop.get("type").and_then(Value::as_str) {
        Some("string") => coerce_string(val),
        Some("integer") => coerce_integer(val),
        Some("boolean") => coerce_boolean(val),
        Some("array") => coerce_array(prop, val),
        Some("object") if val.is_object() => Ok(val),
        Some("object") => Err("expected object"),
        _ => Ok(val),
    }
}

/// Prefer the first alternative the value already matches, else the first
/// that coerces.
fn coerce_any_of(alts: &[Value], val: Value) -> Coerced {
    if let Some(alt) = alts.iter().find(|alt| matches_type(alt, &val)) {
        return coerce(alt, val);
    }
    alts.iter()
        .find_map(|alt| coerce(alt, val.clone()).ok())
        .ok_or("value does not match anyOf")
}

fn coerce_string(val: Value) -> Coerced {
    match val {
        Value::Null => Ok(Value::String(String::new())),
        Value::String(_) => Ok(val),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        _ => Err("expected string"),
    }
}

// Null and blank strings stay null so engines can apply their own defaults.
fn coerce_integer(val: Value) -> Coerced {
    match val {
        Value::Null => Ok(Value::Null),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| "invalid integer"),
        Value::Number(ref n) if n.is_i64() || n.is_u64() => Ok(val),
        _ => Err("invalid integer"),
    }
}

fn coerce_boolean(val: Value) -> Coerced {
    match val {
        Value::Null | Value::Bool(_) => Ok(val),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
        _ => Err("invalid boolean"),
    }
}

fn coerce_array(prop: &Value, val: Value) -> Coerced {
    let Value::Array(items) = val else {
        return Err("expected array");
    };

    let string_items = prop.pointer("/items/type").and_then(Value::as_str) == Some("string");
    if !string_items {
        return Ok(Value::Array(items));
    }

    Ok(Value::Array(
        items
            .into_iter()
            .map(|v| match v {
                Value::String(_) => v,
                Value::Null => Value::String(String::new()),
                other => Value::String(other.to_string()),
            })
            .collect(),
    ))
}

fn matches_type(prop: &Value, val: &Value) -> bool {
    match prop.get("type").and_then(Value::as_str) {
        Some("null") => val.is_null(),
        Some("string") => val.is_string() || val.is_number(),
        Some("integer") => {
            val.is_i64()
                || val.is_u64()
                || val
                    .as_str()
                    .is_some_and(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        }
        Some("boolean") => {
            val.is_boolean()
                || val
                    .as_str()
                    .is_some_and(|s| s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"))
        }
        Some("array") => val.is_array(),
        Some("object") => val.is_object(),
        _ => true,
    }
}
