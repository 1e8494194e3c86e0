//! Key-case conversion between the client's camelCase view and the
//! snake_case wire format.
//!
//! Only mapping keys are rewritten. Array order, nesting and every scalar
//! (strings, numbers, booleans, null, timestamps carried as strings) are left
//! as they are.

use serde_json::{Map, Value};

/// Rewrite a camelCase key as snake_case.
///
/// A boundary is placed before an uppercase ASCII letter that follows a
/// lowercase letter or digit, and before the last capital of an acronym run
/// that is followed by a lowercase letter (`HTTPServer` -> `http_server`).
/// Keys without uppercase letters come back unchanged.
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            out.push(c);
            continue;
        }
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
            _ => false,
        };
        if boundary {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Rewrite a snake_case key as camelCase.
///
/// Leading and trailing underscores survive (`_links` stays `_links`).
/// Keys without inner underscores come back unchanged.
pub fn to_camel_case(key: &str) -> String {
    let body = key.trim_matches('_');
    if body.is_empty() {
        return key.to_string();
    }
    let leading = key.len() - key.trim_start_matches('_').len();
    let trailing = key.len() - key.trim_end_matches('_').len();

    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..leading]);
    let mut upper_next = false;
    for c in body.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out.push_str(&key[key.len() - trailing..]);
    out
}

/// Convert every mapping key, at every depth, to snake_case.
pub fn keys_to_snake(value: Value) -> Value {
    map_keys(value, &to_snake_case)
}

/// Convert every mapping key, at every depth, to camelCase.
pub fn keys_to_camel(value: Value) -> Value {
    map_keys(value, &to_camel_case)
}

fn map_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => {
            let converted: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (rename(&k), map_keys(v, rename)))
                .collect();
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(|v| map_keys(v, rename)).collect()),
        scalar => scalar,
    }
}
