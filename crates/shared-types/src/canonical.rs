//! # Canonical Serialization
//!
//! Deterministic JSON used for every signed byte string and every hash:
//! object keys sorted lexicographically at every depth, no whitespace.
//! Two structurally equal values always produce identical bytes.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::entities::Action;
use crate::errors::TypesError;

/// Serialize `value` to canonical JSON.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, TypesError> {
    let value = serde_json::to_value(value)?;
    let mut out = String::new();
    write_value(&value, &mut out)?;
    Ok(out)
}

/// Content hash of an action: `0x` + hex(SHA-256(canonical_json(action))).
pub fn action_hash(action: &Action) -> Result<String, TypesError> {
    let bytes = canonical_json(action)?;
    let digest = Sha256::digest(bytes.as_bytes());
    Ok(format!("0x{}", hex::encode(digest)))
}

fn write_value(value: &Value, out: &mut String) -> Result<(), TypesError> {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_value(&map[key.as_str()], out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ActionPayload, CallArgs};
    use serde_json::json;

    #[test]
    fn test_keys_sorted_at_every_depth() {
        let value = json!({"b": 1, "a": {"z": [3, {"y": 1, "x": 2}], "c": null}});
        let out = canonical_json(&value).unwrap();
        assert_eq!(out, r#"{"a":{"c":null,"z":[3,{"x":2,"y":1}]},"b":1}"#);
    }

    #[test]
    fn test_strings_are_escaped() {
        let out = canonical_json(&json!({"k": "line\n\"quoted\""})).unwrap();
        assert_eq!(out, r#"{"k":"line\n\"quoted\""}"#);
    }

    fn action(title: &str) -> Action {
        let mut args = CallArgs::new();
        args.insert("title".to_string(), json!(title));
        Action::new(
            ActionPayload {
                app: "app".to_string(),
                block: None,
                call: "thread".to_string(),
                call_args: args,
                chain: "eip155:1".to_string(),
                from: "0x1".to_string(),
                timestamp: 1,
            },
            "0x1",
            "0xsig",
        )
    }

    #[test]
    fn test_action_hash_deterministic() {
        let a = action("hello");
        assert_eq!(action_hash(&a).unwrap(), action_hash(&a.clone()).unwrap());
        assert!(action_hash(&a).unwrap().starts_with("0x"));
        assert_eq!(action_hash(&a).unwrap().len(), 66);
    }

    #[test]
    fn test_action_hash_sensitive_to_args() {
        // "hello" and "helln" differ in one bit of the last byte.
        assert_ne!(
            action_hash(&action("hello")).unwrap(),
            action_hash(&action("helln")).unwrap()
        );
    }
}
