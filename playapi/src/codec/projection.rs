//! Generic projections of schema messages for inspection.
//!
//! Both projections walk the same reflected field tree: each message's
//! serde-derived field list, in declaration (tag) order. The walk treats a
//! field as one of three shapes:
//!
//! - scalar (string, number, bool): `name: value`
//! - nested message: `name { ... }`
//! - repeated: the field repeated once per element
//!
//! Unset optional fields and empty repeated fields are omitted, so the
//! output lists exactly the fields present on the wire. Bytes fields are
//! projected as C-escaped strings of their raw bytes.

use std::fmt::Write;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Key that tags an already-escaped bytes field in the reflected tree.
/// Never a valid camelCase field name.
const BYTES_MARKER: &str = "@bytes";

/// Projects a message into a dictionary-like value.
///
/// Nested messages become objects, repeated fields become arrays. Only set
/// fields appear.
pub fn to_value<M: Serialize>(message: &M) -> Value {
    unmark(reflect(message))
}

/// Renders a message as a protobuf text-format style dump.
pub fn to_text<M: Serialize>(message: &M) -> String {
    let mut out = String::new();
    if let Value::Object(fields) = reflect(message) {
        write_fields(&mut out, &fields, 0);
    }
    out
}

/// `serialize_with` helper for optional bytes fields.
pub(crate) fn escaped_bytes<S: Serializer>(
    value: &Option<Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(BYTES_MARKER, &escape(bytes))?;
            map.end()
        }
        None => serializer.serialize_none(),
    }
}

fn reflect<M: Serialize>(message: &M) -> Value {
    serde_json::to_value(message)
        .map(prune)
        .unwrap_or(Value::Null)
}

/// The escaped literal of a tagged bytes field.
fn bytes_literal(value: &Value) -> Option<&str> {
    match value {
        Value::Object(fields) if fields.len() == 1 => fields.get(BYTES_MARKER)?.as_str(),
        _ => None,
    }
}

/// Replaces tagged bytes fields with their escaped string.
fn unmark(value: Value) -> Value {
    if let Some(literal) = bytes_literal(&value) {
        return Value::String(literal.to_string());
    }
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name, unmark(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(unmark).collect()),
        scalar => scalar,
    }
}

/// Drops unset and empty-repeated fields, recursively.
fn prune(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name, prune(value)))
                .filter(|(_, value)| !is_unset(value))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune).collect()),
        scalar => scalar,
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn write_fields(out: &mut String, fields: &Map<String, Value>, depth: usize) {
    for (name, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    write_field(out, name, item, depth);
                }
            }
            single => write_field(out, name, single, depth),
        }
    }
}

fn write_field(out: &mut String, name: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    if let Some(literal) = bytes_literal(value) {
        let _ = writeln!(out, "{}{}: \"{}\"", indent, name, literal);
        return;
    }
    match value {
        Value::Object(fields) => {
            let _ = writeln!(out, "{}{} {{", indent, name);
            write_fields(out, fields, depth + 1);
            let _ = writeln!(out, "{}}}", indent);
        }
        Value::String(s) => {
            let _ = writeln!(out, "{}{}: \"{}\"", indent, name, escape(s.as_bytes()));
        }
        Value::Number(n) => {
            let _ = writeln!(out, "{}{}: {}", indent, name, n);
        }
        Value::Bool(b) => {
            let _ = writeln!(out, "{}{}: {}", indent, name, b);
        }
        // Nested arrays and nulls do not occur in pruned schema messages.
        Value::Array(_) | Value::Null => {}
    }
}

/// C-style escaping as used by protobuf text format. Works on raw bytes;
/// anything outside printable ASCII becomes a three-digit octal escape.
fn escape(bytes: &[u8]) -> String {
    let mut escaped = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\n' => escaped.push_str("\\n"),
            b'\r' => escaped.push_str("\\r"),
            b'\t' => escaped.push_str("\\t"),
            b'"' => escaped.push_str("\\\""),
            b'\'' => escaped.push_str("\\'"),
            b'\\' => escaped.push_str("\\\\"),
            0x20..=0x7e => escaped.push(byte as char),
            other => {
                let _ = write!(escaped, "\\{:03o}", other);
            }
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{
        AndroidAppDeliveryData, DeliveryResponse, DocV2, HttpCookie, Payload, PreFetch,
        ResponseWrapper, SearchResponse,
    };
    use serde_json::json;

    fn delivery() -> DeliveryResponse {
        DeliveryResponse {
            status: Some(1),
            app_delivery_data: Some(AndroidAppDeliveryData {
                download_url: Some("https://dl.example/apk".to_string()),
                download_auth_cookie: vec![
                    HttpCookie {
                        name: Some("MarketDA".to_string()),
                        value: Some("abc".to_string()),
                    },
                    HttpCookie {
                        name: Some("Other".to_string()),
                        value: Some("def".to_string()),
                    },
                ],
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_to_value_lists_only_set_fields() {
        let value = to_value(&delivery());
        assert_eq!(
            value,
            json!({
                "status": 1,
                "appDeliveryData": {
                    "downloadUrl": "https://dl.example/apk",
                    "downloadAuthCookie": [
                        {"name": "MarketDA", "value": "abc"},
                        {"name": "Other", "value": "def"}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_to_value_keeps_empty_but_present_messages() {
        let wrapper = ResponseWrapper {
            payload: Some(Payload::default()),
            ..Default::default()
        };
        assert_eq!(to_value(&wrapper), json!({ "payload": {} }));
    }

    #[test]
    fn test_to_text_nested_and_repeated() {
        let text = to_text(&delivery());
        let expected = "\
status: 1
appDeliveryData {
  downloadUrl: \"https://dl.example/apk\"
  downloadAuthCookie {
    name: \"MarketDA\"
    value: \"abc\"
  }
  downloadAuthCookie {
    name: \"Other\"
    value: \"def\"
  }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_to_text_field_order_follows_schema() {
        let response = SearchResponse {
            original_query: Some("q".to_string()),
            doc: vec![DocV2 {
                docid: Some("d".to_string()),
                title: Some("T".to_string()),
                ..Default::default()
            }],
            aggregate_query: Some(false),
            ..Default::default()
        };
        let text = to_text(&response);
        let query = text.find("originalQuery").unwrap();
        let aggregate = text.find("aggregateQuery").unwrap();
        let doc = text.find("doc {").unwrap();
        assert!(query < aggregate && aggregate < doc);
    }

    #[test]
    fn test_escape_quotes_and_control_bytes() {
        assert_eq!(escape(b"a\"b\n"), "a\\\"b\\n");
        assert_eq!(escape("é".as_bytes()), "\\303\\251");
    }

    #[test]
    fn test_bytes_fields_keep_every_raw_byte() {
        let entry = PreFetch {
            url: Some("details?doc=a".to_string()),
            response: Some(vec![0x08, 0x96, 0x01]),
            ..Default::default()
        };

        assert_eq!(
            to_text(&entry),
            "url: \"details?doc=a\"\nresponse: \"\\010\\226\\001\"\n"
        );
        assert_eq!(
            to_value(&entry),
            json!({ "url": "details?doc=a", "response": "\\010\\226\\001" })
        );
    }

    #[test]
    fn test_bytes_fields_nested_in_repeated_messages() {
        let wrapper = ResponseWrapper {
            pre_fetch: vec![PreFetch {
                response: Some(vec![0xff, b'a']),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(
            to_value(&wrapper),
            json!({ "preFetch": [{ "response": "\\377a" }] })
        );
        assert_eq!(
            to_text(&wrapper),
            "preFetch {\n  response: \"\\377a\"\n}\n"
        );
    }
}
