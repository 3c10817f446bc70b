use serde_json::Value;

/// Re-serializes a JSON document with sorted keys and no insignificant whitespace.
pub fn normalize_json_string(document: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(document)?;
    serde_json::to_string(&sorted(value))
}

// serde_json keeps insertion order when `preserve_order` is unified in, so sort explicitly.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sorted(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_and_key_order_are_canonical() {
        let a = normalize_json_string("{\n  \"Version\": \"2012-10-17\",\n  \"Statement\": []\n}").unwrap();
        let b = normalize_json_string(r#"{"Statement":[],"Version":"2012-10-17"}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, r#"{"Statement":[],"Version":"2012-10-17"}"#);
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let out = normalize_json_string(r#"{"b":{"z":1,"y":2},"a":0}"#).unwrap();
        assert_eq!(out, r#"{"a":0,"b":{"y":2,"z":1}}"#);
    }

    #[test]
    fn test_array_order_is_preserved() {
        let out = normalize_json_string("[3, 1, 2]").unwrap();
        assert_eq!(out, "[3,1,2]");
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        assert!(normalize_json_string("{not json").is_err());
    }
}
