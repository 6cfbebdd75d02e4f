//! Dot-separated path lookup inside parsed JSON documents.
//!
//! Segments are object field names or array indices:
//! `"responseData.contentBoard.0.dataBlob"`. Lookup never fails loudly: a
//! missing field, a type mismatch or an out-of-range index all yield `None`.

use serde_json::Value;

/// Resolve `path` against `root`. An empty path returns `root` itself.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, step)
}

/// Resolve `path` and require the result to be an array.
pub fn resolve_array<'a>(root: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    resolve_path(root, path).and_then(Value::as_array)
}

/// Resolve `path` and require the result to be a string.
pub fn resolve_str<'a>(root: &'a Value, path: &str) -> Option<&'a str> {
    resolve_path(root, path).and_then(Value::as_str)
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "SVCResponse": {
                "responseData": {
                    "responseBody": {
                        "dataBlob": [{"key": "k1"}, {"key": "k2"}]
                    }
                }
            },
            "status": "SUCCESS",
            "count": 3
        })
    }

    #[test]
    fn test_nested_fields_and_indices() {
        let d = doc();
        let blobs = resolve_array(&d, "SVCResponse.responseData.responseBody.dataBlob");
        assert_eq!(blobs.map(Vec::len), Some(2));
        assert_eq!(
            resolve_str(&d, "SVCResponse.responseData.responseBody.dataBlob.1.key"),
            Some("k2")
        );
        assert_eq!(resolve_str(&d, "status"), Some("SUCCESS"));
    }

    #[test]
    fn test_missing_paths_are_none() {
        let d = doc();
        assert!(resolve_path(&d, "SVCResponse.nope").is_none());
        assert!(resolve_path(&d, "SVCResponse.responseData.responseBody.dataBlob.5").is_none());
        assert!(resolve_path(&d, "SVCResponse.responseData.responseBody.dataBlob.x").is_none());
        assert!(resolve_path(&d, "count.inner").is_none());
        assert!(resolve_array(&d, "status").is_none());
    }

    #[test]
    fn test_empty_path_is_root() {
        let d = doc();
        assert_eq!(resolve_path(&d, ""), Some(&d));
    }

    #[test]
    fn test_numeric_object_keys() {
        let d = json!({"0": {"v": true}});
        assert_eq!(resolve_path(&d, "0.v"), Some(&Value::Bool(true)));
    }
}
