//! Document projection helpers
//!
//! Shape loosely typed documents at the JSON boundary: `project` keeps only
//! the named keys, `omit` drops them. Both are shallow and pure; nested
//! objects are not filtered recursively. Typed public views (the
//! `*Public` structs in `models`) are preferred for response shaping; these
//! helpers cover the places where documents are still handled as raw maps.

use serde_json::{Map, Value};

/// Keep only the named keys present in `doc`
pub fn project(doc: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for key in keys {
        if let Some(value) = doc.get(*key) {
            out.insert((*key).to_string(), value.clone());
        }
    }
    out
}

/// Drop the named keys; a missing key is a no-op
pub fn omit(doc: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    let mut out = doc.clone();
    for key in keys {
        out.remove(*key);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Map<String, Value> {
        json!({
            "id": "users:abc",
            "name": "Rosa",
            "password": "secret-hash",
            "tokens": ["t1"]
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_project_keeps_only_named_keys() {
        let out = project(&sample(), &["id", "name", "missing"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out["name"], "Rosa");
        assert!(!out.contains_key("password"));
    }

    #[test]
    fn test_omit_drops_named_keys() {
        let out = omit(&sample(), &["password", "tokens", "not_there"]);
        assert_eq!(out.len(), 2);
        assert!(out.contains_key("id"));
        assert!(out.contains_key("name"));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let once = project(&omit(&sample(), &["password"]), &["id", "name"]);
        let twice = project(&omit(&once, &["password"]), &["id", "name"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_projection_is_shallow() {
        let doc = json!({"client": {"id": "users:abc", "password": "hash"}})
            .as_object()
            .unwrap()
            .clone();
        let out = project(&doc, &["client"]);
        // Nested objects pass through untouched
        assert_eq!(out["client"]["password"], "hash");
    }
}
