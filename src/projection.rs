//! Client projection cache
//!
//! A browser tab holds one of these: seeded from the full snapshot, then
//! kept current by applying fanout deltas. The merge rule is a deep-path
//! setter: the key is split on every dot, intermediate objects are walked
//! (and created when absent), and the addressed value is replaced
//! wholesale. Applying the same delta twice is a no-op, so a client may
//! see its own mutation echoed back without harm.
//!
//! The server ships the same type so convergence is testable end to end;
//! the browser client implements the identical rule in its reducer.

use serde_json::{Map, Value as JsonValue};

/// Per-tab in-memory copy of the aggregate document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    root: JsonValue,
}

impl Projection {
    pub fn new() -> Self {
        Self {
            root: JsonValue::Object(Map::new()),
        }
    }

    /// Replace the whole cache with a fresh snapshot
    pub fn seed(&mut self, snapshot: JsonValue) {
        self.root = snapshot;
    }

    /// Merge one fanout delta into the cache
    pub fn apply(&mut self, key: &str, value: JsonValue) {
        set_path(&mut self.root, key, value);
    }

    /// Read a dotted path out of the cache
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        let mut node = &self.root;
        for segment in key.split('.') {
            node = node.get(segment)?;
        }
        Some(node)
    }

    pub fn as_value(&self) -> &JsonValue {
        &self.root
    }
}

/// Walk `key`'s dot-separated segments from `root`, creating intermediate
/// objects as needed, and replace the final slot with `value`
pub fn set_path(root: &mut JsonValue, key: &str, value: JsonValue) {
    if key.is_empty() {
        return;
    }

    if !root.is_object() {
        *root = JsonValue::Object(Map::new());
    }

    let mut node = root;
    let mut segments = key.split('.').peekable();
    while let Some(segment) = segments.next() {
        let map = match node.as_object_mut() {
            Some(map) => map,
            None => return,
        };

        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }

        let child = map
            .entry(segment.to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        if !child.is_object() {
            // Non-object in the middle of the path gets replaced; the
            // delta's shape wins over whatever the cache held
            *child = JsonValue::Object(Map::new());
        }
        node = child;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_then_get() {
        let mut projection = Projection::new();
        projection.seed(json!({
            "home": { "hero": { "title": "TechNest" } },
            "statistics": []
        }));
        assert_eq!(projection.get("home.hero.title"), Some(&json!("TechNest")));
        assert_eq!(projection.get("statistics"), Some(&json!([])));
        assert!(projection.get("home.missing").is_none());
    }

    #[test]
    fn test_apply_top_level_key() {
        let mut projection = Projection::new();
        projection.seed(json!({ "statistics": [{ "id": "1" }] }));
        projection.apply("statistics", json!([{ "id": "2" }]));
        assert_eq!(projection.get("statistics"), Some(&json!([{ "id": "2" }])));
    }

    #[test]
    fn test_apply_two_segment_key_preserves_siblings() {
        let mut projection = Projection::new();
        projection.seed(json!({
            "home": {
                "hero": { "title": "old" },
                "vision": { "title": "Our Vision" }
            }
        }));
        projection.apply("home.hero", json!({ "title": "new" }));
        assert_eq!(projection.get("home.hero.title"), Some(&json!("new")));
        assert_eq!(
            projection.get("home.vision.title"),
            Some(&json!("Our Vision"))
        );
    }

    #[test]
    fn test_apply_creates_missing_parents() {
        let mut projection = Projection::new();
        projection.apply("join.hero", json!({ "title": "Join Us" }));
        assert_eq!(projection.get("join.hero.title"), Some(&json!("Join Us")));
    }

    #[test]
    fn test_apply_deep_path() {
        // No depth ceiling: three-segment keys land too
        let mut projection = Projection::new();
        projection.apply("a.b.c", json!(42));
        assert_eq!(projection.get("a.b.c"), Some(&json!(42)));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut projection = Projection::new();
        projection.seed(json!({ "home": { "hero": { "title": "x" } } }));

        projection.apply("home.hero", json!({ "title": "y", "cta1": "Go" }));
        let once = projection.clone();
        projection.apply("home.hero", json!({ "title": "y", "cta1": "Go" }));
        assert_eq!(projection, once);
    }

    #[test]
    fn test_apply_replaces_non_object_intermediate() {
        let mut projection = Projection::new();
        projection.seed(json!({ "home": "corrupt" }));
        projection.apply("home.hero", json!({ "title": "t" }));
        assert_eq!(projection.get("home.hero.title"), Some(&json!("t")));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut projection = Projection::new();
        projection.seed(json!({ "a": 1 }));
        projection.apply("", json!("junk"));
        assert_eq!(projection.as_value(), &json!({ "a": 1 }));
    }
}
