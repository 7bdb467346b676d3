//! Building and merging nested metadata mappings.

use serde_json::{Map, Value};

/// Wrap `leaf` in one nested object per level, outermost first.
///
/// `nest(&["a", "b"], 1)` gives `{"a": {"b": 1}}`.
pub fn nest<S: AsRef<str>>(levels: &[S], leaf: Value) -> Value {
    levels.iter().rev().fold(leaf, |inner, level| {
        let mut map = Map::new();
        map.insert(level.as_ref().to_string(), inner);
        Value::Object(map)
    })
}

/// Merge `update` into `target` without clobbering existing siblings.
///
/// Keys present on both sides whose values are both objects are merged
/// recursively; any other collision is resolved in favour of `update`.
pub fn update_deep(target: &mut Map<String, Value>, update: Map<String, Value>) {
    for (key, incoming) in update {
        match incoming {
            Value::Object(incoming) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => update_deep(existing, incoming),
                _ => {
                    target.insert(key, Value::Object(incoming));
                }
            },
            other => {
                target.insert(key, other);
            }
        }
    }
}

/// Insert `leaf` at the nested position named by `levels`.
pub fn insert_path<S: AsRef<str>>(target: &mut Map<String, Value>, levels: &[S], leaf: Value) {
    if levels.is_empty() {
        return;
    }
    if let Value::Object(update) = nest(levels, leaf) {
        update_deep(target, update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_nest() {
        assert_eq!(nest(&["a", "b", "c"], json!(1)), json!({"a": {"b": {"c": 1}}}));
        assert_eq!(nest::<&str>(&[], json!(1)), json!(1));
    }

    #[test]
    fn test_siblings_survive() {
        let mut target = Map::new();
        insert_path(&mut target, &["a", "b", "c"], json!(1));
        insert_path(&mut target, &["a", "b", "d"], json!(2));
        assert_eq!(Value::Object(target), json!({"a": {"b": {"c": 1, "d": 2}}}));
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let mut forward = Map::new();
        insert_path(&mut forward, &["a", "b", "c"], json!(1));
        insert_path(&mut forward, &["a", "b", "d"], json!(2));
        insert_path(&mut forward, &["a", "e"], json!(3));

        let mut backward = Map::new();
        insert_path(&mut backward, &["a", "e"], json!(3));
        insert_path(&mut backward, &["a", "b", "d"], json!(2));
        insert_path(&mut backward, &["a", "b", "c"], json!(1));

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_deep_then_shallow_sibling() {
        let mut target = object(json!({"a": {"b": {"c": {"x": 1}}}}));
        update_deep(&mut target, object(json!({"a": {"d": 2}})));
        assert_eq!(
            Value::Object(target),
            json!({"a": {"b": {"c": {"x": 1}}, "d": 2}})
        );
    }

    #[test]
    fn test_attribute_leaf_merges_like_object() {
        let mut target = Map::new();
        insert_path(&mut target, &["s", "q"], json!({"value": 0.1, "units": "1/nm"}));
        insert_path(&mut target, &["s", "i"], json!(4));
        assert_eq!(
            Value::Object(target),
            json!({"s": {"q": {"value": 0.1, "units": "1/nm"}, "i": 4}})
        );
    }

    #[test]
    fn test_scalar_collision_takes_update() {
        let mut target = object(json!({"a": 1}));
        update_deep(&mut target, object(json!({"a": {"b": 2}})));
        assert_eq!(Value::Object(target), json!({"a": {"b": 2}}));
    }
}
