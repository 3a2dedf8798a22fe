//! Path-expression resolution over a nested [`Value`].
//!
//! A path expression is a `/`-delimited string where each segment names a
//! map key or a sequence index at one nesting level (`"x/woot/booyah"`,
//! `"items/0/name"`). Resolution is total: missing keys, out-of-range or
//! malformed indices, and type mismatches all answer "not found" rather
//! than failing fatally, because the shape of the data is attacker-chosen.

use crate::Value;

/// Segment delimiter in path expressions.
pub const DELIMITER: char = '/';

/// Splits a path into segments, rejecting invalid expressions.
///
/// An empty path, or any empty segment (leading, trailing, or doubled
/// delimiter), makes the whole expression invalid — an empty segment never
/// matches an empty key.
fn segments(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    let segs: Vec<&str> = path.split(DELIMITER).collect();
    if segs.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segs)
}

/// Parses a segment as a sequence index: ASCII digits only.
fn parse_index(seg: &str) -> Option<usize> {
    if seg.bytes().all(|b| b.is_ascii_digit()) {
        seg.parse().ok()
    } else {
        None
    }
}

/// Resolves a path expression to the node it addresses, if any.
///
/// # Examples
///
/// ```
/// use input_cage::{path, Value};
/// use serde_json::json;
///
/// let root = Value::from(json!({"x": {"woot": ["a", "b"]}}));
/// assert_eq!(path::resolve(&root, "x/woot/1"), Some(&Value::from("b")));
/// assert_eq!(path::resolve(&root, "x/woot/9"), None);
/// assert_eq!(path::resolve(&root, "x//woot"), None);
/// ```
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segs = segments(path)?;
    let mut node = root;
    for seg in segs {
        node = match node {
            Value::Map(_) => node.get(seg)?,
            Value::Seq(items) => items.get(parse_index(seg)?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Mutable variant of [`resolve`].
pub fn resolve_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let segs = segments(path)?;
    let mut node = root;
    for seg in segs {
        node = match node {
            Value::Map(_) => node.get_mut(seg)?,
            Value::Seq(items) => items.get_mut(parse_index(seg)?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Writes `value` at the node addressed by `path`, creating intermediate
/// `Map` nodes for missing segments.
///
/// Sequence nodes are never created implicitly: a segment descends into an
/// existing `Seq` only when it is a well-formed in-range index. Any node of
/// a different kind standing where a mapping is needed is overwritten by an
/// empty `Map` first.
///
/// Returns `false` when the path expression itself is invalid.
///
/// # Examples
///
/// ```
/// use input_cage::{path, Value};
///
/// let mut root = Value::map();
/// assert!(path::assign(&mut root, "a/b/c", Value::from(1)));
/// assert_eq!(path::resolve(&root, "a/b/c"), Some(&Value::Int(1)));
/// ```
pub fn assign(root: &mut Value, path: &str, value: Value) -> bool {
    match segments(path) {
        Some(segs) => {
            assign_segments(root, &segs, value);
            true
        }
        None => false,
    }
}

fn assign_segments(node: &mut Value, segs: &[&str], value: Value) {
    let (seg, rest) = (segs[0], &segs[1..]);

    // Descend into an existing sequence only for an in-range index.
    if let Some(idx) = parse_index(seg) {
        if let Value::Seq(items) = node {
            if idx < items.len() {
                if rest.is_empty() {
                    items[idx] = value;
                } else {
                    assign_segments(&mut items[idx], rest, value);
                }
                return;
            }
        }
    }

    if !matches!(node, Value::Map(_)) {
        *node = Value::map();
    }
    if rest.is_empty() {
        node.insert(seg, value);
        return;
    }
    // A scalar in the way is replaced by an intermediate map; containers
    // are descended into (a kept Seq is index-checked one level down).
    if node.get(seg).map_or(true, Value::is_scalar) {
        node.insert(seg, Value::map());
    }
    if let Some(child) = node.get_mut(seg) {
        assign_segments(child, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        Value::from(json!({
            "x": {"woot": {"booyah": "meet at the bar at 7:30 pm"}},
            "list": ["foo", "bar", {"deep": 1776}],
            "int": 7,
        }))
    }

    #[test]
    fn resolve_nested_map_keys() {
        let root = fixture();
        assert_eq!(
            resolve(&root, "x/woot/booyah"),
            Some(&Value::from("meet at the bar at 7:30 pm"))
        );
    }

    #[test]
    fn resolve_sequence_indices() {
        let root = fixture();
        assert_eq!(resolve(&root, "list/0"), Some(&Value::from("foo")));
        assert_eq!(resolve(&root, "list/2/deep"), Some(&Value::Int(1776)));
    }

    #[test]
    fn resolve_missing_key_is_not_found() {
        let root = fixture();
        assert_eq!(resolve(&root, "x/nope"), None);
        assert_eq!(resolve(&root, "nope"), None);
    }

    #[test]
    fn resolve_out_of_range_index_is_not_found() {
        let root = fixture();
        assert_eq!(resolve(&root, "list/3"), None);
    }

    #[test]
    fn resolve_malformed_index_is_not_found() {
        let root = fixture();
        assert_eq!(resolve(&root, "list/one"), None);
        assert_eq!(resolve(&root, "list/+1"), None);
        assert_eq!(resolve(&root, "list/-1"), None);
    }

    #[test]
    fn resolve_type_mismatch_is_not_found() {
        let root = fixture();
        // index segment on a map, key segment past a scalar
        assert_eq!(resolve(&root, "int/0"), None);
        assert_eq!(resolve(&root, "x/woot/booyah/more"), None);
    }

    #[test]
    fn empty_segments_are_invalid() {
        let root = fixture();
        assert_eq!(resolve(&root, ""), None);
        assert_eq!(resolve(&root, "/x"), None);
        assert_eq!(resolve(&root, "x/"), None);
        assert_eq!(resolve(&root, "x//woot"), None);
    }

    #[test]
    fn resolve_is_deterministic_across_calls() {
        let root = fixture();
        let first = resolve(&root, "x/woot/booyah").cloned();
        for _ in 0..10 {
            assert_eq!(resolve(&root, "x/woot/booyah").cloned(), first);
        }
    }

    #[test]
    fn assign_creates_intermediate_maps() {
        let mut root = Value::map();
        assert!(assign(&mut root, "a/b/c", Value::from("deep")));
        assert_eq!(resolve(&root, "a/b/c"), Some(&Value::from("deep")));
    }

    #[test]
    fn assign_overwrites_scalar_in_the_way() {
        let mut root = fixture();
        assert!(assign(&mut root, "int/sub", Value::from(1)));
        assert_eq!(resolve(&root, "int/sub"), Some(&Value::Int(1)));
    }

    #[test]
    fn assign_writes_into_existing_sequence() {
        let mut root = fixture();
        assert!(assign(&mut root, "list/1", Value::from("swapped")));
        assert_eq!(resolve(&root, "list/1"), Some(&Value::from("swapped")));
        // untouched neighbors survive
        assert_eq!(resolve(&root, "list/0"), Some(&Value::from("foo")));
    }

    #[test]
    fn assign_rejects_invalid_paths() {
        let mut root = fixture();
        assert!(!assign(&mut root, "", Value::Null));
        assert!(!assign(&mut root, "a//b", Value::Null));
        assert_eq!(root, fixture());
    }

    mod proptests {
        use super::*;
        use crate::test_utils::{arb_key, arb_scalar};
        use proptest::prelude::*;

        proptest! {
            /// Property: a value assigned at any key chain resolves back
            /// through the same path expression.
            #[test]
            fn proptest_assign_then_resolve_roundtrips(
                segs in prop::collection::vec(arb_key(), 1..4),
                scalar in arb_scalar()
            ) {
                let path = segs.join("/");
                let mut root = Value::map();

                prop_assert!(assign(&mut root, &path, scalar.clone()));
                prop_assert_eq!(resolve(&root, &path), Some(&scalar));
            }

            /// Property: resolution never mutates, so repeated calls agree.
            #[test]
            fn proptest_resolve_is_stable(
                segs in prop::collection::vec(arb_key(), 1..4),
                scalar in arb_scalar()
            ) {
                let path = segs.join("/");
                let mut root = Value::map();
                assign(&mut root, &path, scalar);

                let first = resolve(&root, &path).cloned();
                for _ in 0..3 {
                    prop_assert_eq!(resolve(&root, &path).cloned(), first.clone());
                }
            }
        }
    }
}
