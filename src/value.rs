use std::borrow::Cow;

/// A node in the nested input snapshot.
///
/// `Value` is the closed set of shapes untrusted input can take: scalars,
/// ordered key/value mappings, and sequences. Nothing else appears after
/// construction or mutation, so resolver and filter code can match on it
/// exhaustively.
///
/// `Map` is backed by a vector of pairs and preserves insertion order, which
/// is what the container contract of [`Cage`](crate::Cage) iterates in.
///
/// # Examples
///
/// ```
/// use input_cage::Value;
///
/// let mut profile = Value::map();
/// profile.insert("name", "mallory");
/// profile.insert("age", 7);
///
/// assert_eq!(profile.get("name"), Some(&Value::from("mallory")));
/// assert!(profile.get("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or explicitly null input.
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A signed integer scalar.
    Int(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A string scalar.
    Str(String),
    /// An ordered sequence of nodes.
    Seq(Vec<Value>),
    /// An insertion-ordered mapping of string keys to nodes.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Creates an empty `Map` node.
    pub fn map() -> Self {
        Value::Map(Vec::new())
    }

    /// Creates an empty `Seq` node.
    pub fn seq() -> Self {
        Value::Seq(Vec::new())
    }

    /// Returns `true` for scalar nodes (everything except `Seq` and `Map`).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Seq(_) | Value::Map(_))
    }

    /// Returns the string slice if this node is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this node is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Looks up a key on a `Map` node. Non-map nodes have no keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Map(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Sets a key on this node, converting it to a `Map` first if it is
    /// anything else. An existing key is overwritten in place, keeping its
    /// position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if !matches!(self, Value::Map(_)) {
            *self = Value::map();
        }
        if let Value::Map(entries) = self {
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Removes a key from a `Map` node, returning the removed value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        match self {
            Value::Map(entries) => {
                let idx = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(idx).1)
            }
            _ => None,
        }
    }

    /// Iterates the keys of a `Map` node in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let entries: &[(String, Value)] = match self {
            Value::Map(entries) => entries,
            _ => &[],
        };
        entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of top-level entries: map keys, sequence elements, 0 otherwise.
    pub fn len(&self) -> usize {
        match self {
            Value::Map(entries) => entries.len(),
            Value::Seq(items) => items.len(),
            _ => 0,
        }
    }

    /// Returns `true` when [`len`](Self::len) is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The display form of a scalar, used by filters: strings borrow,
    /// numbers and booleans format, `Null` is the empty string. Containers
    /// have no display form.
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => Some(Cow::Borrowed("")),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Int(n) => Some(Cow::Owned(n.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            Value::Str(s) => Some(Cow::Borrowed(s)),
            Value::Seq(_) | Value::Map(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

/// Conversion from decoded JSON, so snapshots can be captured directly from
/// request bodies. `serde_json` is built with `preserve_order`, so object
/// key order carries over into the `Map` node.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Value::Str(s) if s == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_overwrites_in_place() {
        let mut v = Value::map();
        v.insert("a", 1);
        v.insert("b", 2);
        v.insert("a", 3);

        let keys: Vec<&str> = v.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(v.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn insert_converts_non_map_nodes() {
        let mut v = Value::Str("scalar".to_string());
        v.insert("key", "val");

        assert_eq!(v.get("key"), Some(&Value::from("val")));
    }

    #[test]
    fn remove_returns_removed_value() {
        let mut v = Value::map();
        v.insert("gone", "soon");

        assert_eq!(v.remove("gone"), Some(Value::from("soon")));
        assert_eq!(v.remove("gone"), None);
        assert!(v.is_empty());
    }

    #[test]
    fn keys_preserve_insertion_order() {
        let mut v = Value::map();
        for k in ["zulu", "alpha", "mike"] {
            v.insert(k, 0);
        }

        let keys: Vec<&str> = v.keys().collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn scalar_text_forms() {
        assert_eq!(Value::Null.scalar_text().unwrap(), "");
        assert_eq!(Value::Int(-3).scalar_text().unwrap(), "-3");
        assert_eq!(Value::Bool(true).scalar_text().unwrap(), "true");
        assert_eq!(Value::from("hi").scalar_text().unwrap(), "hi");
        assert!(Value::seq().scalar_text().is_none());
        assert!(Value::map().scalar_text().is_none());
    }

    #[test]
    fn from_json_preserves_structure_and_order() {
        let v = Value::from(json!({
            "z": "last?",
            "a": [1, 2.5, null, true],
            "nested": {"deep": "value"},
        }));

        let keys: Vec<&str> = v.keys().collect();
        assert_eq!(keys, vec!["z", "a", "nested"]);

        match v.get("a") {
            Some(Value::Seq(items)) => {
                assert_eq!(items[0], 1);
                assert_eq!(items[1], Value::Float(2.5));
                assert_eq!(items[2], Value::Null);
                assert_eq!(items[3], true);
            }
            other => panic!("expected sequence, got {:?}", other),
        }
        assert_eq!(v.get("nested").unwrap().get("deep").unwrap(), "value");
    }

    #[test]
    fn scalar_comparisons() {
        assert_eq!(Value::from("x"), "x");
        assert_eq!(Value::Int(42), 42);
        assert_ne!(Value::Str("42".to_string()), 42);
    }
}
