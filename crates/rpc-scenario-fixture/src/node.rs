//! The nested value tree shared by request parameters and RPC results.

use std::fmt;

use serde_json::Value;

/// A JSON-like tree with string, boolean and null scalars.
///
/// Numbers coming from the wire are kept as their canonical JSON text in
/// [`Node::String`], so a fixture literal `42` matches a result of `42`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    String(String),
    List(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    pub fn string(value: impl Into<String>) -> Self {
        Node::String(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Element count for collections, `None` for scalars.
    pub fn count(&self) -> Option<usize> {
        match self {
            Node::List(items) => Some(items.len()),
            Node::Mapping(map) => Some(map.len()),
            Node::Null | Node::Bool(_) | Node::String(_) => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::String(_) => "string",
            Node::List(_) => "list",
            Node::Mapping(_) => "mapping",
        }
    }

    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::String(n.to_string()),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from(value.clone())
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(b),
            Node::String(s) => Value::String(s),
            Node::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Node::Mapping(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// String-keyed mapping that remembers insertion order.
///
/// Equality ignores order: two mappings are equal when they hold the same
/// key set and equal values per key.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Inserts or replaces `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        let key = key.into();
        match self.position(&key) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the value at `key`, inserting `default()` first when absent.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> Node) -> &mut Node {
        let index = match self.position(key) {
            Some(index) => index,
            None => {
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl FromIterator<(String, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_become_canonical_strings() {
        let node = Node::from(json!({"id": 42, "ratio": 0.5}));
        let map = node.as_mapping().unwrap();
        assert_eq!(map.get("id"), Some(&Node::string("42")));
        assert_eq!(map.get("ratio"), Some(&Node::string("0.5")));
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a = Node::from(json!({"a": "1", "b": ["x", "y"]}));
        let b = Node::from(json!({"b": ["x", "y"], "a": "1"}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_list_equality_is_order_sensitive() {
        let a = Node::from(json!(["x", "y"]));
        let b = Node::from(json!(["y", "x"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_mapping_equality_requires_same_key_set() {
        let a = Node::from(json!({"a": "1"}));
        let b = Node::from(json!({"a": "1", "b": "2"}));
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn test_to_json_preserves_insertion_order() {
        let node = Node::from(json!({"zeta": "1", "alpha": "2"}));
        assert_eq!(node.to_string(), r#"{"zeta":"1","alpha":"2"}"#);
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut map = Mapping::new();
        assert_eq!(map.insert("k", Node::Null), None);
        assert_eq!(map.insert("k", Node::Bool(true)), Some(Node::Null));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_count_is_none_for_scalars() {
        assert_eq!(Node::string("abc").count(), None);
        assert_eq!(Node::from(json!([1, 2])).count(), Some(2));
        assert_eq!(Node::from(json!({})).count(), Some(0));
    }
}
