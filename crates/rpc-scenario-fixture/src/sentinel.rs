//! Decoding of raw fixture cells into typed tokens.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::Node;

static STRING_LIST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@\[([^\]]*)\]$").expect("Invalid string list regex"));

/// Which table grammar a cell is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeContext {
    /// Parameter tables for outbound requests.
    Request,
    /// Expected-value tables checked against responses.
    Comparator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentinel {
    True,
    False,
    Null,
    /// Expected-side marker: present and not null. Never a value.
    NotNull,
    StringList(Vec<String>),
    Literal(String),
}

pub fn decode(raw: &str, context: DecodeContext) -> Sentinel {
    match (raw, context) {
        ("@true", _) => return Sentinel::True,
        ("@false", _) => return Sentinel::False,
        ("@null", DecodeContext::Comparator) => return Sentinel::Null,
        ("@notNull", DecodeContext::Comparator) => return Sentinel::NotNull,
        _ => {}
    }

    if let Some(captures) = STRING_LIST_REGEX.captures(raw) {
        let inner = captures.get(1).map_or("", |m| m.as_str());
        if inner.is_empty() {
            return Sentinel::StringList(Vec::new());
        }
        return Sentinel::StringList(inner.split(',').map(|part| part.trim().to_string()).collect());
    }

    Sentinel::Literal(raw.to_string())
}

impl Sentinel {
    /// The value this token stands for; `None` for [`Sentinel::NotNull`].
    pub fn into_node(self) -> Option<Node> {
        match self {
            Sentinel::True => Some(Node::Bool(true)),
            Sentinel::False => Some(Node::Bool(false)),
            Sentinel::Null => Some(Node::Null),
            Sentinel::NotNull => None,
            Sentinel::StringList(items) => {
                Some(Node::List(items.into_iter().map(Node::String).collect()))
            }
            Sentinel::Literal(text) => Some(Node::String(text)),
        }
    }

    /// Rendering used on the expected side of a mismatch.
    pub fn render(&self) -> String {
        match self {
            Sentinel::NotNull => "a non-null value".to_string(),
            other => other
                .clone()
                .into_node()
                .map_or_else(String::new, |node| node.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparator(raw: &str) -> Sentinel {
        decode(raw, DecodeContext::Comparator)
    }

    fn request(raw: &str) -> Sentinel {
        decode(raw, DecodeContext::Request)
    }

    #[test]
    fn test_booleans_decode_in_both_contexts() {
        assert_eq!(comparator("@true"), Sentinel::True);
        assert_eq!(comparator("@false"), Sentinel::False);
        assert_eq!(request("@true"), Sentinel::True);
        assert_eq!(request("@false"), Sentinel::False);
    }

    #[test]
    fn test_null_markers_only_in_comparator_context() {
        assert_eq!(comparator("@null"), Sentinel::Null);
        assert_eq!(comparator("@notNull"), Sentinel::NotNull);
        assert_eq!(request("@null"), Sentinel::Literal("@null".to_string()));
        assert_eq!(request("@notNull"), Sentinel::Literal("@notNull".to_string()));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(comparator("@[]"), Sentinel::StringList(vec![]));
    }

    #[test]
    fn test_list_elements_are_trimmed() {
        assert_eq!(
            comparator("@[a, b , c]"),
            Sentinel::StringList(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_whitespace_only_list_has_one_empty_element() {
        assert_eq!(comparator("@[ ]"), Sentinel::StringList(vec![String::new()]));
    }

    #[test]
    fn test_near_misses_stay_literal() {
        for raw in ["@True", "true", " @true", "@[a", "@[a]b", "@[a]]", "x@[a]", "@"] {
            assert_eq!(comparator(raw), Sentinel::Literal(raw.to_string()), "{raw}");
        }
    }

    #[test]
    fn test_into_node() {
        assert_eq!(Sentinel::True.into_node(), Some(Node::Bool(true)));
        assert_eq!(Sentinel::Null.into_node(), Some(Node::Null));
        assert_eq!(Sentinel::NotNull.into_node(), None);
        assert_eq!(
            Sentinel::StringList(vec!["a".into()]).into_node(),
            Some(Node::List(vec![Node::string("a")]))
        );
    }

    #[test]
    fn test_render() {
        assert_eq!(Sentinel::NotNull.render(), "a non-null value");
        assert_eq!(Sentinel::Literal("ok".into()).render(), "\"ok\"");
        assert_eq!(Sentinel::StringList(vec!["a".into(), "b".into()]).render(), r#"["a","b"]"#);
    }
}
