//! Bracketed fixture keys such as `filter[tags][0]`.
//!
//! Grammar: `segment ("[" segment "]")*`. Segments may hold any character
//! except `[` and `]`; surrounding whitespace is trimmed.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unclosed '[' at byte {position} in path '{input}'")]
    UnclosedBracket { input: String, position: usize },

    #[error("unexpected ']' at byte {position} in path '{input}'")]
    UnexpectedClose { input: String, position: usize },

    #[error("'[' inside a bracket group at byte {position} in path '{input}'")]
    NestedOpen { input: String, position: usize },

    #[error("unexpected text after ']' at byte {position} in path '{input}'")]
    TrailingText { input: String, position: usize },
}

/// Non-empty ordered sequence of segments addressing a location in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Single-segment path for keys that carry no brackets.
    pub fn single(key: &str) -> Self {
        Self {
            segments: vec![key.trim().to_string()],
        }
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let root_end = input.find('[').unwrap_or(input.len());
        let root = &input[..root_end];
        if let Some(position) = root.find(']') {
            return Err(ParseError::UnexpectedClose {
                input: input.to_string(),
                position,
            });
        }

        let mut segments = vec![root.trim().to_string()];
        let mut offset = root_end;

        while offset < input.len() {
            let untrimmed = &input[offset..];
            let rest = untrimmed.trim_start();
            if rest.is_empty() {
                break;
            }
            offset += untrimmed.len() - rest.len();
            if !rest.starts_with('[') {
                let error = if rest.starts_with(']') {
                    ParseError::UnexpectedClose {
                        input: input.to_string(),
                        position: offset,
                    }
                } else {
                    ParseError::TrailingText {
                        input: input.to_string(),
                        position: offset,
                    }
                };
                return Err(error);
            }

            let body = &rest[1..];
            match body.find(|c: char| c == '[' || c == ']') {
                None => {
                    return Err(ParseError::UnclosedBracket {
                        input: input.to_string(),
                        position: offset,
                    });
                }
                Some(end) if body[end..].starts_with('[') => {
                    return Err(ParseError::NestedOpen {
                        input: input.to_string(),
                        position: offset + 1 + end,
                    });
                }
                Some(end) => {
                    segments.push(body[..end].trim().to_string());
                    offset += end + 2;
                }
            }
        }

        Ok(Self { segments })
    }

    /// Parses `key`, skipping the scanner when it holds no brackets.
    pub fn parse_key(key: &str) -> Result<Self, ParseError> {
        if key.contains(|c: char| c == '[' || c == ']') {
            Self::parse(key)
        } else {
            Ok(Self::single(key))
        }
    }

    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true: a path holds at least the root segment.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Leading segments and the final one.
    pub fn split_leaf(&self) -> (&[String], &str) {
        let last = self.segments.len() - 1;
        (&self.segments[..last], &self.segments[last])
    }

    /// Same path with the root segment replaced.
    pub fn with_root(&self, root: &str) -> Self {
        let mut segments = self.segments.clone();
        segments[0] = root.trim().to_string();
        Self { segments }
    }

    /// The first `len` segments; clamped to at least the root.
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.clamp(1, self.segments.len());
        Self {
            segments: self.segments[..len].to_vec(),
        }
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root())?;
        for segment in &self.segments[1..] {
            write!(f, "[{}]", segment)?;
        }
        Ok(())
    }
}
