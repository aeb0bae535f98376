//! Read-only lookup of a [`Path`] inside a [`Node`] tree.

use thiserror::Error;
use tracing::trace;

use crate::node::Node;
use crate::path::{ParseError, Path};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("missing key '{segment}' at '{path}'")]
    MissingKey { path: Path, segment: String },

    #[error("cannot look up '{segment}' at '{path}': value is a {found}")]
    NotTraversable {
        path: Path,
        segment: String,
        found: &'static str,
    },
}

impl PathError {
    /// True when the lookup failed on the first segment.
    pub fn is_root(&self) -> bool {
        match self {
            PathError::Parse(_) => false,
            PathError::MissingKey { path, .. } | PathError::NotTraversable { path, .. } => {
                path.len() == 1
            }
        }
    }
}

/// Follows `path` through `tree`.
///
/// The root segment requires a mapping. Deeper segments accept mappings
/// (string keys) and lists (segments that parse as an index).
pub fn resolve<'a>(tree: &'a Node, path: &Path) -> Result<&'a Node, PathError> {
    let mut current = tree;

    for (depth, segment) in path.segments().iter().enumerate() {
        let here = || path.prefix(depth + 1);
        current = match current {
            Node::Mapping(map) => map.get(segment).ok_or_else(|| PathError::MissingKey {
                path: here(),
                segment: segment.clone(),
            })?,
            Node::List(items) if depth > 0 => {
                let index = segment
                    .parse::<usize>()
                    .map_err(|_| PathError::NotTraversable {
                        path: here(),
                        segment: segment.clone(),
                        found: "list",
                    })?;
                items.get(index).ok_or_else(|| PathError::MissingKey {
                    path: here(),
                    segment: segment.clone(),
                })?
            }
            other => {
                return Err(PathError::NotTraversable {
                    path: here(),
                    segment: segment.clone(),
                    found: other.kind(),
                });
            }
        };
    }

    trace!(path = %path, kind = current.kind(), "Resolved fixture path");
    Ok(current)
}

/// Parses `path` and resolves it against `value`.
pub fn resolve_path<'a>(value: &'a Node, path: &str) -> Result<&'a Node, PathError> {
    let path = Path::parse(path)?;
    resolve(value, &path)
}
