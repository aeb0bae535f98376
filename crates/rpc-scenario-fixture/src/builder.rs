//! Folds flat `(path, raw value)` rows into a nested parameter tree.

use thiserror::Error;
use tracing::trace;

use crate::node::{Mapping, Node};
use crate::path::{ParseError, Path};
use crate::sentinel::{self, DecodeContext};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: ParseError,
    },

    #[error("row {row}: '{path}' conflicts with an earlier row ({reason})")]
    StructureConflict {
        row: usize,
        path: Path,
        reason: String,
    },
}

impl BuildError {
    pub fn row(&self) -> usize {
        match self {
            BuildError::Parse { row, .. } | BuildError::StructureConflict { row, .. } => *row,
        }
    }
}

/// Builds a mapping from already-parsed rows.
///
/// Intermediate segments create mappings on demand. A row fails when it
/// would descend through an existing non-mapping value or write a location
/// an earlier row already filled.
pub fn build<V: AsRef<str>>(rows: &[(Path, V)]) -> Result<Node, BuildError> {
    let mut root = Mapping::new();

    for (row, (path, raw)) in rows.iter().enumerate() {
        let (parents, leaf) = path.split_leaf();

        let mut current = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            let child = current.get_or_insert_with(segment, || Node::Mapping(Mapping::new()));
            current = match child {
                Node::Mapping(map) => map,
                other => {
                    return Err(BuildError::StructureConflict {
                        row,
                        path: path.prefix(depth + 1),
                        reason: format!("already holds a {}", other.kind()),
                    });
                }
            };
        }

        if let Some(existing) = current.get(leaf) {
            return Err(BuildError::StructureConflict {
                row,
                path: path.clone(),
                reason: format!("already holds a {}", existing.kind()),
            });
        }

        let value = sentinel::decode(raw.as_ref(), DecodeContext::Request)
            .into_node()
            .unwrap_or(Node::Null);
        trace!(row, path = %path, value = %value, "Placed fixture leaf");
        current.insert(leaf, value);
    }

    Ok(Node::Mapping(root))
}

/// Parses each key then runs [`build`].
pub fn encode_parameters<K, V>(rows: &[(K, V)]) -> Result<Node, BuildError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let parsed = rows
        .iter()
        .enumerate()
        .map(|(row, (key, value))| {
            Path::parse_key(key.as_ref())
                .map(|path| (path, value.as_ref()))
                .map_err(|source| BuildError::Parse { row, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    build(&parsed)
}
