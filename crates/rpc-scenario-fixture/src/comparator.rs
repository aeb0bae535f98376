//! Checks an actual tree against a table of expected rows.
//!
//! Each row names a path (optionally re-rooted by a key override) and an
//! expected cell decoded with the comparator grammar. [`compare`] stops at
//! the first failing row; [`compare_all`] collects every failure.

use thiserror::Error;
use tracing::debug;

use crate::node::Node;
use crate::path::Path;
use crate::resolver::{PathError, resolve};
use crate::sentinel::{self, DecodeContext, Sentinel};

const MISSING: &str = "<missing>";

/// One expected row of a fixture table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedRow {
    pub key: String,
    pub expected: String,
    /// Replaces the root segment of `key` when set.
    pub key_override: Option<String>,
}

impl ExpectedRow {
    pub fn new(key: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expected: expected.into(),
            key_override: None,
        }
    }

    pub fn with_key_override(mut self, root: impl Into<String>) -> Self {
        self.key_override = Some(root.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for ExpectedRow {
    fn from((key, expected): (K, V)) -> Self {
        Self::new(key, expected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    Parse,
    CountMismatch,
    MissingKey,
    NotTraversable,
    ValueMismatch,
    NotNullAssertionFailed,
}

impl MismatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchKind::Parse => "parse_error",
            MismatchKind::CountMismatch => "count_mismatch",
            MismatchKind::MissingKey => "missing_key",
            MismatchKind::NotTraversable => "not_traversable",
            MismatchKind::ValueMismatch => "value_mismatch",
            MismatchKind::NotNullAssertionFailed => "not_null_assertion_failed",
        }
    }
}

/// A failed comparison, rendered for test output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Mismatch {
    pub kind: MismatchKind,
    /// Index of the failing row; `None` for count checks.
    pub row: Option<usize>,
    pub path: Option<Path>,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

impl Mismatch {
    fn for_row(
        kind: MismatchKind,
        row: usize,
        path: &Path,
        expected: String,
        actual: String,
    ) -> Self {
        let message = match kind {
            MismatchKind::NotNullAssertionFailed => {
                format!("row {row}: expected '{path}' to be present and not null, got {actual}")
            }
            _ => format!("row {row}: value at '{path}' differs: expected {expected}, got {actual}"),
        };
        Self {
            kind,
            row: Some(row),
            path: Some(path.clone()),
            expected,
            actual,
            message,
        }
    }

    fn from_path_error(row: usize, error: PathError, expected: String) -> Self {
        let (kind, path) = match &error {
            PathError::Parse(_) => (MismatchKind::Parse, None),
            PathError::MissingKey { path, .. } => (MismatchKind::MissingKey, Some(path.clone())),
            PathError::NotTraversable { path, .. } => {
                (MismatchKind::NotTraversable, Some(path.clone()))
            }
        };
        Self {
            kind,
            row: Some(row),
            path,
            expected,
            actual: MISSING.to_string(),
            message: format!("row {row}: {error}"),
        }
    }
}

/// Fail-fast comparison of `actual` against `rows`.
///
/// `expected_count` is checked before any row and requires `actual` to be a
/// list or mapping of exactly that many elements.
pub fn compare(
    actual: &Node,
    rows: &[ExpectedRow],
    expected_count: Option<usize>,
) -> Result<(), Mismatch> {
    debug!(rows = rows.len(), ?expected_count, "Comparing fixture table");
    if let Some(count) = expected_count {
        check_count(actual, count)?;
    }
    for (index, row) in rows.iter().enumerate() {
        check_row(actual, index, row)?;
    }
    Ok(())
}

/// Like [`compare`] but evaluates every row and returns all failures.
pub fn compare_all(
    actual: &Node,
    rows: &[ExpectedRow],
    expected_count: Option<usize>,
) -> Vec<Mismatch> {
    let count = expected_count.and_then(|count| check_count(actual, count).err());
    count
        .into_iter()
        .chain(
            rows.iter()
                .enumerate()
                .filter_map(|(index, row)| check_row(actual, index, row).err()),
        )
        .collect()
}

fn check_count(actual: &Node, expected: usize) -> Result<(), Mismatch> {
    let found = actual.count();
    if found == Some(expected) {
        return Ok(());
    }
    let rendered = match found {
        Some(n) => n.to_string(),
        None => format!("a {}", actual.kind()),
    };
    Err(Mismatch {
        kind: MismatchKind::CountMismatch,
        row: None,
        path: None,
        expected: expected.to_string(),
        actual: rendered.clone(),
        message: format!("expected {expected} elements, found {rendered}"),
    })
}

fn check_row(actual: &Node, index: usize, row: &ExpectedRow) -> Result<(), Mismatch> {
    let path = Path::parse_key(&row.key)
        .map_err(|e| Mismatch::from_path_error(index, e.into(), row.expected.clone()))?;
    let path = match &row.key_override {
        Some(root) => path.with_root(root),
        None => path,
    };

    let resolved = resolve(actual, &path);
    if let Err(error @ PathError::MissingKey { .. }) = &resolved {
        if error.is_root() {
            return Err(Mismatch::from_path_error(index, error.clone(), row.expected.clone()));
        }
    }

    let expected = sentinel::decode(&row.expected, DecodeContext::Comparator);
    let rendered = expected.render();

    match (expected, resolved) {
        (Sentinel::NotNull, Ok(node)) if !node.is_null() => Ok(()),
        (Sentinel::NotNull, Ok(node)) => Err(Mismatch::for_row(
            MismatchKind::NotNullAssertionFailed,
            index,
            &path,
            rendered,
            node.to_string(),
        )),
        (Sentinel::NotNull, Err(_)) => Err(Mismatch::for_row(
            MismatchKind::NotNullAssertionFailed,
            index,
            &path,
            rendered,
            MISSING.to_string(),
        )),
        (_, Err(error)) => Err(Mismatch::from_path_error(index, error, rendered)),
        (token, Ok(node)) => match token.into_node() {
            Some(expected) if expected == *node => Ok(()),
            _ => Err(Mismatch::for_row(
                MismatchKind::ValueMismatch,
                index,
                &path,
                rendered,
                node.to_string(),
            )),
        },
    }
}
