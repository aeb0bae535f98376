//! Conversions from raw scenario tables to fixture rows.
//!
//! Tables arrive as rows of trimmed cells, with no header row. A rows-hash
//! table has exactly two cells per row; an expectation table may add a third
//! cell that overrides the root segment of the key.

use rpc_scenario_fixture::ExpectedRow;

use crate::error::StepError;

pub fn rows_hash(table: &[Vec<String>]) -> Result<Vec<(String, String)>, StepError> {
    table
        .iter()
        .enumerate()
        .map(|(row, cells)| match cells.as_slice() {
            [key, value] => Ok((key.clone(), value.clone())),
            _ => Err(StepError::MalformedTable {
                row,
                reason: format!("expected 2 cells, found {}", cells.len()),
            }),
        })
        .collect()
}

pub fn expected_rows(table: &[Vec<String>]) -> Result<Vec<ExpectedRow>, StepError> {
    table
        .iter()
        .enumerate()
        .map(|(row, cells)| match cells.as_slice() {
            [key, expected] => Ok(ExpectedRow::new(key.as_str(), expected.as_str())),
            [key, expected, root] if root.is_empty() => {
                Ok(ExpectedRow::new(key.as_str(), expected.as_str()))
            }
            [key, expected, root] => Ok(
                ExpectedRow::new(key.as_str(), expected.as_str()).with_key_override(root.as_str()),
            ),
            _ => Err(StepError::MalformedTable {
                row,
                reason: format!("expected 2 or 3 cells, found {}", cells.len()),
            }),
        })
        .collect()
}

/// Splits `key=value` at the first `=`. The key is trimmed, the value kept.
pub fn parse_assignment(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some((key, value))
}

/// Parses a list of `key=value` arguments into table rows.
pub fn assignments<S: AsRef<str>>(items: &[S]) -> Result<Vec<Vec<String>>, StepError> {
    items
        .iter()
        .enumerate()
        .map(|(row, item)| {
            parse_assignment(item.as_ref())
                .map(|(key, value)| vec![key.to_string(), value.to_string()])
                .ok_or_else(|| StepError::MalformedTable {
                    row,
                    reason: format!("expected key=value, found {:?}", item.as_ref()),
                })
        })
        .collect()
}
