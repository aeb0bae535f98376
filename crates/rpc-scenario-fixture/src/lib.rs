#![deny(clippy::all)]

//! Fixture table codec and comparator.
//!
//! Scenario tables are flat lists of `key | value` cells. Keys address a
//! location with bracket syntax (`filter[tags]`), values may be sentinels
//! (`@true`, `@null`, `@notNull`, `@[a, b]`). This crate turns parameter
//! tables into nested request parameters and checks expected tables against
//! decoded responses. It performs no I/O.

pub mod builder;
pub mod comparator;
pub mod node;
pub mod path;
pub mod resolver;
pub mod sentinel;

pub use builder::BuildError;
pub use builder::build;
pub use builder::encode_parameters;
pub use comparator::ExpectedRow;
pub use comparator::Mismatch;
pub use comparator::MismatchKind;
pub use comparator::compare;
pub use comparator::compare_all;
pub use node::Mapping;
pub use node::Node;
pub use path::ParseError;
pub use path::Path;
pub use resolver::PathError;
pub use resolver::resolve;
pub use resolver::resolve_path;
pub use sentinel::DecodeContext;
pub use sentinel::Sentinel;
pub use sentinel::decode;

/// Validates a decoded result against an expected table, stopping at the
/// first failing row.
pub fn compare_result(
    actual: &Node,
    rows: &[ExpectedRow],
    expected_count: Option<usize>,
) -> Result<(), Mismatch> {
    compare(actual, rows, expected_count)
}
