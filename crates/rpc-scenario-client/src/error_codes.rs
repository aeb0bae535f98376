//! JSON-RPC 2.0 error codes.
//!
//! - -32700: Parse error
//! - -32600 to -32603: Reserved protocol errors
//! - -32000 to -32099: Implementation-defined server errors

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

pub const SERVER_ERROR_MIN: i64 = -32099;
pub const SERVER_ERROR_MAX: i64 = -32000;

/// Standard message for a reserved code.
pub fn describe(code: i64) -> Option<&'static str> {
    match code {
        PARSE_ERROR => Some("Parse error"),
        INVALID_REQUEST => Some("Invalid Request"),
        METHOD_NOT_FOUND => Some("Method not found"),
        INVALID_PARAMS => Some("Invalid params"),
        INTERNAL_ERROR => Some("Internal error"),
        SERVER_ERROR_MIN..=SERVER_ERROR_MAX => Some("Server error"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(describe(METHOD_NOT_FOUND), Some("Method not found"));
        assert_eq!(describe(-32001), Some("Server error"));
        assert_eq!(describe(-32099), Some("Server error"));
        assert_eq!(describe(-32100), None);
        assert_eq!(describe(7), None);
    }
}
