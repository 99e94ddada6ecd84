//! Crate-wide error type for fallible public entry points.

use std::error::Error;
use std::fmt;

/// Errors surfaced by the public engine facade.
///
/// Internal helpers that cannot fail by construction (indexing a 0..64
/// square, looking up a piece already known to exist) return bare values
/// instead of threading a `Result` through the hot path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed FEN or move string.
    ParseError(String),
    /// `apply_move` called with a move that is not in the current legal set.
    IllegalMove(String),
    /// A derived bitboard disagreed with its from-scratch recomputation.
    ///
    /// Only raised outside debug builds' `debug_assert!` discipline — see
    /// `Board::assert_hash`, which panics in debug builds instead, since an
    /// invariant violation here indicates a bug rather than bad input.
    InvariantViolation(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ParseError(msg) => write!(f, "parse error: {msg}"),
            EngineError::IllegalMove(msg) => write!(f, "illegal move: {msg}"),
            EngineError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
        }
    }
}

impl Error for EngineError {}

impl From<String> for EngineError {
    fn from(msg: String) -> Self {
        EngineError::ParseError(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_variant_context() {
        let err = EngineError::IllegalMove("e2e5".to_string());
        assert_eq!(err.to_string(), "illegal move: e2e5");
    }

    #[test]
    fn from_string_yields_parse_error() {
        let err: EngineError = "bad fen".to_string().into();
        assert_eq!(err, EngineError::ParseError("bad fen".to_string()));
    }
}
