//! Driver failure kinds, grounded in `spec.md` §7's parser-driver row:
//! `syntax_error(symbol_name)`, `rr_conflict_unresolved`, and
//! `internal_parser_error` (stack underflow, which a valid table never
//! triggers).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("Syntax error: unexpected {0}")]
    SyntaxError(String),

    #[error("unresolved reduce-reduce conflict in state {state} on lookahead '{lookahead}'")]
    RrConflictUnresolved { state: usize, lookahead: String },

    #[error("internal parser error: state stack underflow")]
    InternalParserError,
}
