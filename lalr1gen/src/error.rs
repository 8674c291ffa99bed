//! The top-level error type tying each pipeline stage's error enum together,
//! for callers driving the whole [`crate::generate`] pipeline in one shot.

use thiserror::Error;

use crate::ruleset::RulesetError;
use crate::symbol::SymbolError;
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("symbol collection errors: {0:?}")]
    Symbols(Vec<SymbolError>),
    #[error("ruleset errors: {0:?}")]
    Ruleset(Vec<RulesetError>),
    #[error(transparent)]
    Table(#[from] TableError),
}
