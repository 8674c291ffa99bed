//! Canonical LR(1) parse table construction: symbol registration, grammar
//! rules with incremental nullable/FIRST analysis, LR(1) state enumeration,
//! precedence-based conflict resolution, and a compact parse table.
//!
//! The pipeline is used in three steps:
//!
//! ```ignore
//! let mut symbols = SymbolCollection::new();
//! symbols.add_non_terminal("expr")?;
//! symbols.add_terminal("num", None, Associativity::Left)?;
//! let (symbols, symbol_warnings) = symbols.seal()?;
//!
//! let mut rules = Ruleset::new(&symbols);
//! rules.add_rule("expr", &["num"], None)?;
//! let (rules, rule_warnings) = rules.seal()?;
//!
//! let (tables, name_table, conflicts) = lalr1gen::generate(&symbols, &rules)?;
//! ```
//!
//! This crate does no I/O and does not parse grammar source text; it only
//! builds the in-memory tables a driver (see `lalr1rt`) runs against.

mod action;
mod closure;
mod diagnostics;
mod error;
mod item;
mod ruleset;
mod state;
mod symbol;
mod table;
mod table_gen;

pub use action::Reduction;
pub use diagnostics::{ConflictWarning, Warning};
pub use error::GenerateError;
pub use item::Item;
pub use ruleset::{RulesetError, SealedRuleset, Ruleset, TermSet};
pub use symbol::{Associativity, SealedSymbols, SymbolCollection, SymbolError, SymbolRef, SymbolType, EOF_TERM, ROOT_NTERM};
pub use table::{NameTable, ParseTable, ParseTableEntry, RhsLengthTable, RrTable, TableError};
pub use table_gen::{states_to_string, GeneratedTables};

/// Runs state enumeration and table construction, and additionally builds
/// the [`NameTable`] the runtime driver needs for diagnostics.
pub fn generate(
    symbols: &SealedSymbols,
    rules: &SealedRuleset,
) -> Result<(GeneratedTables, NameTable, Vec<ConflictWarning>), GenerateError> {
    let (tables, warnings) = table_gen::build(rules)?;
    let name_table = NameTable::from_symbols(symbols);
    Ok((tables, name_table, warnings))
}
