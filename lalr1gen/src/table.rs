//! The dense parse table, its tagged-union entries, the side `rr_table`, and
//! the two small read-only tables the runtime driver needs alongside it
//! (`NameTable`, `rhs_length`).
//!
//! Grounded in the originating system's `parse_table`/`parse_table_entry`
//! classes. Unlike that implementation, the reduce entry here stores
//! `rside_idx` and nothing else — the driver recovers the pop count from a
//! separate `rhs_length` table, per the design note this grammar calls out
//! explicitly (the source's own driver conflates the two on the reduce
//! entry, which only happens to work when `rside_idx` equals rhs length).

use thiserror::Error;

use crate::action::Reduction;
use crate::ruleset::SealedRuleset;
use crate::symbol::SealedSymbols;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("encoding overflow: {0}")]
    EncodingOverflow(&'static str),
}

/// A single parse table cell: one of four kinds, `Error` by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseTableEntry {
    #[default]
    Error,
    Shift(u32),
    Reduce {
        nterm_idx: u16,
        rside_idx: u16,
    },
    RrConflict {
        start: u16,
        count: u16,
    },
}

impl ParseTableEntry {
    pub fn shift(state_idx: usize) -> Result<Self, TableError> {
        let s = u32::try_from(state_idx)
            .map_err(|_| TableError::EncodingOverflow("shift state index exceeds 32-bit limit"))?;
        Ok(ParseTableEntry::Shift(s))
    }

    pub fn reduce(nterm_idx: usize, rside_idx: usize) -> Result<Self, TableError> {
        let nterm_idx = u16::try_from(nterm_idx)
            .map_err(|_| TableError::EncodingOverflow("reduce nterm index exceeds 16-bit limit"))?;
        let rside_idx = u16::try_from(rside_idx)
            .map_err(|_| TableError::EncodingOverflow("reduce rside index exceeds 16-bit limit"))?;
        Ok(ParseTableEntry::Reduce { nterm_idx, rside_idx })
    }

    pub fn rr_conflict(start: usize, count: usize) -> Result<Self, TableError> {
        debug_assert!(count >= 2, "rr_conflict ranges must hold at least two reductions");
        let start = u16::try_from(start)
            .map_err(|_| TableError::EncodingOverflow("rr_conflict start index exceeds 16-bit limit"))?;
        let count = u16::try_from(count)
            .map_err(|_| TableError::EncodingOverflow("rr_conflict count exceeds 16-bit limit"))?;
        Ok(ParseTableEntry::RrConflict { start, count })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ParseTableEntry::Error)
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, ParseTableEntry::Shift(_))
    }

    pub fn is_reduce(&self) -> bool {
        matches!(self, ParseTableEntry::Reduce { .. })
    }

    pub fn is_rr_conflict(&self) -> bool {
        matches!(self, ParseTableEntry::RrConflict { .. })
    }
}

/// `table[state][symbol]`, columns = terminals then non-terminals.
#[derive(Debug)]
pub struct ParseTable {
    term_count: usize,
    nterm_count: usize,
    state_count: usize,
    cells: Vec<ParseTableEntry>,
}

impl ParseTable {
    pub fn new(term_count: usize, nterm_count: usize, state_count: usize) -> Self {
        ParseTable {
            term_count,
            nterm_count,
            state_count,
            cells: vec![ParseTableEntry::Error; term_count.saturating_add(nterm_count) * state_count],
        }
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn term_count(&self) -> usize {
        self.term_count
    }

    pub fn nterm_count(&self) -> usize {
        self.nterm_count
    }

    fn term_index(&self, state: usize, term_idx: usize) -> usize {
        state * (self.term_count + self.nterm_count) + term_idx
    }

    fn nterm_index(&self, state: usize, nterm_idx: usize) -> usize {
        state * (self.term_count + self.nterm_count) + self.term_count + nterm_idx
    }

    pub fn term_entry(&self, state: usize, term_idx: usize) -> ParseTableEntry {
        self.cells[self.term_index(state, term_idx)]
    }

    pub fn set_term_entry(&mut self, state: usize, term_idx: usize, entry: ParseTableEntry) {
        let idx = self.term_index(state, term_idx);
        self.cells[idx] = entry;
    }

    pub fn nterm_entry(&self, state: usize, nterm_idx: usize) -> ParseTableEntry {
        self.cells[self.nterm_index(state, nterm_idx)]
    }

    pub fn set_nterm_entry(&mut self, state: usize, nterm_idx: usize, entry: ParseTableEntry) {
        let idx = self.nterm_index(state, nterm_idx);
        self.cells[idx] = entry;
    }
}

/// Index-to-name lookup for terminals and non-terminals, handed to the
/// runtime driver alongside the table so it can render diagnostics without
/// depending on `lalr1gen`'s builder types.
#[derive(Debug, Clone)]
pub struct NameTable {
    term_names: Vec<String>,
    nterm_names: Vec<String>,
}

impl NameTable {
    pub fn from_symbols(symbols: &SealedSymbols) -> Self {
        let term_names = (0..symbols.term_count()).map(|i| symbols.term_name(i).to_string()).collect();
        let nterm_names = (0..symbols.nterm_count()).map(|i| symbols.nterm_name(i).to_string()).collect();
        NameTable { term_names, nterm_names }
    }

    pub fn term_name(&self, idx: usize) -> &str {
        &self.term_names[idx]
    }

    pub fn nterm_name(&self, idx: usize) -> &str {
        &self.nterm_names[idx]
    }

    pub fn term_count(&self) -> usize {
        self.term_names.len()
    }

    pub fn nterm_count(&self) -> usize {
        self.nterm_names.len()
    }
}

/// `rhs_length[nterm_idx][rside_idx]`, the auxiliary table the driver needs
/// to recover a reduce's pop count from the `rside_idx` the table entry
/// actually stores.
#[derive(Debug, Clone)]
pub struct RhsLengthTable {
    lengths: Vec<Vec<u16>>,
}

impl RhsLengthTable {
    pub fn from_ruleset(rs: &SealedRuleset) -> Self {
        let lengths = (0..rs.nterm_count())
            .map(|n| {
                (0..rs.nterm_rside_count(n))
                    .map(|r| rs.symbol_count_in_rhs(n, r) as u16)
                    .collect()
            })
            .collect();
        RhsLengthTable { lengths }
    }

    pub fn length(&self, nterm_idx: usize, rside_idx: usize) -> u16 {
        self.lengths[nterm_idx][rside_idx]
    }
}

pub type RrTable = Vec<Reduction>;
