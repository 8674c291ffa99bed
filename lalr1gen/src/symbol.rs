//! Terminal/non-terminal registration and naming.
//!
//! Grounded in the originating system's `symbol_collection` class: two
//! disjoint index spaces (terminals, non-terminals), reserved `$`-prefixed
//! names, and a one-shot seal that freezes the collection and reports the
//! `no_user_non_terminals`/`no_user_terminals` diagnostics.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::diagnostics::Warning;

/// Reserved index of `$root`, always the first non-terminal.
pub const ROOT_NTERM: usize = 0;
/// Reserved index of `$eof`, always the first terminal.
pub const EOF_TERM: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolType {
    Terminal,
    NonTerminal,
}

/// A tagged reference into one of the two symbol spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolRef {
    pub kind: SymbolType,
    pub index: usize,
}

impl SymbolRef {
    pub fn terminal(index: usize) -> Self {
        SymbolRef { kind: SymbolType::Terminal, index }
    }

    pub fn non_terminal(index: usize) -> Self {
        SymbolRef { kind: SymbolType::NonTerminal, index }
    }

    pub fn is_terminal(self) -> bool {
        self.kind == SymbolType::Terminal
    }

    pub fn is_non_terminal(self) -> bool {
        self.kind == SymbolType::NonTerminal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

impl Default for Associativity {
    fn default() -> Self {
        Associativity::Left
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Associativity::Left => write!(f, "left"),
            Associativity::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("Cannot refer special '{0}' symbol")]
    ReservedName(String),
    #[error("Symbol '{0}' already exists")]
    DuplicateSymbol(String),
    #[error("No nonterminals")]
    NoUserNonTerminals,
}

#[derive(Debug, Clone, Copy)]
struct TermData {
    precedence: u16,
    associativity: Associativity,
}

/// A builder for the terminal/non-terminal namespace. `$root` (non-terminal
/// index 0) and `$eof` (terminal index 0) are pre-registered by `new`.
#[derive(Debug)]
pub struct SymbolCollection {
    term_names: Vec<String>,
    term_data: Vec<TermData>,
    nterm_names: Vec<String>,
    name_to_ref: HashMap<String, SymbolRef>,
}

impl SymbolCollection {
    pub fn new() -> Self {
        let mut sc = SymbolCollection {
            term_names: Vec::new(),
            term_data: Vec::new(),
            nterm_names: Vec::new(),
            name_to_ref: HashMap::new(),
        };
        sc.add_nterm_impl("$root".to_string());
        sc.add_term_impl("$eof".to_string(), None, Associativity::Left);
        sc
    }

    pub fn add_terminal(
        &mut self,
        name: &str,
        precedence: Option<u16>,
        associativity: Associativity,
    ) -> Result<SymbolRef, SymbolError> {
        self.validate_new_name(name)?;
        Ok(self.add_term_impl(name.to_string(), precedence, associativity))
    }

    pub fn add_non_terminal(&mut self, name: &str) -> Result<SymbolRef, SymbolError> {
        self.validate_new_name(name)?;
        Ok(self.add_nterm_impl(name.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolRef> {
        self.name_to_ref.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_ref.contains_key(name)
    }

    /// Freeze the collection. On success, returns the immutable view used by
    /// every later stage plus any accumulated warnings; on failure, returns
    /// the accumulated errors (currently only `no_user_non_terminals`).
    pub fn seal(self) -> Result<(SealedSymbols, Vec<Warning>), Vec<SymbolError>> {
        let mut warnings = Vec::new();
        if self.term_names.len() <= 1 {
            warnings.push(Warning::NoUserTerminals);
        }
        if self.nterm_names.len() <= 1 {
            tracing::warn!("symbol collection has no user non-terminals");
            return Err(vec![SymbolError::NoUserNonTerminals]);
        }
        tracing::info!(
            term_count = self.term_names.len(),
            nterm_count = self.nterm_names.len(),
            "symbol collection sealed"
        );
        Ok((
            SealedSymbols {
                term_names: self.term_names,
                term_data: self.term_data,
                nterm_names: self.nterm_names,
                name_to_ref: self.name_to_ref,
            },
            warnings,
        ))
    }

    fn validate_new_name(&self, name: &str) -> Result<(), SymbolError> {
        if name.starts_with('$') {
            return Err(SymbolError::ReservedName(name.to_string()));
        }
        if self.contains(name) {
            return Err(SymbolError::DuplicateSymbol(name.to_string()));
        }
        Ok(())
    }

    fn add_term_impl(
        &mut self,
        name: String,
        precedence: Option<u16>,
        associativity: Associativity,
    ) -> SymbolRef {
        let index = self.term_names.len();
        let r = SymbolRef::terminal(index);
        self.name_to_ref.insert(name.clone(), r);
        self.term_names.push(name);
        self.term_data.push(TermData { precedence: precedence.unwrap_or(0), associativity });
        r
    }

    fn add_nterm_impl(&mut self, name: String) -> SymbolRef {
        let index = self.nterm_names.len();
        let r = SymbolRef::non_terminal(index);
        self.name_to_ref.insert(name.clone(), r);
        self.nterm_names.push(name);
        r
    }
}

impl Default for SymbolCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_and_root_are_preregistered() {
        let sc = SymbolCollection::new();
        assert_eq!(sc.lookup("$eof"), Some(SymbolRef::terminal(EOF_TERM)));
        assert_eq!(sc.lookup("$root"), Some(SymbolRef::non_terminal(ROOT_NTERM)));
    }

    #[test]
    fn dollar_prefixed_names_are_reserved() {
        let mut sc = SymbolCollection::new();
        let err = sc.add_terminal("$foo", None, Associativity::Left).unwrap_err();
        assert!(matches!(err, SymbolError::ReservedName(n) if n == "$foo"));
    }

    #[test]
    fn duplicate_names_are_rejected_across_spaces() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("x").unwrap();
        let err = sc.add_terminal("x", None, Associativity::Left).unwrap_err();
        assert!(matches!(err, SymbolError::DuplicateSymbol(n) if n == "x"));
    }

    #[test]
    fn sealing_with_only_eof_warns_no_user_terminals() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("s").unwrap();
        let (_sealed, warnings) = sc.seal().unwrap();
        assert!(warnings.iter().any(|w| matches!(w, Warning::NoUserTerminals)));
    }

    #[test]
    fn sealing_with_only_root_errors_no_user_non_terminals() {
        let sc = SymbolCollection::new();
        let errors = sc.seal().unwrap_err();
        assert!(matches!(errors[0], SymbolError::NoUserNonTerminals));
    }

    #[test]
    fn term_precedence_and_associativity_round_trip() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("s").unwrap();
        sc.add_terminal("plus", Some(3), Associativity::Right).unwrap();
        let (sealed, _w) = sc.seal().unwrap();
        let plus = sealed.lookup("plus").unwrap();
        assert_eq!(sealed.term_precedence(plus.index), 3);
        assert_eq!(sealed.term_associativity(plus.index), Associativity::Right);
    }
}

/// The frozen, read-only view of a sealed [`SymbolCollection`].
#[derive(Debug)]
pub struct SealedSymbols {
    term_names: Vec<String>,
    term_data: Vec<TermData>,
    nterm_names: Vec<String>,
    name_to_ref: HashMap<String, SymbolRef>,
}

impl SealedSymbols {
    pub fn term_count(&self) -> usize {
        self.term_names.len()
    }

    pub fn nterm_count(&self) -> usize {
        self.nterm_names.len()
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolRef> {
        self.name_to_ref.get(name).copied()
    }

    pub fn term_name(&self, index: usize) -> &str {
        &self.term_names[index]
    }

    pub fn nterm_name(&self, index: usize) -> &str {
        &self.nterm_names[index]
    }

    pub fn symbol_name(&self, r: SymbolRef) -> &str {
        match r.kind {
            SymbolType::Terminal => self.term_name(r.index),
            SymbolType::NonTerminal => self.nterm_name(r.index),
        }
    }

    pub fn term_precedence(&self, index: usize) -> u16 {
        self.term_data[index].precedence
    }

    pub fn term_associativity(&self, index: usize) -> Associativity {
        self.term_data[index].associativity
    }
}
