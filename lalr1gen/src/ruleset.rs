//! Productions, incremental nullability and FIRST-set computation, and
//! effective-precedence resolution.
//!
//! Grounded in the originating system's `ruleset` class (`ruleset.cpp`):
//! `add_rule` seeds a work queue that drives nullability and FIRST to a
//! fixed point incrementally, rather than recomputing from scratch on every
//! rule addition. The two propagation routines below
//! (`propagate_nullable`/`propagate_added_to_first_set`) are a direct
//! translation of that algorithm; only the underlying set representation
//! changed, from a dense index-space bitset to a `BTreeSet<usize>`, since
//! the bitset itself is implementation convenience the grammar is silent on.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use thiserror::Error;

use crate::diagnostics::Warning;
use crate::symbol::{Associativity, SealedSymbols, SymbolRef, SymbolType};

/// A FIRST set: terminal indices that may begin some derivation.
pub type TermSet = BTreeSet<usize>;

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("Cannot refer special '{0}' symbol")]
    ReservedName(String),
    #[error("Left side '{0}' does not exist")]
    UnknownLhs(String),
    #[error("Left side '{0}' is a terminal")]
    LhsIsTerminal(String),
    #[error("Right side symbol '{0}' does not exist")]
    UnknownRhsSymbol(String),
    #[error("Root symbol '{0}' is a terminal")]
    RootIsTerminal(String),
    #[error("Root symbol '{0}' does not exist")]
    RootNotFound(String),
    #[error("Nonterminal '{0}' has no productions")]
    NoProductions(String),
    #[error("Nonterminal '{0}' is unsolvable")]
    Unsolvable(String),
}

#[derive(Debug, Clone, Copy)]
struct Appearance {
    nterm_idx: usize,
    rside_idx: usize,
    suffix_idx: usize,
}

/// One right-hand side of a production.
#[derive(Debug, Clone)]
pub struct Rside {
    pub symbols: Vec<SymbolRef>,
    pub explicit_precedence: Option<u16>,
    /// Per suffix position: remaining not-yet-nullable trailing non-terminals,
    /// `usize::MAX` if the suffix is not a pure trailing non-terminal run.
    nullable_remaining: Vec<usize>,
    /// Per suffix position: FIRST(rhs[i..]), lazily populated.
    first: Vec<Option<TermSet>>,
    effective_precedence: Option<u16>,
}

impl Rside {
    fn new(symbols: Vec<SymbolRef>, explicit_precedence: Option<u16>) -> Self {
        let len = symbols.len();
        // One extra slot at `len` for the end-of-rhs suffix (the empty
        // string past the last symbol), which is always nullable.
        let mut nullable_remaining = vec![usize::MAX; len + 1];
        nullable_remaining[len] = 0;
        Rside {
            symbols,
            explicit_precedence,
            nullable_remaining,
            first: vec![None; len + 1],
            effective_precedence: None,
        }
    }
}

#[derive(Debug, Default)]
struct NtermData {
    rsides: Vec<Rside>,
    first: Option<TermSet>,
    appearances_in_potentially_nullable_suffixes: Vec<Appearance>,
    appearances_at_start_of_suffixes: Vec<Appearance>,
}

/// A mutable builder over a sealed symbol collection. Accumulates
/// productions and incrementally tracks nullability/FIRST as they are added;
/// `seal()` injects `$root -> S`, computes effective precedences, and runs
/// the validation passes.
pub struct Ruleset<'s> {
    symbols: &'s SealedSymbols,
    nterms_data: Vec<NtermData>,
    nullable_nterms: BTreeSet<usize>,
    root: SymbolRef,
}

impl<'s> Ruleset<'s> {
    /// `symbols` must have at least one user non-terminal; `SealedSymbols`
    /// is only constructed once `SymbolCollection::seal` has confirmed that.
    pub fn new(symbols: &'s SealedSymbols) -> Self {
        let nterm_count = symbols.nterm_count();
        debug_assert!(nterm_count >= 2, "ruleset requires at least one user non-terminal");
        let mut nterms_data = Vec::with_capacity(nterm_count);
        nterms_data.resize_with(nterm_count, NtermData::default);
        Ruleset { symbols, nterms_data, nullable_nterms: BTreeSet::new(), root: SymbolRef::non_terminal(1) }
    }

    pub fn set_root(&mut self, name: &str) -> Result<SymbolRef, RulesetError> {
        if name.starts_with('$') {
            return Err(RulesetError::ReservedName(name.to_string()));
        }
        let r = self.symbols.lookup(name).ok_or_else(|| RulesetError::RootNotFound(name.to_string()))?;
        if r.kind != SymbolType::NonTerminal {
            return Err(RulesetError::RootIsTerminal(name.to_string()));
        }
        self.root = r;
        Ok(r)
    }

    pub fn add_rule(
        &mut self,
        lhs: &str,
        rhs: &[&str],
        precedence: Option<u16>,
    ) -> Result<usize, RulesetError> {
        let lref = self.validate_lhs(lhs)?;
        let mut rrefs = Vec::with_capacity(rhs.len());
        for &s in rhs {
            rrefs.push(self.validate_rhs_symbol(s)?);
        }
        Ok(self.add_rside_impl(lref.index, rrefs, precedence))
    }

    fn validate_lhs(&self, name: &str) -> Result<SymbolRef, RulesetError> {
        if name.starts_with('$') {
            return Err(RulesetError::ReservedName(name.to_string()));
        }
        let lref = self.symbols.lookup(name).ok_or_else(|| RulesetError::UnknownLhs(name.to_string()))?;
        if lref.kind != SymbolType::NonTerminal {
            return Err(RulesetError::LhsIsTerminal(name.to_string()));
        }
        Ok(lref)
    }

    fn validate_rhs_symbol(&self, name: &str) -> Result<SymbolRef, RulesetError> {
        if name.starts_with('$') {
            return Err(RulesetError::ReservedName(name.to_string()));
        }
        self.symbols.lookup(name).ok_or_else(|| RulesetError::UnknownRhsSymbol(name.to_string()))
    }

    /// Inject `$root -> S`, compute effective precedences, run the
    /// validation passes, and freeze. On success returns the frozen view
    /// plus warnings; on failure, the accumulated errors.
    pub fn seal(mut self) -> Result<(SealedRuleset<'s>, Vec<Warning>), Vec<RulesetError>> {
        let mut errors = Vec::new();
        self.check_nterm_no_rsides(&mut errors);
        let mut warnings = Vec::new();
        self.check_unused_symbols(&mut warnings);
        self.check_unsolvable_nterms(&mut errors);

        debug_assert!(self.nterms_data[0].rsides.is_empty(), "$root must not have user rules");
        let root = self.root;
        self.add_rside_impl(0, vec![root], None);

        for i in 0..self.nterm_count() {
            for j in 0..self.nterms_data[i].rsides.len() {
                self.calculate_effective_rside_precedence(i, j);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        tracing::info!(
            nterm_count = self.nterm_count(),
            term_count = self.symbols.term_count(),
            "ruleset sealed"
        );
        Ok((SealedRuleset { symbols: self.symbols, nterms_data: self.nterms_data, root: self.root }, warnings))
    }

    fn nterm_count(&self) -> usize {
        self.nterms_data.len()
    }

    // --- incremental nullable/FIRST propagation, ported from ruleset.cpp ---

    fn add_rside_impl(&mut self, lhs_idx: usize, symbols: Vec<SymbolRef>, precedence: Option<u16>) -> usize {
        let new_rside_idx = self.nterms_data[lhs_idx].rsides.len();
        let rside = Rside::new(symbols, precedence);
        let len = rside.symbols.len();
        self.nterms_data[lhs_idx].rsides.push(rside);

        if len == 0 {
            if self.nullable_nterms.insert(lhs_idx) {
                self.propagate_nullable(lhs_idx);
            }
            return new_rside_idx;
        }

        // Trailing all-non-terminal segment.
        let symbols = self.nterms_data[lhs_idx].rsides[new_rside_idx].symbols.clone();
        let mut trail_start = len;
        while trail_start != 0 && symbols[trail_start - 1].kind != SymbolType::Terminal {
            trail_start -= 1;
        }

        if trail_start < len {
            let mut cumulative_remaining = 0usize;
            let mut suffix_idx = len;
            while suffix_idx > trail_start {
                suffix_idx -= 1;
                let nt_idx = symbols[suffix_idx].index;
                let add_to_remaining = if self.nullable_nterms.contains(&nt_idx) { 0 } else { 1 };
                cumulative_remaining += add_to_remaining;
                self.nterms_data[lhs_idx].rsides[new_rside_idx].nullable_remaining[suffix_idx] = cumulative_remaining;
                if add_to_remaining > 0 {
                    self.nterms_data[nt_idx].appearances_in_potentially_nullable_suffixes.push(Appearance {
                        nterm_idx: lhs_idx,
                        rside_idx: new_rside_idx,
                        suffix_idx,
                    });
                }
                if cumulative_remaining == 0 && suffix_idx == 0 && self.nullable_nterms.insert(lhs_idx) {
                    self.propagate_nullable(lhs_idx);
                }
            }
        }

        let mut nullable_streak = 0usize;
        for suffix_idx in 0..len {
            let sym = symbols[suffix_idx];
            if sym.kind == SymbolType::Terminal {
                let lo = suffix_idx - nullable_streak;
                for i in lo..=suffix_idx {
                    first_add_term(&mut self.nterms_data[lhs_idx].rsides[new_rside_idx].first[i], sym.index);
                }
                if suffix_idx == nullable_streak
                    && first_add_term(&mut self.nterms_data[lhs_idx].first, sym.index)
                {
                    self.propagate_added_to_first_set(lhs_idx, sym.index);
                }
                nullable_streak = 0;
            } else {
                let other = self.nterms_data[sym.index].first.clone();
                let lo = suffix_idx - nullable_streak;
                if let Some(other) = &other {
                    for i in lo..=suffix_idx {
                        first_union(&mut self.nterms_data[lhs_idx].rsides[new_rside_idx].first[i], other);
                    }
                }
                if suffix_idx == nullable_streak {
                    let newly = if let Some(other) = &other {
                        first_union_new(&mut self.nterms_data[lhs_idx].first, other)
                    } else {
                        Vec::new()
                    };
                    for t in newly {
                        self.propagate_added_to_first_set(lhs_idx, t);
                    }
                }

                if self.nullable_nterms.contains(&sym.index) {
                    nullable_streak += 1;
                } else {
                    nullable_streak = 0;
                }

                self.nterms_data[sym.index].appearances_at_start_of_suffixes.push(Appearance {
                    nterm_idx: lhs_idx,
                    rside_idx: new_rside_idx,
                    suffix_idx,
                });
            }
        }

        new_rside_idx
    }

    fn propagate_nullable(&mut self, nt_idx: usize) {
        let mut q = VecDeque::new();
        q.push_back(nt_idx);
        while let Some(nt) = q.pop_front() {
            let monitored = self.nterms_data[nt].appearances_in_potentially_nullable_suffixes.clone();
            for a in monitored {
                let remaining = &mut self.nterms_data[a.nterm_idx].rsides[a.rside_idx].nullable_remaining[a.suffix_idx];
                if *remaining > 0 {
                    *remaining -= 1;
                    if *remaining == 0 && a.suffix_idx == 0 && self.nullable_nterms.insert(a.nterm_idx) {
                        q.push_back(a.nterm_idx);
                    }
                }
            }

            let heads = self.nterms_data[nt].appearances_at_start_of_suffixes.clone();
            for a in heads {
                let rside_len = self.nterms_data[a.nterm_idx].rsides[a.rside_idx].symbols.len();
                let mut suffix = a.suffix_idx + 1;
                while suffix < rside_len {
                    let next = self.nterms_data[a.nterm_idx].rsides[a.rside_idx].symbols[suffix];
                    if next.kind == SymbolType::NonTerminal {
                        self.nterms_data[next.index].appearances_at_start_of_suffixes.push(a);
                        let other = self.nterms_data[next.index].first.clone();
                        if let Some(other) = &other {
                            first_union(
                                &mut self.nterms_data[a.nterm_idx].rsides[a.rside_idx].first[a.suffix_idx],
                                other,
                            );
                        }
                        if !self.nullable_nterms.contains(&next.index) {
                            break;
                        }
                    } else {
                        first_add_term(
                            &mut self.nterms_data[a.nterm_idx].rsides[a.rside_idx].first[a.suffix_idx],
                            next.index,
                        );
                        if a.suffix_idx == 0 && first_add_term(&mut self.nterms_data[a.nterm_idx].first, next.index) {
                            self.propagate_added_to_first_set(a.nterm_idx, next.index);
                        }
                        break;
                    }
                    suffix += 1;
                }
            }
        }
    }

    fn propagate_added_to_first_set(&mut self, nt_idx: usize, t_idx: usize) {
        let mut q = VecDeque::new();
        q.push_back((nt_idx, t_idx));
        while let Some((nt, t)) = q.pop_front() {
            let heads = self.nterms_data[nt].appearances_at_start_of_suffixes.clone();
            for a in heads {
                first_add_term(&mut self.nterms_data[a.nterm_idx].rsides[a.rside_idx].first[a.suffix_idx], t);
                if a.suffix_idx == 0 && first_add_term(&mut self.nterms_data[a.nterm_idx].first, t) {
                    q.push_back((a.nterm_idx, t));
                }
            }
        }
    }

    fn calculate_effective_rside_precedence(&mut self, nterm_idx: usize, rside_idx: usize) {
        let mut ret = 0u16;
        let explicit = self.nterms_data[nterm_idx].rsides[rside_idx].explicit_precedence;
        if let Some(p) = explicit {
            ret = p;
        } else {
            let symbols = self.nterms_data[nterm_idx].rsides[rside_idx].symbols.clone();
            for i in (0..symbols.len()).rev() {
                let sym = symbols[i];
                if sym.kind == SymbolType::Terminal {
                    let prec = self.symbols.term_precedence(sym.index);
                    if prec != 0 {
                        ret = prec;
                        break;
                    }
                }
            }
        }
        self.nterms_data[nterm_idx].rsides[rside_idx].effective_precedence = Some(ret);
    }

    fn check_nterm_no_rsides(&self, errors: &mut Vec<RulesetError>) {
        for i in 1..self.nterm_count() {
            if self.nterms_data[i].rsides.is_empty() {
                errors.push(RulesetError::NoProductions(self.symbols.nterm_name(i).to_string()));
            }
        }
    }

    fn check_unused_symbols(&self, warnings: &mut Vec<Warning>) {
        let mut reachable = BTreeSet::new();
        let mut q = VecDeque::new();
        q.push_back(self.root.index);
        reachable.insert(self.root.index);
        let mut used_terms = BTreeSet::new();

        while let Some(curr) = q.pop_front() {
            for rside in &self.nterms_data[curr].rsides {
                for &sym in &rside.symbols {
                    if sym.kind == SymbolType::NonTerminal {
                        if reachable.insert(sym.index) {
                            q.push_back(sym.index);
                        }
                    } else {
                        used_terms.insert(sym.index);
                    }
                }
            }
        }

        for i in 1..self.nterm_count() {
            if !reachable.contains(&i) {
                warnings.push(Warning::UnusedNonTerminal(self.symbols.nterm_name(i).to_string()));
            }
        }
        for i in 1..self.symbols.term_count() {
            if !used_terms.contains(&i) {
                warnings.push(Warning::UnusedTerminal(self.symbols.term_name(i).to_string()));
            }
        }
    }

    fn check_unsolvable_nterms(&self, errors: &mut Vec<RulesetError>) {
        for i in 1..self.nterm_count() {
            let nd = &self.nterms_data[i];
            let pure_epsilon = nd.rsides.len() == 1 && nd.rsides[0].symbols.is_empty();
            if nd.first.is_none() && !nd.rsides.is_empty() && !pure_epsilon {
                errors.push(RulesetError::Unsolvable(self.symbols.nterm_name(i).to_string()));
            }
        }
    }
}

fn first_add_term(set: &mut Option<TermSet>, t: usize) -> bool {
    set.get_or_insert_with(TermSet::new).insert(t)
}

fn first_union(set: &mut Option<TermSet>, other: &TermSet) {
    let s = set.get_or_insert_with(TermSet::new);
    for &t in other {
        s.insert(t);
    }
}

/// Like [`first_union`] but returns the elements that were newly inserted,
/// so the caller can propagate each exactly once.
fn first_union_new(set: &mut Option<TermSet>, other: &TermSet) -> Vec<usize> {
    let s = set.get_or_insert_with(TermSet::new);
    let mut newly = Vec::new();
    for &t in other {
        if s.insert(t) {
            newly.push(t);
        }
    }
    newly
}

/// The frozen, validated grammar: every query later stages need.
pub struct SealedRuleset<'s> {
    symbols: &'s SealedSymbols,
    nterms_data: Vec<NtermData>,
    root: SymbolRef,
}

impl<'s> SealedRuleset<'s> {
    pub fn root(&self) -> SymbolRef {
        self.root
    }

    pub fn nterm_count(&self) -> usize {
        self.nterms_data.len()
    }

    pub fn term_count(&self) -> usize {
        self.symbols.term_count()
    }

    pub fn nterm_rside_count(&self, nterm_idx: usize) -> usize {
        self.nterms_data[nterm_idx].rsides.len()
    }

    pub fn symbol_count_in_rhs(&self, nterm_idx: usize, rside_idx: usize) -> usize {
        self.nterms_data[nterm_idx].rsides[rside_idx].symbols.len()
    }

    pub fn symbol_of_rhs(&self, nterm_idx: usize, rside_idx: usize, suffix_idx: usize) -> SymbolRef {
        self.nterms_data[nterm_idx].rsides[rside_idx].symbols[suffix_idx]
    }

    pub fn symbol_name(&self, r: SymbolRef) -> &str {
        self.symbols.symbol_name(r)
    }

    pub fn nterm_name(&self, idx: usize) -> &str {
        self.symbols.nterm_name(idx)
    }

    pub fn term_name(&self, idx: usize) -> &str {
        self.symbols.term_name(idx)
    }

    pub fn term_precedence(&self, idx: usize) -> u16 {
        self.symbols.term_precedence(idx)
    }

    pub fn term_associativity(&self, idx: usize) -> Associativity {
        self.symbols.term_associativity(idx)
    }

    /// The symbol after the dot, or the lookahead terminal if the dot is at
    /// the end of the rhs.
    pub fn symbol_of_interest(&self, item: crate::item::Item) -> SymbolRef {
        if item.dot_idx < self.symbol_count_in_rhs(item.nterm_idx, item.rside_idx) {
            self.symbol_of_rhs(item.nterm_idx, item.rside_idx, item.dot_idx)
        } else {
            SymbolRef::terminal(item.lookahead_idx)
        }
    }

    pub fn is_suffix_nullable(&self, nterm_idx: usize, rside_idx: usize, suffix_idx: usize) -> bool {
        self.nterms_data[nterm_idx].rsides[rside_idx].nullable_remaining[suffix_idx] == 0
    }

    pub fn first_of_suffix(&self, nterm_idx: usize, rside_idx: usize, suffix_idx: usize) -> Option<&TermSet> {
        self.nterms_data[nterm_idx].rsides[rside_idx].first[suffix_idx].as_ref()
    }

    pub fn first_of_nterm(&self, nterm_idx: usize) -> Option<&TermSet> {
        self.nterms_data[nterm_idx].first.as_ref()
    }

    pub fn effective_rhs_precedence(&self, nterm_idx: usize, rside_idx: usize) -> u16 {
        self.nterms_data[nterm_idx].rsides[rside_idx]
            .effective_precedence
            .expect("effective precedence computed during seal")
    }

    pub fn explicit_rhs_precedence(&self, nterm_idx: usize, rside_idx: usize) -> Option<u16> {
        self.nterms_data[nterm_idx].rsides[rside_idx].explicit_precedence
    }

    pub fn item_display(&'s self, item: crate::item::Item) -> crate::item::ItemDisplay<'s> {
        crate::item::ItemDisplay { item, rs: self }
    }
}

impl<'s> fmt::Debug for SealedRuleset<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedRuleset")
            .field("nterm_count", &self.nterm_count())
            .field("term_count", &self.term_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolCollection;

    #[test]
    fn nullable_chain_propagates_transitively() {
        // A -> B, B -> C, C -> ε : all three must end up nullable.
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_non_terminal("B").unwrap();
        sc.add_non_terminal("C").unwrap();
        sc.add_terminal("z", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        rs.add_rule("A", &["B"], None).unwrap();
        rs.add_rule("B", &["C"], None).unwrap();
        rs.add_rule("C", &[], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();

        let a = symbols.lookup("A").unwrap().index;
        let b = symbols.lookup("B").unwrap().index;
        let c = symbols.lookup("C").unwrap().index;
        assert!(rs.is_suffix_nullable(a, 0, 0));
        assert!(rs.is_suffix_nullable(b, 0, 0));
        assert!(rs.is_suffix_nullable(c, 0, 0));
    }

    #[test]
    fn nullable_head_lets_first_see_past_it() {
        // A -> B z, B -> ε : FIRST(A) must include z even though B leads.
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_non_terminal("B").unwrap();
        sc.add_terminal("z", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        rs.add_rule("A", &["B", "z"], None).unwrap();
        rs.add_rule("B", &[], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();

        let a = symbols.lookup("A").unwrap().index;
        let z = symbols.lookup("z").unwrap().index;
        assert!(rs.first_of_nterm(a).unwrap().contains(&z));
    }

    #[test]
    fn direct_left_recursion_with_base_case_is_solvable() {
        // E -> E plus n | n
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("E").unwrap();
        sc.add_terminal("plus", None, Associativity::Left).unwrap();
        sc.add_terminal("n", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("E").unwrap();
        rs.add_rule("E", &["E", "plus", "n"], None).unwrap();
        rs.add_rule("E", &["n"], None).unwrap();
        let (rs, warnings) = rs.seal().unwrap();
        assert!(warnings.is_empty());

        let e = symbols.lookup("E").unwrap().index;
        let n = symbols.lookup("n").unwrap().index;
        assert_eq!(rs.first_of_nterm(e).unwrap(), &TermSet::from([n]));
    }

    #[test]
    fn pure_left_recursion_without_base_is_unsolvable() {
        // A -> A b, no base case: A can never derive a terminal first.
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_terminal("b", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        rs.add_rule("A", &["A", "b"], None).unwrap();
        let errors = rs.seal().unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, RulesetError::Unsolvable(n) if n == "A")));
    }

    #[test]
    fn mutual_non_left_recursion_is_solvable() {
        // A -> x B, B -> y A | z
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_non_terminal("B").unwrap();
        sc.add_terminal("x", None, Associativity::Left).unwrap();
        sc.add_terminal("y", None, Associativity::Left).unwrap();
        sc.add_terminal("z", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        rs.add_rule("A", &["x", "B"], None).unwrap();
        rs.add_rule("B", &["y", "A"], None).unwrap();
        rs.add_rule("B", &["z"], None).unwrap();
        let (rs, warnings) = rs.seal().unwrap();
        assert!(warnings.is_empty());

        let a = symbols.lookup("A").unwrap().index;
        let b = symbols.lookup("B").unwrap().index;
        let x = symbols.lookup("x").unwrap().index;
        let y = symbols.lookup("y").unwrap().index;
        let z = symbols.lookup("z").unwrap().index;
        assert_eq!(rs.first_of_nterm(a).unwrap(), &TermSet::from([x]));
        assert_eq!(rs.first_of_nterm(b).unwrap(), &TermSet::from([y, z]));
    }

    #[test]
    fn nonterminal_with_no_productions_is_an_error() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_non_terminal("Unreachable").unwrap();
        sc.add_terminal("a", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        rs.add_rule("A", &["a"], None).unwrap();
        let errors = rs.seal().unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, RulesetError::NoProductions(n) if n == "Unreachable")));
    }

    #[test]
    fn unreachable_non_terminal_is_a_warning_not_an_error() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_non_terminal("U").unwrap();
        sc.add_terminal("a", None, Associativity::Left).unwrap();
        sc.add_terminal("b", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        rs.add_rule("A", &["a"], None).unwrap();
        rs.add_rule("U", &["b"], None).unwrap();
        let (_rs, warnings) = rs.seal().unwrap();
        assert!(warnings.iter().any(|w| matches!(w, Warning::UnusedNonTerminal(n) if n == "U")));
    }

    #[test]
    fn unused_terminal_is_a_warning() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_terminal("a", None, Associativity::Left).unwrap();
        sc.add_terminal("unused", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        rs.add_rule("A", &["a"], None).unwrap();
        let (_rs, warnings) = rs.seal().unwrap();
        assert!(warnings.iter().any(|w| matches!(w, Warning::UnusedTerminal(n) if n == "unused")));
    }

    #[test]
    fn empty_rhs_is_immediately_nullable() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("A").unwrap();
        let rside = rs.add_rule("A", &[], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();
        let a = symbols.lookup("A").unwrap().index;
        assert!(rs.is_suffix_nullable(a, rside, 0));
    }

    #[test]
    fn explicit_precedence_overrides_last_terminal() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("E").unwrap();
        sc.add_terminal("plus", Some(1), Associativity::Left).unwrap();
        sc.add_terminal("n", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("E").unwrap();
        let rside = rs.add_rule("E", &["E", "plus", "n"], Some(9)).unwrap();
        rs.add_rule("E", &["n"], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();
        let e = symbols.lookup("E").unwrap().index;
        assert_eq!(rs.effective_rhs_precedence(e, rside), 9);
    }
}
