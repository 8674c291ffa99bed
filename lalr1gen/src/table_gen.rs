//! Canonical LR(1) state enumeration and parse table construction.
//!
//! Grounded in the originating system's `parse_table_generator`:
//! `generate_states` drives a worklist of states (a growing `Vec`, indices
//! doubling as a queue), closes each state's kernel, groups the closure by
//! symbol of interest, and for each group decides shift / single reduce /
//! shift-reduce conflict / reduce-reduce conflict. Resolved entries and
//! reduce-reduce ranges are recorded as hints and only assembled into the
//! dense `ParseTable` once every state is known, since a shift's target state
//! index is not stable until enumeration finishes appending new states.

use crate::action::{get_action, Reduction};
use crate::closure::Closure;
use crate::diagnostics::ConflictWarning;
use crate::item::Item;
use crate::ruleset::SealedRuleset;
use crate::state::State;
use crate::symbol::{Associativity, SymbolRef};
use crate::table::{ParseTable, ParseTableEntry, RhsLengthTable, RrTable, TableError};

/// The parse table plus its side tables, produced by [`build`].
pub struct GeneratedTables {
    pub parse_table: ParseTable,
    pub rr_table: RrTable,
    pub rhs_length: RhsLengthTable,
}

enum TableHint {
    Shift(usize),
    Reduce { nterm_idx: usize, rside_idx: usize },
    RrConflict { start: usize, count: usize },
}

struct PendingEntry {
    state_idx: usize,
    symbol: SymbolRef,
    hint: TableHint,
}

struct TableGenerator<'r, 's> {
    rs: &'r SealedRuleset<'s>,
    closure: Closure<'r, 's>,
    states: Vec<State>,
    pending: Vec<PendingEntry>,
    rr_reductions: Vec<Reduction>,
    warnings: Vec<ConflictWarning>,
}

impl<'r, 's> TableGenerator<'r, 's> {
    fn new(rs: &'r SealedRuleset<'s>) -> Self {
        TableGenerator {
            rs,
            closure: Closure::new(rs),
            states: vec![State::new(vec![Item::start()])],
            pending: Vec::new(),
            rr_reductions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Processes states in index order; `process_shift` may append new
    /// states, which then get their own turn as the loop index reaches them.
    fn generate_states(&mut self) {
        let mut state_idx = 0;
        while state_idx < self.states.len() {
            let kernel = self.states[state_idx].kernel().to_vec();
            let mut closure_items = Vec::new();
            for it in kernel {
                for &ci in self.closure.calculate_full(it).iter() {
                    closure_items.push(ci);
                }
            }
            self.states[state_idx].add_items(closure_items);

            let groups = self.states[state_idx].grouped_view(self.rs);
            for (symbol, items) in groups {
                let action = get_action(self.rs, items.iter());
                if action.has_conflict() {
                    self.process_conflict(state_idx, symbol, action);
                } else if action.is_one_reduction_only() {
                    let r = action.only_reduction();
                    self.process_single_reduce(state_idx, symbol, r);
                } else {
                    self.process_shift(state_idx, symbol, action.new_kernel().iter().copied().collect());
                }
            }

            tracing::debug!(state_idx, item_count = self.states[state_idx].items().len(), "state closed");
            state_idx += 1;
        }
        tracing::info!(state_count = self.states.len(), "canonical LR(1) states enumerated");
    }

    fn process_shift(&mut self, state_idx: usize, symbol: SymbolRef, new_kernel: Vec<Item>) {
        let target = self.find_state(&new_kernel).unwrap_or_else(|| {
            self.states.push(State::new(new_kernel));
            self.states.len() - 1
        });
        self.pending.push(PendingEntry { state_idx, symbol, hint: TableHint::Shift(target) });
    }

    fn process_single_reduce(&mut self, state_idx: usize, symbol: SymbolRef, r: Reduction) {
        self.pending.push(PendingEntry {
            state_idx,
            symbol,
            hint: TableHint::Reduce { nterm_idx: r.nterm_idx, rside_idx: r.rside_idx },
        });
    }

    fn process_rr_conflict(&mut self, state_idx: usize, symbol: SymbolRef, reductions: &[Reduction]) {
        let start = self.rr_reductions.len();
        self.rr_reductions.extend_from_slice(reductions);
        self.pending.push(PendingEntry {
            state_idx,
            symbol,
            hint: TableHint::RrConflict { start, count: reductions.len() },
        });
    }

    fn process_conflict(&mut self, state_idx: usize, symbol: SymbolRef, mut action: crate::action::Action) {
        let reductions = action.reductions().to_vec();
        let r_prec_max = reductions
            .iter()
            .map(|r| self.rs.effective_rhs_precedence(r.nterm_idx, r.rside_idx))
            .max()
            .expect("a conflict always has at least one reduction");
        let all_max: Vec<Reduction> = reductions
            .iter()
            .copied()
            .filter(|r| self.rs.effective_rhs_precedence(r.nterm_idx, r.rside_idx) == r_prec_max)
            .collect();
        let unique_max = all_max.len() == 1;

        let shift_chosen = if action.has_shift() {
            debug_assert!(symbol.is_terminal(), "a shift's symbol of interest is always a terminal");
            let s_prec = self.rs.term_precedence(symbol.index);
            let s_ass = self.rs.term_associativity(symbol.index);
            shift_over_reduce(s_prec, s_ass, r_prec_max)
        } else {
            false
        };

        self.warnings.push(self.collect_conflict_warnings(
            state_idx,
            symbol,
            &reductions,
            r_prec_max,
            unique_max,
            action.has_shift(),
            shift_chosen,
        ));

        if shift_chosen {
            let new_kernel = action.take_new_kernel().into_iter().collect();
            self.process_shift(state_idx, symbol, new_kernel);
        } else if unique_max {
            self.process_single_reduce(state_idx, symbol, all_max[0]);
        } else {
            self.process_rr_conflict(state_idx, symbol, &all_max);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_conflict_warnings(
        &self,
        state_idx: usize,
        symbol: SymbolRef,
        reductions: &[Reduction],
        r_prec_max: u16,
        unique_max: bool,
        has_shift: bool,
        shift_chosen: bool,
    ) -> ConflictWarning {
        let lookahead = self.rs.term_name(symbol.index).to_string();
        let mark_highest = unique_max && !shift_chosen;

        let mut lines = Vec::new();
        lines.push(format!(
            "Conflict in state {} on lookahead '{}' : {} possible reduction(s){}",
            state_idx,
            lookahead,
            reductions.len(),
            if has_shift { " and a shift" } else { "" }
        ));
        for r in reductions {
            let prec = self.rs.effective_rhs_precedence(r.nterm_idx, r.rside_idx);
            let marker = if mark_highest && prec == r_prec_max { " (highest precedence)" } else { "" };
            lines.push(format!(
                "  reduce by {} (rside {}){}",
                self.rs.nterm_name(r.nterm_idx),
                r.rside_idx,
                marker
            ));
        }
        if has_shift {
            let marker = if shift_chosen { " (chosen)" } else { "" };
            lines.push(format!("  shift '{}'{}", lookahead, marker));
        }

        let resolved = shift_chosen || unique_max;
        ConflictWarning { state_idx, lookahead, lines, resolved }
    }

    fn find_state(&self, kernel: &[Item]) -> Option<usize> {
        self.states.iter().position(|s| s.kernel_matches(kernel))
    }

    fn create_parse_table(self) -> Result<GeneratedTables, TableError> {
        let state_count = self.states.len();
        let mut parse_table = ParseTable::new(self.rs.term_count(), self.rs.nterm_count(), state_count);
        for entry in &self.pending {
            let table_entry = match entry.hint {
                TableHint::Shift(target) => ParseTableEntry::shift(target)?,
                TableHint::Reduce { nterm_idx, rside_idx } => ParseTableEntry::reduce(nterm_idx, rside_idx)?,
                TableHint::RrConflict { start, count } => ParseTableEntry::rr_conflict(start, count)?,
            };
            if entry.symbol.is_terminal() {
                parse_table.set_term_entry(entry.state_idx, entry.symbol.index, table_entry);
            } else {
                parse_table.set_nterm_entry(entry.state_idx, entry.symbol.index, table_entry);
            }
        }
        let rhs_length = RhsLengthTable::from_ruleset(self.rs);
        Ok(GeneratedTables { parse_table, rr_table: self.rr_reductions, rhs_length })
    }

    fn states_to_string(&self) -> String {
        let mut s = String::new();
        for (idx, state) in self.states.iter().enumerate() {
            s.push_str(&format!("state {}:\n", idx));
            s.push_str(&state.description(self.rs));
        }
        s
    }
}

fn shift_over_reduce(s_prec: u16, s_ass: Associativity, r_prec: u16) -> bool {
    s_prec > r_prec || (s_prec == r_prec && s_ass == Associativity::Right)
}

/// Enumerates the canonical LR(1) states for `rs` and emits its parse table,
/// reduce-reduce table, and rhs-length table, along with every conflict
/// warning encountered along the way.
pub fn build(rs: &SealedRuleset) -> Result<(GeneratedTables, Vec<ConflictWarning>), TableError> {
    let mut gen = TableGenerator::new(rs);
    gen.generate_states();
    let warnings = std::mem::take(&mut gen.warnings);
    let tables = gen.create_parse_table()?;
    Ok((tables, warnings))
}

/// A diagnostic dump of every generated state's kernel and closure, one
/// block per state. Recomputes state enumeration; intended for tests and
/// troubleshooting, not the hot path.
pub fn states_to_string(rs: &SealedRuleset) -> String {
    let mut gen = TableGenerator::new(rs);
    gen.generate_states();
    gen.states_to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::Ruleset;
    use crate::symbol::SymbolCollection;

    #[test]
    fn simple_expression_grammar_has_no_conflicts_and_shifts_then_reduces() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("E").unwrap();
        sc.add_terminal("n", None, Associativity::Left).unwrap();
        sc.add_terminal("plus", Some(1), Associativity::Left).unwrap();
        let (symbols, warnings) = sc.seal().unwrap();
        assert!(warnings.is_empty());

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("E").unwrap();
        rs.add_rule("E", &["E", "plus", "n"], None).unwrap();
        rs.add_rule("E", &["n"], None).unwrap();
        let (rs, warnings) = rs.seal().unwrap();
        assert!(warnings.is_empty());

        let (tables, conflicts) = build(&rs).unwrap();
        assert!(conflicts.is_empty(), "left-recursive sum grammar should be conflict-free");
        assert!(tables.parse_table.state_count() >= 4);

        // State 0 must shift on 'n'.
        let n_idx = symbols.lookup("n").unwrap().index;
        assert!(tables.parse_table.term_entry(0, n_idx).is_shift());
    }

    #[test]
    fn dangling_else_style_ambiguity_resolves_via_precedence() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("S").unwrap();
        sc.add_terminal("if_then", Some(1), Associativity::Left).unwrap();
        sc.add_terminal("if_then_else", Some(2), Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.set_root("S").unwrap();
        rs.add_rule("S", &["if_then", "S"], None).unwrap();
        rs.add_rule("S", &["if_then_else", "S", "S"], None).unwrap();
        rs.add_rule("S", &[], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();

        let (_tables, conflicts) = build(&rs).unwrap();
        // A grammar like this produces reduce/reduce-free but potential
        // shift/reduce tension resolved purely by precedence; whatever
        // conflicts surface must all resolve.
        for c in &conflicts {
            assert!(c.resolved, "conflict in state {} should resolve via precedence", c.state_idx);
        }
    }
}
