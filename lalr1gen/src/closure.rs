//! Memoized, iterative LR(1) item-closure computation.
//!
//! Grounded in the originating system's `closure::calculate_full`: a
//! breadth-first worklist (never recursion, so arbitrarily deep grammars do
//! not blow the stack), memoized per input item.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

use crate::item::Item;
use crate::ruleset::SealedRuleset;

/// Computes and caches closures of single LR(1) items against a ruleset.
pub struct Closure<'r, 's> {
    rs: &'r SealedRuleset<'s>,
    cache: RefCell<HashMap<Item, Rc<BTreeSet<Item>>>>,
}

impl<'r, 's> Closure<'r, 's> {
    pub fn new(rs: &'r SealedRuleset<'s>) -> Self {
        Closure { rs, cache: RefCell::new(HashMap::new()) }
    }

    /// The transitive closure of `item`, memoized.
    pub fn calculate_full(&self, item: Item) -> Rc<BTreeSet<Item>> {
        if let Some(cached) = self.cache.borrow().get(&item) {
            return Rc::clone(cached);
        }

        let mut result = BTreeSet::new();
        result.insert(item);
        let mut worklist = VecDeque::new();
        worklist.push_back(item);

        while let Some(it) = worklist.pop_front() {
            let rhs_len = self.rs.symbol_count_in_rhs(it.nterm_idx, it.rside_idx);
            if it.dot_idx == rhs_len {
                continue;
            }
            let after_dot = self.rs.symbol_of_rhs(it.nterm_idx, it.rside_idx, it.dot_idx);
            if after_dot.is_terminal() {
                continue;
            }
            let c = after_dot.index;

            let mut lookaheads: BTreeSet<usize> = BTreeSet::new();
            let beta_idx = it.dot_idx + 1;
            if beta_idx == rhs_len {
                lookaheads.insert(it.lookahead_idx);
            } else {
                if let Some(first_beta) = self.rs.first_of_suffix(it.nterm_idx, it.rside_idx, beta_idx) {
                    lookaheads.extend(first_beta.iter().copied());
                }
                if self.rs.is_suffix_nullable(it.nterm_idx, it.rside_idx, beta_idx) {
                    lookaheads.insert(it.lookahead_idx);
                }
            }

            for &la in &lookaheads {
                for s2 in 0..self.rs.nterm_rside_count(c) {
                    let candidate = Item::new(c, s2, 0, la);
                    if result.insert(candidate) {
                        worklist.push_back(candidate);
                    }
                }
            }
        }

        let result = Rc::new(result);
        self.cache.borrow_mut().insert(item, Rc::clone(&result));
        result
    }
}
