//! The "action bundle" formed per group of items sharing a symbol of
//! interest, grounded in the originating system's `action` class and its
//! free function `get_action`.

use std::collections::BTreeSet;

use crate::item::Item;
use crate::ruleset::SealedRuleset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    pub nterm_idx: usize,
    pub rside_idx: usize,
}

/// The reductions and/or shifted kernel items produced by one group of
/// items sharing a symbol of interest.
#[derive(Debug, Default)]
pub struct Action {
    reductions: Vec<Reduction>,
    new_kernel: BTreeSet<Item>,
}

impl Action {
    pub fn new() -> Self {
        Action::default()
    }

    pub fn add_shift(&mut self, item: Item) {
        self.new_kernel.insert(item.shifted());
    }

    pub fn add_reduction(&mut self, nterm_idx: usize, rside_idx: usize) {
        self.reductions.push(Reduction { nterm_idx, rside_idx });
    }

    /// A mixed shift/reduce, or more than one reduction.
    pub fn has_conflict(&self) -> bool {
        self.reductions.len() > 1 || (self.reductions.len() == 1 && !self.new_kernel.is_empty())
    }

    pub fn is_one_reduction_only(&self) -> bool {
        self.reductions.len() == 1 && self.new_kernel.is_empty()
    }

    pub fn only_reduction(&self) -> Reduction {
        debug_assert!(self.is_one_reduction_only());
        self.reductions[0]
    }

    pub fn has_shift(&self) -> bool {
        !self.new_kernel.is_empty()
    }

    pub fn reductions(&self) -> &[Reduction] {
        &self.reductions
    }

    pub fn new_kernel(&self) -> &BTreeSet<Item> {
        &self.new_kernel
    }

    pub fn take_new_kernel(&mut self) -> BTreeSet<Item> {
        std::mem::take(&mut self.new_kernel)
    }
}

/// Builds the action bundle for a group of closure items that share one
/// symbol of interest: reducing items (dot at end) contribute a reduction
/// each, shifting items contribute their shifted form to `new_kernel`.
pub fn get_action<'a>(rs: &SealedRuleset, group: impl IntoIterator<Item = &'a Item>) -> Action {
    let mut result = Action::new();
    for &item in group {
        let prod_len = rs.symbol_count_in_rhs(item.nterm_idx, item.rside_idx);
        if item.dot_idx == prod_len {
            result.add_reduction(item.nterm_idx, item.rside_idx);
        } else {
            result.add_shift(item);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::Ruleset;
    use crate::symbol::{Associativity, SymbolCollection};

    #[test]
    fn mixed_group_is_flagged_as_conflict() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("S").unwrap();
        sc.add_non_terminal("A").unwrap();
        sc.add_terminal("a", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.add_rule("S", &["A"], None).unwrap();
        rs.add_rule("A", &["a"], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();

        let reducing = Item::new(2, 0, 1, 0); // A -> a . / $eof ($root=0, S=1, A=2)
        let shifting = Item::new(1, 0, 0, 0); // S -> . A / $eof
        let group = [reducing, shifting];

        let action = get_action(&rs, group.iter());
        assert_eq!(action.reductions().len(), 1);
        assert!(action.has_shift());
        assert!(action.has_conflict());
    }

    #[test]
    fn single_reduction_only_group_is_not_a_conflict() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("A").unwrap();
        sc.add_terminal("a", None, Associativity::Left).unwrap();
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.add_rule("A", &["a"], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();

        let reducing = Item::new(1, 0, 1, 0); // A -> a . / $eof
        let action = get_action(&rs, [reducing].iter());
        assert!(action.is_one_reduction_only());
        assert!(!action.has_conflict());
        assert_eq!(action.only_reduction().nterm_idx, 1);
    }
}
