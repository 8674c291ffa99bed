//! The LR(1) item quadruple, grounded in the originating system's
//! `lr1_set_item`: `(nterm_idx, rside_idx, dot_idx, lookahead_idx)`, equal
//! iff all four coordinates match.

use std::fmt;

use crate::ruleset::SealedRuleset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub nterm_idx: usize,
    pub rside_idx: usize,
    pub dot_idx: usize,
    pub lookahead_idx: usize,
}

impl Item {
    pub fn new(nterm_idx: usize, rside_idx: usize, dot_idx: usize, lookahead_idx: usize) -> Self {
        Item { nterm_idx, rside_idx, dot_idx, lookahead_idx }
    }

    /// The canonical start item `($root, 0, 0, $eof)`.
    pub fn start() -> Self {
        Item::new(0, 0, 0, 0)
    }

    /// Item with the dot advanced by one position.
    pub fn shifted(self) -> Self {
        Item { dot_idx: self.dot_idx + 1, ..self }
    }

    pub fn is_reducible(self, rs: &SealedRuleset) -> bool {
        self.dot_idx == rs.symbol_count_in_rhs(self.nterm_idx, self.rside_idx)
    }
}

/// A cheap `Display` wrapper that needs the owning ruleset to print names.
pub struct ItemDisplay<'a> {
    pub item: Item,
    pub rs: &'a SealedRuleset<'a>,
}

impl<'a> fmt::Display for ItemDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let it = self.item;
        let rs = self.rs;
        write!(f, "{} ->", rs.nterm_name(it.nterm_idx))?;
        let len = rs.symbol_count_in_rhs(it.nterm_idx, it.rside_idx);
        for i in 0..len {
            if i == it.dot_idx {
                write!(f, " .")?;
            }
            write!(f, " {}", rs.symbol_name(rs.symbol_of_rhs(it.nterm_idx, it.rside_idx, i)))?;
        }
        if it.dot_idx == len {
            write!(f, " .")?;
        }
        write!(f, " / {}", rs.term_name(it.lookahead_idx))
    }
}
