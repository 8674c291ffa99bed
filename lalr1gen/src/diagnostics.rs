//! Warning types shared across stages, plus the multi-line conflict-warning
//! rendering grounded in the originating system's `grammar_error_templates`
//! (`conflict_intro`/`conflict_detail*`/`conflict_resolved`/`conflict_unresolved`).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    NoUserTerminals,
    UnusedNonTerminal(String),
    UnusedTerminal(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoUserTerminals => write!(f, "No terminals"),
            Warning::UnusedNonTerminal(name) => write!(f, "Nonterminal '{}' is unused", name),
            Warning::UnusedTerminal(name) => write!(f, "Terminal '{}' is unused", name),
        }
    }
}

/// One rendered conflict: an intro line, one detail line per participating
/// reduction/shift, and a closing resolved/unresolved line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictWarning {
    pub state_idx: usize,
    pub lookahead: String,
    pub lines: Vec<String>,
    pub resolved: bool,
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        if self.resolved {
            write!(
                f,
                "Conflict in state {} on lookahead '{}' resolved",
                self.state_idx, self.lookahead
            )
        } else {
            write!(
                f,
                "Conflict in state {} on lookahead '{}' unresolved",
                self.state_idx, self.lookahead
            )
        }
    }
}
