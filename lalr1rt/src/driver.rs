//! The shift/reduce interpreter, grounded in the originating system's
//! `lalr1::Parser::parse_text` loop but narrowed to `spec.md` §4.7's exact
//! contract: no lexical analysis, no semantic-action attributes, and no
//! error recovery — a state stack of `u32`s, a single lookahead terminal
//! pulled from a caller-supplied [`TokenStream`], and four table-entry
//! kinds to dispatch on.

use lalr1gen::{NameTable, ParseTable, ParseTableEntry, RhsLengthTable, RrTable, EOF_TERM, ROOT_NTERM};

use crate::error::DriverError;
use crate::token_stream::TokenStream;

/// A shift/reduce parser bound to one generated table. Borrows everything
/// [`lalr1gen::generate`] produced, per `spec.md` §5: the driver owns none
/// of the table data, only the stack it pushes and pops while parsing.
pub struct Parser<'t> {
    table: &'t ParseTable,
    rr_table: &'t RrTable,
    names: &'t NameTable,
    rhs_length: &'t RhsLengthTable,
}

impl<'t> Parser<'t> {
    pub fn new(
        table: &'t ParseTable,
        rr_table: &'t RrTable,
        names: &'t NameTable,
        rhs_length: &'t RhsLengthTable,
    ) -> Self {
        Parser { table, rr_table, names, rhs_length }
    }

    /// Drives `tokens` to either acceptance or the first failure. There is
    /// no error recovery (`spec.md` Non-goals): the first `syntax_error`,
    /// `rr_conflict_unresolved`, or `internal_parser_error` halts the parse.
    pub fn parse(&self, tokens: &mut dyn TokenStream) -> Result<(), DriverError> {
        let mut stack: Vec<u32> = vec![0];
        let mut lookahead = tokens.next().unwrap_or(EOF_TERM);

        loop {
            let top = *stack.last().ok_or(DriverError::InternalParserError)? as usize;
            let entry = self.table.term_entry(top, lookahead);
            tracing::trace!(state = top, lookahead, ?entry, "dispatch");

            match entry {
                ParseTableEntry::Shift(next_state) => {
                    stack.push(next_state);
                    lookahead = tokens.next().unwrap_or(EOF_TERM);
                }
                ParseTableEntry::Reduce { nterm_idx, rside_idx } => {
                    let (nterm_idx, rside_idx) = (nterm_idx as usize, rside_idx as usize);
                    let pop_count = self.rhs_length.length(nterm_idx, rside_idx) as usize;
                    if stack.len() <= pop_count {
                        return Err(DriverError::InternalParserError);
                    }
                    stack.truncate(stack.len() - pop_count);
                    tracing::debug!(nterm_idx, rside_idx, pop_count, "reduce");

                    if nterm_idx == ROOT_NTERM {
                        if lookahead == EOF_TERM {
                            tracing::info!("parse accepted");
                            return Ok(());
                        }
                        return Err(self.syntax_error(lookahead));
                    }

                    let new_top = *stack.last().ok_or(DriverError::InternalParserError)? as usize;
                    match self.table.nterm_entry(new_top, nterm_idx) {
                        ParseTableEntry::Shift(goto_state) => stack.push(goto_state),
                        _ => return Err(DriverError::InternalParserError),
                    }
                }
                ParseTableEntry::RrConflict { .. } => {
                    tracing::warn!(state = top, lookahead, "unresolved reduce-reduce conflict reached at parse time");
                    return Err(DriverError::RrConflictUnresolved {
                        state: top,
                        lookahead: self.names.term_name(lookahead).to_string(),
                    });
                }
                ParseTableEntry::Error => return Err(self.syntax_error(lookahead)),
            }
        }
    }

    fn syntax_error(&self, lookahead: usize) -> DriverError {
        DriverError::SyntaxError(self.names.term_name(lookahead).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lalr1gen::{Associativity, Ruleset, SymbolCollection};

    struct VecTokenStream {
        tokens: std::vec::IntoIter<usize>,
    }

    impl VecTokenStream {
        fn new(tokens: Vec<usize>) -> Self {
            VecTokenStream { tokens: tokens.into_iter() }
        }
    }

    impl TokenStream for VecTokenStream {
        fn next(&mut self) -> Option<usize> {
            Iterator::next(&mut self.tokens)
        }
    }

    /// `S -> a B`, `B -> c`, grounded in `spec.md` §8 scenario 1.
    fn build_a_b_grammar() -> (lalr1gen::GeneratedTables, NameTable, usize, usize) {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("S").unwrap();
        sc.add_non_terminal("B").unwrap();
        let a = sc.add_terminal("a", None, Associativity::Left).unwrap().index;
        let c = sc.add_terminal("c", None, Associativity::Left).unwrap().index;
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.add_rule("S", &["a", "B"], None).unwrap();
        rs.add_rule("B", &["c"], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();

        let (tables, name_table, conflicts) = lalr1gen::generate(&symbols, &rs).unwrap();
        assert!(conflicts.is_empty());
        (tables, name_table, a, c)
    }

    #[test]
    fn accepts_a_c() {
        let (tables, names, a, c) = build_a_b_grammar();
        assert_eq!(tables.parse_table.state_count(), 5);
        let parser = Parser::new(&tables.parse_table, &tables.rr_table, &names, &tables.rhs_length);
        let mut tokens = VecTokenStream::new(vec![a, c]);
        assert!(parser.parse(&mut tokens).is_ok());
    }

    #[test]
    fn trailing_extra_token_is_a_syntax_error() {
        let (tables, names, a, c) = build_a_b_grammar();
        let parser = Parser::new(&tables.parse_table, &tables.rr_table, &names, &tables.rhs_length);
        let mut tokens = VecTokenStream::new(vec![a, c, c]);
        let err = parser.parse(&mut tokens).unwrap_err();
        assert_eq!(err, DriverError::SyntaxError("c".to_string()));
    }

    #[test]
    fn truncated_input_reports_eof() {
        let (tables, names, a, _c) = build_a_b_grammar();
        let parser = Parser::new(&tables.parse_table, &tables.rr_table, &names, &tables.rhs_length);
        let mut tokens = VecTokenStream::new(vec![a]);
        let err = parser.parse(&mut tokens).unwrap_err();
        assert_eq!(err, DriverError::SyntaxError("$eof".to_string()));
    }

    /// `S -> A`, `S -> B`, `A -> a`, `B -> a`, grounded in `spec.md` §8
    /// scenario 2: the rr-conflict is resolved at generation time (the
    /// first declared reduction wins), so the driver itself never actually
    /// observes an `RrConflict` entry for this particular grammar — that
    /// path is exercised directly in `lalr1gen`, see `table_gen`'s tests.
    #[test]
    fn classic_rr_conflict_grammar_still_parses_to_one_reduction() {
        let mut sc = SymbolCollection::new();
        sc.add_non_terminal("S").unwrap();
        sc.add_non_terminal("A").unwrap();
        sc.add_non_terminal("B").unwrap();
        let a = sc.add_terminal("a", None, Associativity::Left).unwrap().index;
        let (symbols, _w) = sc.seal().unwrap();

        let mut rs = Ruleset::new(&symbols);
        rs.add_rule("S", &["A"], None).unwrap();
        rs.add_rule("S", &["B"], None).unwrap();
        rs.add_rule("A", &["a"], None).unwrap();
        rs.add_rule("B", &["a"], None).unwrap();
        let (rs, _w) = rs.seal().unwrap();

        let (tables, names, conflicts) = lalr1gen::generate(&symbols, &rs).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert!(!conflicts[0].resolved);

        let parser = Parser::new(&tables.parse_table, &tables.rr_table, &names, &tables.rhs_length);
        let mut tokens = VecTokenStream::new(vec![a]);
        let err = parser.parse(&mut tokens).unwrap_err();
        assert!(matches!(err, DriverError::RrConflictUnresolved { .. }));
    }
}
