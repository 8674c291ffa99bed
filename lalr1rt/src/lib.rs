//! The runtime half of the pipeline: a stack-based shift/reduce interpreter
//! that drives a [`lalr1gen`]-generated parse table against a caller-supplied
//! stream of terminal indices.
//!
//! ```ignore
//! let (tables, names, _conflicts) = lalr1gen::generate(&symbols, &rules)?;
//! let parser = Parser::new(&tables.parse_table, &tables.rr_table, &names, &tables.rhs_length);
//! parser.parse(&mut my_token_stream)?;
//! ```
//!
//! This crate has no opinion on lexical analysis, error recovery, or
//! semantic actions (`spec.md` Non-goals) — it consumes terminal indices and
//! reports success or the single failure that halted the parse.

mod driver;
mod error;
mod token_stream;

pub use driver::Parser;
pub use error::DriverError;
pub use token_stream::TokenStream;
