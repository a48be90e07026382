//! Parser for the compact memory-trace text format.
//!
//! ```text
//! // process 1
//! x:=1 y:=1
//! x==1
//! ---
//! // process 2
//! y==1 x==?
//! ```
//!
//! The inverse direction is [`c3_core::history::display::format_history`].

pub mod parser;

pub use parser::{parse_history, ParseError};
