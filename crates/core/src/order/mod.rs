//! Partial orders over operation identifiers.
//!
//! [`Poset`] is the order engine the checkers search over: it builds program
//! order, answers predecessor queries, induces sub-orders, and lazily
//! enumerates refinements and linear extensions.

pub mod digraph;
pub mod enumerate;
pub mod poset;

pub use enumerate::{LinearExtensions, Refinements};
pub use poset::Poset;
