//! Causal consistency checking for recorded histories.
//!
//! `c3_core` decides whether a recorded execution history of a replicated
//! store satisfies a causal consistency model, judged against a reference
//! semantics (an *oracle*) of the data type under test. It supports three
//! models:
//!
//! 1. **Causal Consistency (CC)** -- each operation's outcome is explained by
//!    some serialization of its causal past.
//! 2. **Causal Memory (CM)** -- as CC, and the serialization must also agree
//!    with the outcomes of the operation's program-order past.
//! 3. **Causal Convergence (CCv)** -- one arbitration order, shared by all
//!    operations, explains every outcome.
//!
//! All three are exhaustive searches: they enumerate refinements of program
//! order (candidate causal orders), and for each one enumerate linear
//! extensions, replaying them through the oracle. The search is exponential;
//! it is a reference decision procedure for small histories.
//!
//! # Entry points
//!
//! [`check_cc`], [`check_cm`] and [`check_ccv`] return result records that
//! carry a witness on success. [`check()`] dispatches on a [`Model`] and
//! returns either a [`Witness`](consistency::Witness) or an
//! [`Error`](consistency::error::Error).
//!
//! ```rust,ignore
//! use c3_core::history::History;
//! use c3_core::specification::RwMemory;
//! use c3_core::{check, Model};
//!
//! let history = History::new(trace);
//! match check(&history, &RwMemory::<String, u64>::new(), Model::CausalMemory) {
//!     Ok(witness) => println!("consistent: {witness:?}"),
//!     Err(err) => println!("violation: {err}"),
//! }
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- `Serialize` on histories, orders and result records;
//!   `Deserialize` on the trace input format ([`history::trace`]).
//! - **`schemars`** -- JSON schema for the trace input format.
//! - **`rayon`** -- parallel checkers in [`consistency::parallel`].

extern crate alloc;

pub mod consistency;
pub mod history;
pub mod order;
pub mod specification;

pub use consistency::{check, check_cc, check_ccv, check_cm, Model};
