//! Verdicts and the evidence that backs a positive one.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::history::types::{Label, OpId};
use crate::history::History;

/// For each operation, the replayed log that justified it.
pub type Serializations<Method, Arg, Ret> = BTreeMap<OpId, Vec<Label<Method, Arg, Ret>>>;

/// Evidence for Causal Consistency or Causal Memory.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CausalWitness<Method, Arg, Ret> {
    /// The history ordered by the witness causal order.
    pub causal_history: History<Method, Arg, Ret>,
    /// Per operation, a linear extension of its causal past accepted by the
    /// oracle.
    pub serializations: Serializations<Method, Arg, Ret>,
}

/// Evidence for Causal Convergence.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvergenceWitness<Method, Arg, Ret> {
    /// The history ordered by the witness causal order.
    pub causal_history: History<Method, Arg, Ret>,
    /// The shared arbitration order, as full operations.
    pub arbitration: Vec<Label<Method, Arg, Ret>>,
    /// Per operation, its causal past in arbitration order.
    pub serializations: Serializations<Method, Arg, Ret>,
}

/// Outcome of [`check_cc`](super::check_cc).
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcResult<Method, Arg, Ret> {
    pub witness: Option<CausalWitness<Method, Arg, Ret>>,
}

impl<Method, Arg, Ret> CcResult<Method, Arg, Ret> {
    #[must_use]
    pub const fn is_cc(&self) -> bool {
        self.witness.is_some()
    }

    #[must_use]
    pub fn into_witness(self) -> Option<CausalWitness<Method, Arg, Ret>> {
        self.witness
    }
}

/// Outcome of [`check_cm`](super::check_cm).
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmResult<Method, Arg, Ret> {
    pub witness: Option<CausalWitness<Method, Arg, Ret>>,
}

impl<Method, Arg, Ret> CmResult<Method, Arg, Ret> {
    #[must_use]
    pub const fn is_cm(&self) -> bool {
        self.witness.is_some()
    }

    #[must_use]
    pub fn into_witness(self) -> Option<CausalWitness<Method, Arg, Ret>> {
        self.witness
    }
}

/// Outcome of [`check_ccv`](super::check_ccv).
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcvResult<Method, Arg, Ret> {
    pub witness: Option<ConvergenceWitness<Method, Arg, Ret>>,
}

impl<Method, Arg, Ret> CcvResult<Method, Arg, Ret> {
    #[must_use]
    pub const fn is_ccv(&self) -> bool {
        self.witness.is_some()
    }

    #[must_use]
    pub fn into_witness(self) -> Option<ConvergenceWitness<Method, Arg, Ret>> {
        self.witness
    }
}

/// Evidence returned by [`check`](super::check).
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Witness<Method, Arg, Ret> {
    /// Returned for Causal Consistency and Causal Memory.
    Causal(CausalWitness<Method, Arg, Ret>),
    /// Returned for Causal Convergence.
    Convergent(ConvergenceWitness<Method, Arg, Ret>),
}
