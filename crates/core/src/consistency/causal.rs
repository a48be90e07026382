//! Causal Consistency and Causal Memory checkers.
//!
//! Both checkers search for a *causal order*: a refinement `co` of program
//! order such that every operation, looking only at its causal past under
//! `co`, has some linear extension of that past which the oracle accepts.
//! Different operations may pick different, mutually inconsistent
//! extensions.
//!
//! # Algorithm
//!
//! ```text
//! for co in refinements(program order):
//!     for op in co:
//!         view = causal_hist(op) under co, outcomes hidden outside ret_set(op)
//!         if no linear extension of view satisfies the oracle:
//!             reject co
//!     accept co with one satisfying log per op
//! ```
//!
//! The two models differ only in `ret_set(op)`:
//!
//! - **Causal Consistency** reveals the outcome of `op` alone.
//! - **Causal Memory** reveals the outcomes of `op`'s *program-order* past.
//!   The revealed set comes from the original order, while the view it is
//!   applied to comes from `co`.
//!
//! The first satisfying extension wins; witnesses are not minimal or
//! canonical, but the sequential search is deterministic.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use super::witness::{CausalWitness, CcResult, CmResult, Serializations};
use crate::history::types::OpId;
use crate::history::History;
use crate::order::Poset;
use crate::specification::{SpecLabel, Specification};

/// Which outcomes an operation's causal view reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visibility {
    /// Only the focused operation's own outcome.
    Own,
    /// Outcomes of the focused operation's program-order past.
    ProgramOrderPast,
}

/// Justifies every operation of `history` under the candidate order `co`.
///
/// Returns one accepted log per operation, or `None` as soon as some
/// operation has no satisfying linear extension of its causal past.
pub(crate) fn justify_causal<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    co: &Poset<OpId>,
    spec: &S,
    visibility: Visibility,
) -> Option<Serializations<S::Method, S::Arg, S::Ret>> {
    let mut serializations = BTreeMap::new();
    for op_id in co.elements() {
        let ret_set = match visibility {
            Visibility::Own => BTreeSet::from([op_id.clone()]),
            Visibility::ProgramOrderPast => history.poset().predecessors(op_id),
        };
        let past = history.causal_hist_under(co, op_id, &ret_set);
        tracing::trace!(%op_id, past = past.len(), "focus");

        let accepted = past
            .poset()
            .all_topological_sorts()
            .map(|ro| {
                ro.iter()
                    .map(|id| past.labels()[id].clone())
                    .collect::<Vec<SpecLabel<S>>>()
            })
            .find(|log| {
                let satisfied = spec.satisfies(log);
                tracing::trace!(?log, satisfied, "replayed");
                satisfied
            });

        let Some(log) = accepted else {
            tracing::debug!(%op_id, "no satisfying serialization");
            return None;
        };
        serializations.insert(op_id.clone(), log);
    }
    Some(serializations)
}

fn search<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
    visibility: Visibility,
) -> Option<CausalWitness<S::Method, S::Arg, S::Ret>> {
    history
        .poset()
        .refinements()
        .enumerate()
        .find_map(|(i, co)| {
            tracing::debug!(candidate = i, %co, "checking causal order");
            let serializations = justify_causal(history, &co, spec, visibility)?;
            tracing::debug!(candidate = i, "causal order accepted");
            Some(CausalWitness {
                causal_history: history.reordered(co),
                serializations,
            })
        })
}

/// Checks whether `history` is causally consistent with respect to `spec`.
///
/// Succeeds iff some refinement of program order lets every operation's
/// outcome be explained by some serialization of its own causal past.
pub fn check_cc<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
) -> CcResult<S::Method, S::Arg, S::Ret> {
    let _span = tracing::debug_span!("check_cc", operations = history.len()).entered();
    CcResult {
        witness: search(history, spec, Visibility::Own),
    }
}

/// Checks whether `history` satisfies Causal Memory with respect to `spec`.
///
/// Like [`check_cc`], but each serialization must also reproduce the
/// recorded outcomes of the operation's program-order predecessors.
pub fn check_cm<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
) -> CmResult<S::Method, S::Arg, S::Ret> {
    let _span = tracing::debug_span!("check_cm", operations = history.len()).entered();
    CmResult {
        witness: search(history, spec, Visibility::ProgramOrderPast),
    }
}
