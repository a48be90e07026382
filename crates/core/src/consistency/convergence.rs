//! Causal Convergence checker.
//!
//! Causal Convergence asks for a causal order `co` *and* one arbitration
//! order `arb` (a linear extension of `co`) shared by all operations: each
//! operation's outcome must be reproduced by replaying its causal past under
//! `co`, laid out in `arb` order.
//!
//! ```text
//! for co in refinements(program order):
//!     for arb in linear extensions(co):
//!         if every op satisfies causal_arb(op, arb) under co:
//!             accept (co, arb)
//! ```

use alloc::vec::Vec;

use super::witness::{CcvResult, ConvergenceWitness, Serializations};
use crate::history::types::OpId;
use crate::history::History;
use crate::order::Poset;
use crate::specification::Specification;

/// Justifies every operation under the causal order `co` and arbitration
/// `arb`, or returns `None` at the first operation the oracle rejects.
pub(crate) fn justify_arbitration<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    co: &Poset<OpId>,
    arb: &[OpId],
    spec: &S,
) -> Option<Serializations<S::Method, S::Arg, S::Ret>> {
    co.elements()
        .map(|op_id| {
            let log = history.causal_arb_under(co, op_id, arb);
            let satisfied = spec.satisfies(&log);
            tracing::trace!(%op_id, ?log, satisfied, "replayed");
            satisfied.then(|| (op_id.clone(), log))
        })
        .collect()
}

/// Finds an arbitration of `co` under which every operation is justified.
pub(crate) fn justify_convergent<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    co: &Poset<OpId>,
    spec: &S,
) -> Option<(Vec<OpId>, Serializations<S::Method, S::Arg, S::Ret>)> {
    co.all_topological_sorts()
        .enumerate()
        .find_map(|(j, arb)| {
            tracing::trace!(arbitration = j, ?arb, "checking arbitration");
            let serializations = justify_arbitration(history, co, &arb, spec)?;
            Some((arb, serializations))
        })
}

/// Lifts the arbitration ids to the full recorded operations.
pub(crate) fn convergence_witness<Method, Arg, Ret>(
    history: &History<Method, Arg, Ret>,
    co: Poset<OpId>,
    arb: &[OpId],
    serializations: Serializations<Method, Arg, Ret>,
) -> ConvergenceWitness<Method, Arg, Ret>
where
    Method: Clone,
    Arg: Clone,
    Ret: Clone,
{
    ConvergenceWitness {
        arbitration: arb.iter().map(|id| history.labels()[id].clone()).collect(),
        causal_history: history.reordered(co),
        serializations,
    }
}

/// Checks whether `history` satisfies Causal Convergence with respect to
/// `spec`.
///
/// Succeeds iff some refinement of program order has a linear extension
/// under which every operation's outcome is reproduced by its causal past
/// replayed in that single shared order.
pub fn check_ccv<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
) -> CcvResult<S::Method, S::Arg, S::Ret> {
    let _span = tracing::debug_span!("check_ccv", operations = history.len()).entered();
    let witness = history
        .poset()
        .refinements()
        .enumerate()
        .find_map(|(i, co)| {
            tracing::debug!(candidate = i, %co, "checking causal order");
            let (arb, serializations) = justify_convergent(history, &co, spec)?;
            tracing::debug!(candidate = i, "causal order and arbitration accepted");
            Some(convergence_witness(history, co, &arb, serializations))
        });
    CcvResult { witness }
}
