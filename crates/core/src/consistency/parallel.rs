//! Parallel variants of the checkers, backed by rayon.
//!
//! Candidate causal orders are streamed from the sequential enumerator into
//! rayon's pool with `par_bridge`; for Causal Convergence the arbitrations of
//! each candidate are bridged the same way. `find_map_any` stops handing out
//! work as soon as one worker succeeds.
//!
//! Verdicts are the same as the sequential checkers'. Which witness is
//! returned depends on scheduling.

use rayon::iter::{ParallelBridge, ParallelIterator};

use super::causal::{justify_causal, Visibility};
use super::convergence::{convergence_witness, justify_arbitration};
use super::witness::{CausalWitness, CcResult, CcvResult, CmResult};
use crate::history::History;
use crate::specification::Specification;

fn par_search<S>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
    visibility: Visibility,
) -> Option<CausalWitness<S::Method, S::Arg, S::Ret>>
where
    S: Specification + Sync,
    S::Method: Send + Sync,
    S::Arg: Send + Sync,
    S::Ret: Send + Sync,
{
    history
        .poset()
        .refinements()
        .par_bridge()
        .find_map_any(|co| {
            let serializations = justify_causal(history, &co, spec, visibility)?;
            Some(CausalWitness {
                causal_history: history.reordered(co),
                serializations,
            })
        })
}

/// Parallel [`check_cc`](super::check_cc).
pub fn par_check_cc<S>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
) -> CcResult<S::Method, S::Arg, S::Ret>
where
    S: Specification + Sync,
    S::Method: Send + Sync,
    S::Arg: Send + Sync,
    S::Ret: Send + Sync,
{
    let _span = tracing::debug_span!("par_check_cc", operations = history.len()).entered();
    CcResult {
        witness: par_search(history, spec, Visibility::Own),
    }
}

/// Parallel [`check_cm`](super::check_cm).
pub fn par_check_cm<S>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
) -> CmResult<S::Method, S::Arg, S::Ret>
where
    S: Specification + Sync,
    S::Method: Send + Sync,
    S::Arg: Send + Sync,
    S::Ret: Send + Sync,
{
    let _span = tracing::debug_span!("par_check_cm", operations = history.len()).entered();
    CmResult {
        witness: par_search(history, spec, Visibility::ProgramOrderPast),
    }
}

/// Parallel [`check_ccv`](super::check_ccv).
pub fn par_check_ccv<S>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
) -> CcvResult<S::Method, S::Arg, S::Ret>
where
    S: Specification + Sync,
    S::Method: Send + Sync,
    S::Arg: Send + Sync,
    S::Ret: Send + Sync,
{
    let _span = tracing::debug_span!("par_check_ccv", operations = history.len()).entered();
    let witness = history
        .poset()
        .refinements()
        .par_bridge()
        .find_map_any(|co| {
            let (arb, serializations) = co
                .all_topological_sorts()
                .par_bridge()
                .find_map_any(|arb| {
                    let serializations = justify_arbitration(history, &co, &arb, spec)?;
                    Some((arb, serializations))
                })?;
            Some(convergence_witness(history, co, &arb, serializations))
        });
    CcvResult { witness }
}
