use core::fmt::{self, Display, Formatter};

use self::error::Error;
use crate::history::History;
use crate::specification::Specification;

pub mod causal;
pub mod convergence;
pub mod error;
#[cfg(feature = "rayon")]
pub mod parallel;
pub mod witness;

pub use causal::{check_cc, check_cm};
pub use convergence::check_ccv;
#[cfg(feature = "rayon")]
pub use parallel::{par_check_cc, par_check_cm, par_check_ccv};
pub use witness::{
    CausalWitness, CcResult, CcvResult, CmResult, ConvergenceWitness, Serializations, Witness,
};

/// Consistency models supported by c3.
///
/// Causal Memory implies Causal Consistency. Causal Convergence implies
/// Causal Consistency but is incomparable with Causal Memory.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Causal Consistency: each operation is explained by some serialization
    /// of its causal past.
    CausalConsistency,
    /// Causal Memory: as above, and the serialization also explains the
    /// outcomes of the operation's program-order past.
    CausalMemory,
    /// Causal Convergence: one arbitration order explains every operation.
    CausalConvergence,
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::CausalConsistency => write!(f, "causal consistency"),
            Self::CausalMemory => write!(f, "causal memory"),
            Self::CausalConvergence => write!(f, "causal convergence"),
        }
    }
}

/// Check whether `history` satisfies `model` with respect to `spec`.
///
/// On success, returns the [`Witness`]: [`Witness::Causal`] for Causal
/// Consistency and Causal Memory, [`Witness::Convergent`] for Causal
/// Convergence. An empty history is trivially consistent.
///
/// # Errors
///
/// Returns [`Error::Invalid`] if no candidate causal order (and, for Causal
/// Convergence, no arbitration) justifies every operation.
pub fn check<S: Specification>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
    model: Model,
) -> Result<Witness<S::Method, S::Arg, S::Ret>, Error> {
    tracing::debug!(operations = history.len(), ?model, "checking consistency");

    let witness = match model {
        Model::CausalConsistency => check_cc(history, spec).witness.map(Witness::Causal),
        Model::CausalMemory => check_cm(history, spec).witness.map(Witness::Causal),
        Model::CausalConvergence => check_ccv(history, spec).witness.map(Witness::Convergent),
    };
    witness.ok_or(Error::Invalid(model))
}

/// Parallel [`check`], dispatching to the [`parallel`] checkers.
///
/// # Errors
///
/// Returns [`Error::Invalid`] exactly when [`check`] does.
#[cfg(feature = "rayon")]
pub fn par_check<S>(
    history: &History<S::Method, S::Arg, S::Ret>,
    spec: &S,
    model: Model,
) -> Result<Witness<S::Method, S::Arg, S::Ret>, Error>
where
    S: Specification + Sync,
    S::Method: Send + Sync,
    S::Arg: Send + Sync,
    S::Ret: Send + Sync,
{
    tracing::debug!(operations = history.len(), ?model, "checking consistency in parallel");

    let witness = match model {
        Model::CausalConsistency => par_check_cc(history, spec).witness.map(Witness::Causal),
        Model::CausalMemory => par_check_cm(history, spec).witness.map(Witness::Causal),
        Model::CausalConvergence => par_check_ccv(history, spec).witness.map(Witness::Convergent),
    };
    witness.ok_or(Error::Invalid(model))
}
