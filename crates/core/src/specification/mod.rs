//! Reference semantics of the data type under test.
//!
//! A [`Specification`] is a deterministic state machine: [`start`] gives the
//! initial state, and [`step`] applies one request and reports the operation
//! the data type *should* have produced. [`satisfies`] replays a candidate
//! serialization through it; every checker in
//! [`consistency`](crate::consistency) is a search for logs on which
//! `satisfies` holds.
//!
//! [`start`]: Specification::start
//! [`step`]: Specification::step
//! [`satisfies`]: Specification::satisfies

use core::fmt::Debug;

use crate::history::types::Label;

pub mod memory;

pub use memory::{MemoryArg, MemoryMethod, MemoryValue, RwMemory};

/// The label type a specification replays.
pub type SpecLabel<S> = Label<
    <S as Specification>::Method,
    <S as Specification>::Arg,
    <S as Specification>::Ret,
>;

/// A deterministic, side-effect-free model of a data type.
pub trait Specification {
    type Method: Clone + Debug;
    type Arg: Clone + Debug;
    type Ret: Clone + Debug + PartialEq;
    type State;

    /// The initial state.
    fn start(&self) -> Self::State;

    /// Applies `instr` to `state`.
    ///
    /// Returns the successor state and the operation the reference semantics
    /// produce for `instr`'s method and argument. Any outcome carried by
    /// `instr` is ignored.
    ///
    /// # Panics
    ///
    /// Implementations panic on requests they do not recognize; that is a
    /// defect in the trace or in the choice of oracle, not a verdict.
    fn step(&self, state: &Self::State, instr: &SpecLabel<Self>) -> (Self::State, SpecLabel<Self>);

    /// Replays `log` from the initial state.
    ///
    /// Returns `false` as soon as an operation's recorded outcome differs
    /// from the one the reference semantics produce. Instructions only
    /// advance the state.
    fn satisfies(&self, log: &[SpecLabel<Self>]) -> bool {
        let mut state = self.start();
        for instr in log {
            let (next, op) = self.step(&state, instr);
            if let Some(recorded) = instr.ret() {
                if op.ret() != Some(recorded) {
                    return false;
                }
            }
            state = next;
        }
        true
    }
}
