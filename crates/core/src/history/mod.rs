//! Recorded histories and the causal views derived from them.
//!
//! A [`History`] is built from per-process operation sequences. Each
//! operation gets an [`OpId`] `"{process}.{index}"` and the order starts out
//! as program order: the chain of each process's operations, nothing else.
//!
//! The checkers never mutate a `History`. They pair it with a candidate order
//! and ask for restricted views:
//!
//! - [`History::causal_hist`] -- the causal past of one operation as a new
//!   `History`, with outcomes hidden except for a chosen set;
//! - [`History::causal_arb`] -- the causal past of one operation laid out in
//!   a given total order, with only that operation's outcome visible.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Display;

use crate::order::Poset;

pub mod display;
#[cfg(feature = "serde")]
pub mod trace;
pub mod types;

use self::types::{Label, OpId};

/// A labeled partial order of operations.
///
/// Invariant: `operations`, the keys of `label` and the elements of `poset`
/// are the same set.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<Method, Arg, Ret> {
    operations: BTreeSet<OpId>,
    label: BTreeMap<OpId, Label<Method, Arg, Ret>>,
    poset: Poset<OpId>,
}

impl<Method, Arg, Ret> History<Method, Arg, Ret> {
    /// Builds a history from `(process, operations)` pairs, seeding the order
    /// with program order.
    ///
    /// # Panics
    ///
    /// Panics if an entry is an instruction (its outcome is unknown) or if a
    /// process name appears twice. Both indicate a malformed trace.
    pub fn new<P, I>(processes: I) -> Self
    where
        P: Display,
        I: IntoIterator<Item = (P, Vec<Label<Method, Arg, Ret>>)>,
    {
        let mut label = BTreeMap::new();
        let mut chains = Vec::new();

        for (process, ops) in processes {
            let process = process.to_string();
            let ids: Vec<OpId> = (1..=ops.len())
                .map(|index| OpId::new(process.clone(), index))
                .collect();
            for (id, op) in ids.iter().zip(ops) {
                assert!(
                    op.is_operation(),
                    "trace entry {id} has no recorded outcome"
                );
                let previous = label.insert(id.clone(), op.with_op_id(id.clone()));
                assert!(previous.is_none(), "process {process} appears twice");
            }
            chains.push(ids);
        }

        let operations: BTreeSet<OpId> = label.keys().cloned().collect();
        let mut poset = Poset::new(operations.iter().cloned());
        for chain in chains {
            for pair in chain.windows(2) {
                let ordered = poset.order_try(pair[0].clone(), pair[1].clone());
                debug_assert!(ordered, "program order must be acyclic");
            }
        }

        tracing::debug!(
            operations = operations.len(),
            edges = poset.edges().len(),
            "built history"
        );

        Self {
            operations,
            label,
            poset,
        }
    }

    /// Builds a history from unnamed sessions, naming processes `1`, `2`, ...
    pub fn from_sessions<I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = Vec<Label<Method, Arg, Ret>>>,
    {
        Self::new((1..).zip(sessions))
    }

    pub const fn operations(&self) -> &BTreeSet<OpId> {
        &self.operations
    }

    pub const fn labels(&self) -> &BTreeMap<OpId, Label<Method, Arg, Ret>> {
        &self.label
    }

    pub fn label(&self, op_id: &OpId) -> Option<&Label<Method, Arg, Ret>> {
        self.label.get(op_id)
    }

    /// The working order: program order, or a refinement of it.
    pub const fn poset(&self) -> &Poset<OpId> {
        &self.poset
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<Method, Arg, Ret> History<Method, Arg, Ret>
where
    Method: Clone,
    Arg: Clone,
    Ret: Clone,
{
    /// The same operations ordered by `order` instead of the working order.
    ///
    /// # Panics
    ///
    /// Panics if `order` is over a different set of operations.
    #[must_use]
    pub fn reordered(&self, order: Poset<OpId>) -> Self {
        assert!(
            order.elements().eq(self.operations.iter()),
            "order must range over the history's operations"
        );
        Self {
            operations: self.operations.clone(),
            label: self.label.clone(),
            poset: order,
        }
    }

    /// The causal past of `op_id` (inclusive) under the working order.
    ///
    /// Labels outside `ret_set` are projected to instructions; labels in
    /// `ret_set` keep their outcome. The receiver is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `op_id` is not an operation of this history.
    #[must_use]
    pub fn causal_hist(&self, op_id: &OpId, ret_set: &BTreeSet<OpId>) -> Self {
        self.causal_hist_under(&self.poset, op_id, ret_set)
    }

    /// [`causal_hist`](Self::causal_hist) with `order` as the working order.
    pub(crate) fn causal_hist_under(
        &self,
        order: &Poset<OpId>,
        op_id: &OpId,
        ret_set: &BTreeSet<OpId>,
    ) -> Self {
        let past = order.predecessors(op_id);
        let label = past
            .iter()
            .map(|id| {
                let op = &self.label[id];
                let shown = if ret_set.contains(id) {
                    op.clone()
                } else {
                    op.to_instruction()
                };
                (id.clone(), shown)
            })
            .collect();
        Self {
            poset: order.subset(&past),
            operations: past,
            label,
        }
    }

    /// The causal past of `op_id` (inclusive), laid out in the order of `arb`.
    ///
    /// `arb` is a total order over a superset of the operations. Entries
    /// before `op_id` are instructions; the last entry is `op_id`'s full
    /// operation.
    ///
    /// # Panics
    ///
    /// Panics if `op_id` is not an operation of this history or does not
    /// occur in `arb`.
    #[must_use]
    pub fn causal_arb(&self, op_id: &OpId, arb: &[OpId]) -> Vec<Label<Method, Arg, Ret>> {
        self.causal_arb_under(&self.poset, op_id, arb)
    }

    /// [`causal_arb`](Self::causal_arb) with `order` as the working order.
    pub(crate) fn causal_arb_under(
        &self,
        order: &Poset<OpId>,
        op_id: &OpId,
        arb: &[OpId],
    ) -> Vec<Label<Method, Arg, Ret>> {
        let past = order.predecessors(op_id);
        let mut log: Vec<Label<Method, Arg, Ret>> = Vec::with_capacity(past.len());
        for id in arb.iter().filter(|id| past.contains(*id)) {
            if id == op_id {
                log.push(self.label[id].clone());
                return log;
            }
            log.push(self.label[id].to_instruction());
        }
        panic!("{op_id} does not occur in the arbitration order");
    }
}

impl<Method, Arg, Ret> History<Method, Arg, Ret>
where
    Method: Display,
    Arg: Display,
    Ret: Display,
{
    /// Renders the working order; nodes carry `"method(arg)▷ret"` labels when
    /// `include_label` is set and bare operation ids otherwise.
    #[must_use]
    pub fn visualize(&self, include_label: bool) -> petgraph::graph::DiGraph<String, ()> {
        if include_label {
            let labels: BTreeMap<OpId, String> = self
                .label
                .iter()
                .map(|(id, op)| (id.clone(), op.to_string()))
                .collect();
            self.poset.visualize(Some(&labels))
        } else {
            self.poset.visualize(None)
        }
    }
}
