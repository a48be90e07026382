//! Lazy enumeration of refinements and linear extensions of a [`Poset`].
//!
//! Both enumerators are depth-first searches driven by an explicit stack of
//! frames, so they can be consumed one item at a time (and handed to
//! `rayon::iter::ParallelBridge`) without materializing the whole sequence.
//! Each frame owns its state; a branch never observes its siblings.
//!
//! # Refinements
//!
//! The incomparable pairs of the starting order are decided one by one, in
//! sorted order. For each undecided pair `(a, b)` there are three branches:
//!
//! 1. leave it incomparable -- the pair is recorded as *frozen*, and any
//!    deeper branch whose closure would relate it is dropped;
//! 2. add `a < b`;
//! 3. add `b < a`.
//!
//! A pair already related by the closure of earlier choices has only one
//! branch. Every leaf is a distinct partial order, every partial order above
//! the start is reached, and the first leaf is the start itself because
//! branch 1 is explored first.
//!
//! # Linear extensions
//!
//! The frontier is the set of minimal elements among those not yet placed.
//! Each step places one frontier element, smallest first.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use super::poset::Poset;

struct RefinementFrame<T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    next_pair: usize,
    order: Poset<T>,
    frozen: Vec<usize>,
}

/// Iterator over every refinement of a [`Poset`].
///
/// Created by [`Poset::refinements`].
pub struct Refinements<T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    pairs: Vec<(T, T)>,
    stack: Vec<RefinementFrame<T>>,
}

impl<T> Refinements<T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    pub(crate) fn new(start: Poset<T>) -> Self {
        Self {
            pairs: start.incomparable_pairs(),
            stack: Vec::from([RefinementFrame {
                next_pair: 0,
                order: start,
                frozen: Vec::new(),
            }]),
        }
    }

    fn respects_frozen(&self, order: &Poset<T>, frozen: &[usize]) -> bool {
        frozen.iter().all(|&i| {
            let (a, b) = &self.pairs[i];
            !order.comparable(a, b)
        })
    }
}

impl<T> Iterator for Refinements<T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    type Item = Poset<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let RefinementFrame {
                next_pair,
                order,
                frozen,
            } = frame;

            let Some((a, b)) = self.pairs.get(next_pair).cloned() else {
                return Some(order);
            };

            if order.comparable(&a, &b) {
                self.stack.push(RefinementFrame {
                    next_pair: next_pair + 1,
                    order,
                    frozen,
                });
                continue;
            }

            // pushed in reverse: the incomparable branch is explored first
            for (lo, hi) in [(b.clone(), a.clone()), (a, b)] {
                if let Some(extended) = order.with_order(lo, hi) {
                    if self.respects_frozen(&extended, &frozen) {
                        self.stack.push(RefinementFrame {
                            next_pair: next_pair + 1,
                            order: extended,
                            frozen: frozen.clone(),
                        });
                    }
                }
            }
            let mut frozen = frozen;
            frozen.push(next_pair);
            self.stack.push(RefinementFrame {
                next_pair: next_pair + 1,
                order,
                frozen,
            });
        }
        None
    }
}

struct ExtensionFrame<T> {
    placed: Vec<T>,
    remaining: BTreeSet<T>,
}

/// Iterator over every linear extension of a [`Poset`].
///
/// Created by [`Poset::all_topological_sorts`].
pub struct LinearExtensions<'a, T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    order: &'a Poset<T>,
    stack: Vec<ExtensionFrame<T>>,
}

impl<'a, T> LinearExtensions<'a, T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    pub(crate) fn new(order: &'a Poset<T>) -> Self {
        Self {
            order,
            stack: Vec::from([ExtensionFrame {
                placed: Vec::with_capacity(order.len()),
                remaining: order.elements().cloned().collect(),
            }]),
        }
    }
}

impl<T> Iterator for LinearExtensions<'_, T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ExtensionFrame { placed, remaining }) = self.stack.pop() {
            if remaining.is_empty() {
                return Some(placed);
            }

            let frontier: Vec<T> = self.order.minimal_in(&remaining).cloned().collect();
            // reversed so the smallest frontier element is popped first
            for vertex in frontier.into_iter().rev() {
                let mut placed = placed.clone();
                let mut remaining = remaining.clone();
                remaining.remove(&vertex);
                placed.push(vertex);
                self.stack.push(ExtensionFrame { placed, remaining });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn antichain(n: u32) -> Poset<u32> {
        Poset::new(0..n)
    }

    #[test]
    fn test_refinements_start_with_identity() {
        let mut poset = antichain(3);
        poset.order_try(0, 1);
        let first = poset.refinements().next();
        assert_eq!(first, Some(poset));
    }

    #[test]
    fn test_refinements_count_all_partial_orders() {
        // number of labeled partial orders on n elements: 1, 3, 19, 219
        assert_eq!(antichain(1).refinements().count(), 1);
        assert_eq!(antichain(2).refinements().count(), 3);
        assert_eq!(antichain(3).refinements().count(), 19);
        assert_eq!(antichain(4).refinements().count(), 219);
    }

    #[test]
    fn test_refinements_are_distinct_and_extend_start() {
        let mut poset = antichain(4);
        poset.order_try(0, 1);
        poset.order_try(2, 3);

        let all: Vec<Poset<u32>> = poset.refinements().collect();
        for (i, refinement) in all.iter().enumerate() {
            for (a, b) in poset.edges() {
                assert!(refinement.precedes(&a, &b));
            }
            for other in &all[i + 1..] {
                assert_ne!(refinement, other);
            }
        }
    }

    #[test]
    fn test_refinements_of_total_order() {
        let mut poset = antichain(3);
        poset.order_try(0, 1);
        poset.order_try(1, 2);
        assert_eq!(poset.refinements().collect::<Vec<_>>(), vec![poset]);
    }

    #[test]
    fn test_linear_extensions_of_antichain() {
        let sorts: Vec<Vec<u32>> = antichain(3).all_topological_sorts().collect();
        assert_eq!(
            sorts,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_linear_extensions_respect_order() {
        let mut poset = antichain(4);
        poset.order_try(0, 1);
        poset.order_try(2, 3);

        let sorts: Vec<Vec<u32>> = poset.all_topological_sorts().collect();
        // 4! / (2! * 2!) interleavings of two chains
        assert_eq!(sorts.len(), 6);
        for sort in &sorts {
            let pos = |x: u32| sort.iter().position(|&y| y == x).unwrap();
            assert!(pos(0) < pos(1));
            assert!(pos(2) < pos(3));
        }
    }

    #[test]
    fn test_linear_extensions_of_empty_order() {
        let sorts: Vec<Vec<u32>> = antichain(0).all_topological_sorts().collect();
        assert_eq!(sorts, vec![Vec::<u32>::new()]);
    }
}
