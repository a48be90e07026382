use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Debug, Display};
use core::hash::Hash;

use super::digraph::DiGraph;
use super::enumerate::{LinearExtensions, Refinements};

/// A strict partial order over a finite set of elements.
///
/// The relation is stored transitively closed, so every query is a lookup.
/// Elements are kept in a `BTreeSet`; every iteration (elements, sorts,
/// refinements, rendering) follows their `Ord` order and is deterministic.
///
/// With the `serde` feature, a poset serializes as its sorted elements and
/// its sorted covering pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poset<T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    elements: BTreeSet<T>,
    relation: DiGraph<T>,
}

impl<T> Poset<T>
where
    T: Hash + Eq + Ord + Clone + Debug,
{
    /// Creates the discrete order (an antichain) over `elements`.
    pub fn new<I: IntoIterator<Item = T>>(elements: I) -> Self {
        let elements: BTreeSet<T> = elements.into_iter().collect();
        let mut relation = DiGraph::default();
        for element in &elements {
            relation.add_vertex(element.clone());
        }
        Self { elements, relation }
    }

    /// Tries to add `a < b`, closing the relation transitively.
    ///
    /// Fails, leaving the order untouched, if `a == b`, if `b < a` already
    /// holds, or if either element is unknown. Returns whether `a < b` holds
    /// after the call.
    pub fn order_try(&mut self, a: T, b: T) -> bool {
        if a == b
            || !self.elements.contains(&a)
            || !self.elements.contains(&b)
            || self.relation.has_edge(&b, &a)
        {
            return false;
        }
        self.relation.incremental_closure([(a, b)]);
        true
    }

    /// Returns a copy of this order extended with `a < b`, if that is
    /// consistent.
    #[must_use]
    pub fn with_order(&self, a: T, b: T) -> Option<Self> {
        let mut extended = self.clone();
        extended.order_try(a, b).then_some(extended)
    }

    /// Returns `true` if `a` strictly precedes `b`.
    pub fn precedes(&self, a: &T, b: &T) -> bool {
        self.relation.has_edge(a, b)
    }

    /// Returns `true` if `a == b` or one precedes the other.
    pub fn comparable(&self, a: &T, b: &T) -> bool {
        a == b || self.precedes(a, b) || self.precedes(b, a)
    }

    /// Returns `true` if `element` belongs to the order's universe.
    pub fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }

    /// Returns the down-set of `element`: itself and everything before it.
    ///
    /// # Panics
    ///
    /// Panics if `element` is not part of the order.
    #[must_use]
    pub fn predecessors(&self, element: &T) -> BTreeSet<T> {
        assert!(
            self.elements.contains(element),
            "{element:?} is not an element of the order"
        );
        let mut down: BTreeSet<T> = self.relation.sources_of(element).cloned().collect();
        down.insert(element.clone());
        down
    }

    /// Returns the order induced on the elements of `ids` that belong to it.
    #[must_use]
    pub fn subset(&self, ids: &BTreeSet<T>) -> Self {
        let elements: BTreeSet<T> = self.elements.intersection(ids).cloned().collect();
        let relation = self.relation.induced(|v| elements.contains(v));
        Self { elements, relation }
    }

    /// Iterates the universe in ascending order.
    pub fn elements(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All pairs `(a, b)` with `a < b`, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(T, T)> {
        let mut edges = self.relation.to_edge_list();
        edges.sort();
        edges
    }

    /// Pairs `(a, b)` with `a < b` and nothing strictly between them, sorted.
    #[must_use]
    pub fn covering_edges(&self) -> Vec<(T, T)> {
        self.edges()
            .into_iter()
            .filter(|(a, b)| {
                !self
                    .relation
                    .targets_of(a)
                    .is_some_and(|mids| mids.iter().any(|m| self.precedes(m, b)))
            })
            .collect()
    }

    /// Unordered pairs `(a, b)` with `a < b` in `Ord` and no relation between
    /// them, sorted.
    #[must_use]
    pub fn incomparable_pairs(&self) -> Vec<(T, T)> {
        let elements: Vec<&T> = self.elements.iter().collect();
        let mut pairs = Vec::new();
        for (i, a) in elements.iter().enumerate() {
            for b in &elements[i + 1..] {
                if !self.comparable(a, b) {
                    pairs.push(((*a).clone(), (*b).clone()));
                }
            }
        }
        pairs
    }

    /// Elements of `remaining` that have no predecessor in `remaining`.
    pub(crate) fn minimal_in<'a>(
        &'a self,
        remaining: &'a BTreeSet<T>,
    ) -> impl Iterator<Item = &'a T> + 'a {
        remaining
            .iter()
            .filter(move |v| !self.relation.sources_of(v).any(|u| remaining.contains(u)))
    }

    /// Every partial order over the same elements that contains this one.
    ///
    /// The sequence is lazy and finite, yields each refinement exactly once,
    /// and starts with this order itself.
    #[must_use]
    pub fn refinements(&self) -> Refinements<T> {
        Refinements::new(self.clone())
    }

    /// Every linear extension of this order, as element sequences.
    #[must_use]
    pub fn all_topological_sorts(&self) -> LinearExtensions<'_, T> {
        LinearExtensions::new(self)
    }

    /// Renders the Hasse diagram as a `petgraph` graph.
    ///
    /// One node per element in ascending order, one edge per covering pair.
    /// Node weights come from `labels` when given, falling back to the
    /// element's `Display` form.
    #[must_use]
    pub fn visualize(
        &self,
        labels: Option<&BTreeMap<T, String>>,
    ) -> petgraph::graph::DiGraph<String, ()>
    where
        T: Display,
    {
        let mut graph = petgraph::graph::DiGraph::new();
        let nodes: BTreeMap<&T, _> = self
            .elements
            .iter()
            .map(|element| {
                let weight = labels
                    .and_then(|labels| labels.get(element).cloned())
                    .unwrap_or_else(|| element.to_string());
                (element, graph.add_node(weight))
            })
            .collect();
        for (a, b) in self.covering_edges() {
            graph.add_edge(nodes[&a], nodes[&b], ());
        }
        graph
    }
}

impl<T> Display for Poset<T>
where
    T: Hash + Eq + Ord + Clone + Debug + Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (a, b)) in self.covering_edges().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{a} < {b}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(feature = "serde")]
impl<T> ::serde::Serialize for Poset<T>
where
    T: Hash + Eq + Ord + Clone + Debug + ::serde::Serialize,
{
    fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use ::serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Poset", 2)?;
        state.serialize_field("elements", &self.elements)?;
        state.serialize_field("order", &self.covering_edges())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: u32) -> Poset<u32> {
        let mut poset = Poset::new(0..n);
        for i in 1..n {
            assert!(poset.order_try(i - 1, i));
        }
        poset
    }

    #[test]
    fn test_order_try_closes_transitively() {
        let poset = chain(4);
        assert!(poset.precedes(&0, &3));
        assert!(poset.precedes(&1, &3));
        assert!(!poset.precedes(&3, &0));
        assert_eq!(poset.covering_edges(), vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(poset.edges().len(), 6);
    }

    #[test]
    fn test_order_try_rejects_cycles() {
        let mut poset = chain(3);
        let before = poset.clone();
        assert!(!poset.order_try(2, 0));
        assert!(!poset.order_try(1, 1));
        assert!(!poset.order_try(0, 7));
        assert_eq!(poset, before);
        // already ordered: succeeds without change
        assert!(poset.order_try(0, 2));
        assert_eq!(poset, before);
    }

    #[test]
    fn test_predecessors_is_reflexive_down_set() {
        let mut poset = Poset::new(0..4);
        poset.order_try(0, 1);
        poset.order_try(1, 2);
        assert_eq!(poset.predecessors(&2), [0, 1, 2].into());
        assert_eq!(poset.predecessors(&0), [0].into());
        assert_eq!(poset.predecessors(&3), [3].into());
    }

    #[test]
    fn test_subset_keeps_induced_order() {
        let poset = chain(4);
        let sub = poset.subset(&[0, 2, 3].into());
        assert_eq!(sub.elements().copied().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!(sub.precedes(&0, &2));
        assert_eq!(sub.covering_edges(), vec![(0, 2), (2, 3)]);
    }

    #[test]
    fn test_incomparable_pairs() {
        let mut poset = Poset::new(0..3);
        poset.order_try(0, 1);
        assert_eq!(poset.incomparable_pairs(), vec![(0, 2), (1, 2)]);
        assert!(chain(3).incomparable_pairs().is_empty());
    }

    #[test]
    fn test_display_lists_covering_pairs() {
        let poset = chain(3);
        assert_eq!(poset.to_string(), "{0 < 1, 1 < 2}");
        assert_eq!(Poset::new(0..2).to_string(), "{}");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_covering_pairs() {
        let value = serde_json::to_value(chain(3)).unwrap();
        assert_eq!(value["elements"], serde_json::json!([0, 1, 2]));
        assert_eq!(value["order"], serde_json::json!([[0, 1], [1, 2]]));
    }

    #[test]
    fn test_visualize_is_stable() {
        let poset = chain(3);
        let labels: BTreeMap<u32, String> = [(1, "one".to_string())].into();

        let g1 = poset.visualize(Some(&labels));
        let g2 = poset.visualize(Some(&labels));

        let weights = |g: &petgraph::graph::DiGraph<String, ()>| {
            g.node_weights().cloned().collect::<Vec<_>>()
        };
        let edges = |g: &petgraph::graph::DiGraph<String, ()>| {
            g.raw_edges()
                .iter()
                .map(|e| (e.source().index(), e.target().index()))
                .collect::<Vec<_>>()
        };
        assert_eq!(weights(&g1), vec!["0", "one", "2"]);
        assert_eq!(weights(&g1), weights(&g2));
        assert_eq!(edges(&g1), vec![(0, 1), (1, 2)]);
        assert_eq!(edges(&g1), edges(&g2));
    }
}
