use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

/// A transitively closed directed graph.
///
/// Edges are indexed both ways: `succ` maps a vertex to everything it
/// reaches, `pred` to everything that reaches it. Because the graph stays
/// closed, the ancestors of a vertex are exactly its `pred` entry and no
/// traversal is ever needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiGraph<T>
where
    T: Hash + Eq + Clone + Debug,
{
    succ: HashMap<T, HashSet<T>>,
    pred: HashMap<T, HashSet<T>>,
}

impl<T> Default for DiGraph<T>
where
    T: Hash + Eq + Clone + Debug,
{
    fn default() -> Self {
        Self {
            succ: HashMap::new(),
            pred: HashMap::new(),
        }
    }
}

impl<T> DiGraph<T>
where
    T: Hash + Eq + Clone + Debug,
{
    /// Adds a vertex with no edges (if not already present).
    pub fn add_vertex(&mut self, vertex: T) {
        self.succ.entry(vertex.clone()).or_default();
        self.pred.entry(vertex).or_default();
    }

    /// Returns `true` if `source` reaches `target`.
    pub fn has_edge(&self, source: &T, target: &T) -> bool {
        self.succ
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Every vertex that reaches `target`.
    pub fn sources_of<'a>(&'a self, target: &T) -> impl Iterator<Item = &'a T> + 'a {
        self.pred.get(target).into_iter().flatten()
    }

    /// Every vertex `source` reaches, if it is a vertex.
    pub fn targets_of(&self, source: &T) -> Option<&HashSet<T>> {
        self.succ.get(source)
    }

    /// Adds `source -> target` and every edge needed to keep the graph
    /// closed: each ancestor of `source` (inclusive) now reaches each
    /// descendant of `target` (inclusive).
    ///
    /// Returns `true` if any edge was added. Cycle checks are the caller's
    /// job.
    pub fn close_over(&mut self, source: T, target: T) -> bool {
        if self.has_edge(&source, &target) {
            return false;
        }

        let mut ancestors: Vec<T> = self.sources_of(&source).cloned().collect();
        ancestors.push(source);
        let mut descendants: Vec<T> = self
            .targets_of(&target)
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        descendants.push(target);

        for a in &ancestors {
            for d in &descendants {
                self.succ.entry(a.clone()).or_default().insert(d.clone());
                self.pred.entry(d.clone()).or_default().insert(a.clone());
            }
        }
        true
    }

    /// Adds each edge in turn with [`close_over`](Self::close_over).
    pub fn incremental_closure<I: IntoIterator<Item = (T, T)>>(&mut self, new_edges: I) -> bool {
        new_edges
            .into_iter()
            .fold(false, |changed, (u, v)| self.close_over(u, v) | changed)
    }

    /// The subgraph on the vertices accepted by `keep`.
    ///
    /// A restriction of a closed graph is closed, so no recomputation is
    /// needed.
    #[must_use]
    pub fn induced<F>(&self, keep: F) -> Self
    where
        F: Fn(&T) -> bool,
    {
        let restrict = |map: &HashMap<T, HashSet<T>>| -> HashMap<T, HashSet<T>> {
            map.iter()
                .filter(|(vertex, _)| keep(vertex))
                .map(|(vertex, others)| {
                    (
                        vertex.clone(),
                        others.iter().filter(|other| keep(other)).cloned().collect(),
                    )
                })
                .collect()
        };
        Self {
            succ: restrict(&self.succ),
            pred: restrict(&self.pred),
        }
    }

    /// Every edge as a `(source, target)` pair, in no particular order.
    #[must_use]
    pub fn to_edge_list(&self) -> Vec<(T, T)> {
        self.succ
            .iter()
            .flat_map(|(src, dsts)| dsts.iter().map(move |dst| (src.clone(), dst.clone())))
            .collect()
    }

    pub fn contains_vertex(&self, vertex: &T) -> bool {
        self.succ.contains_key(vertex)
    }
}
