//! LayerGraph: a simple weighted graph for one relation type

use super::node::NodeId;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A weighted simple graph, directed or undirected.
///
/// Parallel edges collapse into one edge whose weight is the sum of the
/// contributions. Undirected edges are stored once under the canonical
/// `(min, max)` key. All collections are ordered, so iteration is
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGraph {
    name: String,
    directed: bool,
    nodes: BTreeSet<NodeId>,
    weights: BTreeMap<(NodeId, NodeId), f64>,
    successors: BTreeMap<NodeId, BTreeSet<NodeId>>,
    predecessors: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl LayerGraph {
    pub fn new(name: impl Into<String>, directed: bool) -> Self {
        Self {
            name: name.into(),
            directed,
            nodes: BTreeSet::new(),
            weights: BTreeMap::new(),
            successors: BTreeMap::new(),
            predecessors: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a node; no-op if present
    pub fn add_node(&mut self, id: NodeId) {
        self.nodes.insert(id);
    }

    /// Add `weight` to the edge `(source, target)`, creating it if needed
    pub fn add_weight(&mut self, source: &NodeId, target: &NodeId, weight: f64) {
        self.nodes.insert(source.clone());
        self.nodes.insert(target.clone());

        let key = self.key(source, target);
        let is_new = !self.weights.contains_key(&key);
        *self.weights.entry(key).or_insert(0.0) += weight;

        if is_new {
            self.link(source, target);
            if !self.directed {
                self.link(target, source);
            }
        }
    }

    fn link(&mut self, source: &NodeId, target: &NodeId) {
        self.successors
            .entry(source.clone())
            .or_default()
            .insert(target.clone());
        self.predecessors
            .entry(target.clone())
            .or_default()
            .insert(source.clone());
    }

    fn key(&self, source: &NodeId, target: &NodeId) -> (NodeId, NodeId) {
        if !self.directed && target < source {
            (target.clone(), source.clone())
        } else {
            (source.clone(), target.clone())
        }
    }

    /// Whether the edge exists. Undirected graphs answer for both orientations.
    pub fn has_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        self.weights.contains_key(&self.key(source, target))
    }

    pub fn weight(&self, source: &NodeId, target: &NodeId) -> Option<f64> {
        self.weights.get(&self.key(source, target)).copied()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    /// Stored edges as `(source, target, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId, f64)> {
        self.weights.iter().map(|((u, v), w)| (u, v, *w))
    }

    /// Every orientation of every edge: undirected edges appear twice.
    pub fn oriented_edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut out = Vec::with_capacity(self.weights.len());
        for ((u, v), w) in &self.weights {
            out.push((u.clone(), v.clone(), *w));
            if !self.directed && u != v {
                out.push((v.clone(), u.clone(), *w));
            }
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    pub fn successors(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.successors.get(id).into_iter().flatten()
    }

    pub fn predecessors(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.predecessors.get(id).into_iter().flatten()
    }

    pub fn out_degree(&self, id: &NodeId) -> usize {
        self.successors.get(id).map_or(0, BTreeSet::len)
    }

    pub fn in_degree(&self, id: &NodeId) -> usize {
        self.predecessors.get(id).map_or(0, BTreeSet::len)
    }

    /// Total degree. Directed: in + out. Undirected: incident edges, a
    /// self-loop counting twice.
    pub fn degree(&self, id: &NodeId) -> usize {
        if self.directed {
            self.in_degree(id) + self.out_degree(id)
        } else {
            let self_loop = usize::from(self.has_edge(id, id));
            self.out_degree(id) + self_loop
        }
    }

    /// Neighbours ignoring direction, excluding the node itself
    pub fn undirected_neighbors(&self, id: &NodeId) -> BTreeSet<&NodeId> {
        self.successors(id)
            .chain(self.predecessors(id))
            .filter(|n| *n != id)
            .collect()
    }

    /// Edge density: `m / (n(n-1))` directed, `2m / (n(n-1))` undirected
    pub fn density(&self) -> f64 {
        let n = self.node_count() as f64;
        if n <= 1.0 {
            return 0.0;
        }
        let m = self.edge_count() as f64;
        let possible = n * (n - 1.0);
        if self.directed {
            m / possible
        } else {
            2.0 * m / possible
        }
    }

    /// Local clustering coefficient on the undirected projection
    pub fn clustering(&self, id: &NodeId) -> f64 {
        let neighbors: Vec<&NodeId> = self.undirected_neighbors(id).into_iter().collect();
        let k = neighbors.len();
        if k < 2 {
            return 0.0;
        }

        let mut links = 0usize;
        for i in 0..k {
            for j in (i + 1)..k {
                if self.has_edge(neighbors[i], neighbors[j])
                    || self.has_edge(neighbors[j], neighbors[i])
                {
                    links += 1;
                }
            }
        }
        (2 * links) as f64 / (k * (k - 1)) as f64
    }

    /// Fraction of a node's successors that are also its predecessors.
    ///
    /// `None` when the node has no successors.
    pub fn reciprocity(&self, id: &NodeId) -> Option<f64> {
        let successors = self.successors.get(id)?;
        if successors.is_empty() {
            return None;
        }
        let predecessors = self.predecessors.get(id);
        let reciprocal = successors
            .iter()
            .filter(|s| predecessors.is_some_and(|p| p.contains(*s)))
            .count();
        Some(reciprocal as f64 / successors.len() as f64)
    }

    /// Weakly connected components of the whole graph
    pub fn weakly_connected_components(&self) -> Vec<BTreeSet<NodeId>> {
        self.weak_components_within(&self.nodes)
    }

    /// Weakly connected components of the subgraph induced by `subset`
    pub fn weak_components_within(&self, subset: &BTreeSet<NodeId>) -> Vec<BTreeSet<NodeId>> {
        let mut seen: BTreeSet<&NodeId> = BTreeSet::new();
        let mut components = Vec::new();

        for start in subset {
            if !self.nodes.contains(start) || !seen.insert(start) {
                continue;
            }
            let mut component = BTreeSet::new();
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                component.insert(node.clone());
                for next in self.successors(node).chain(self.predecessors(node)) {
                    if subset.contains(next) && seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Connected ignoring direction. The empty graph is not connected.
    pub fn is_weakly_connected(&self) -> bool {
        !self.nodes.is_empty() && self.weakly_connected_components().len() == 1
    }

    /// Every node reaches every other along edge direction.
    ///
    /// Equals weak connectivity for undirected graphs.
    pub fn is_strongly_connected(&self) -> bool {
        if !self.directed {
            return self.is_weakly_connected();
        }
        let Some(start) = self.nodes.iter().next() else {
            return false;
        };
        let forward = self.reach(start, |n| self.successors(n));
        let backward = self.reach(start, |n| self.predecessors(n));
        forward == self.nodes.len() && backward == self.nodes.len()
    }

    fn reach<'a, F, I>(&'a self, start: &'a NodeId, next: F) -> usize
    where
        F: Fn(&'a NodeId) -> I,
        I: Iterator<Item = &'a NodeId>,
    {
        let mut seen: BTreeSet<&NodeId> = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for n in next(node) {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from_string(s)
    }

    #[test]
    fn parallel_contributions_sum() {
        let mut g = LayerGraph::new("retweet", true);
        g.add_weight(&id("a"), &id("b"), 1.0);
        g.add_weight(&id("a"), &id("b"), 2.5);

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight(&id("a"), &id("b")), Some(3.5));
        assert_eq!(g.weight(&id("b"), &id("a")), None);
    }

    #[test]
    fn undirected_edges_are_canonical() {
        let mut g = LayerGraph::new("hashtag", false);
        g.add_weight(&id("z"), &id("a"), 1.0);
        g.add_weight(&id("a"), &id("z"), 1.0);

        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge(&id("z"), &id("a")));
        assert_eq!(g.weight(&id("a"), &id("z")), Some(2.0));
        assert_eq!(g.oriented_edges().len(), 2);
        assert_eq!(g.degree(&id("a")), 1);
    }

    #[test]
    fn density_by_direction() {
        let mut directed = LayerGraph::new("d", true);
        directed.add_weight(&id("a"), &id("b"), 1.0);
        directed.add_weight(&id("b"), &id("c"), 1.0);
        assert!((directed.density() - 2.0 / 6.0).abs() < 1e-12);

        let mut undirected = LayerGraph::new("u", false);
        undirected.add_weight(&id("a"), &id("b"), 1.0);
        undirected.add_weight(&id("b"), &id("c"), 1.0);
        assert!((undirected.density() - 4.0 / 6.0).abs() < 1e-12);

        assert_eq!(LayerGraph::new("empty", true).density(), 0.0);
    }

    #[test]
    fn clustering_of_triangle_and_star() {
        let mut g = LayerGraph::new("d", true);
        g.add_weight(&id("a"), &id("b"), 1.0);
        g.add_weight(&id("b"), &id("c"), 1.0);
        g.add_weight(&id("c"), &id("a"), 1.0);
        g.add_weight(&id("a"), &id("d"), 1.0);

        // a's neighbours b, c, d: only b-c linked → 1 of 3 pairs
        assert!((g.clustering(&id("a")) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(g.clustering(&id("b")), 1.0);
        assert_eq!(g.clustering(&id("d")), 0.0);
    }

    #[test]
    fn reciprocity_counts_mutual_successors() {
        let mut g = LayerGraph::new("d", true);
        g.add_weight(&id("a"), &id("b"), 1.0);
        g.add_weight(&id("b"), &id("a"), 1.0);
        g.add_weight(&id("a"), &id("c"), 1.0);

        assert_eq!(g.reciprocity(&id("a")), Some(0.5));
        assert_eq!(g.reciprocity(&id("c")), None);
    }

    #[test]
    fn connectivity() {
        let mut g = LayerGraph::new("d", true);
        g.add_weight(&id("a"), &id("b"), 1.0);
        g.add_weight(&id("b"), &id("c"), 1.0);
        assert!(g.is_weakly_connected());
        assert!(!g.is_strongly_connected());

        g.add_weight(&id("c"), &id("a"), 1.0);
        assert!(g.is_strongly_connected());

        g.add_node(id("lonely"));
        assert!(!g.is_weakly_connected());
        assert_eq!(g.weakly_connected_components().len(), 2);
    }

    #[test]
    fn induced_components_ignore_outside_nodes() {
        let mut g = LayerGraph::new("d", true);
        g.add_weight(&id("a"), &id("hub"), 1.0);
        g.add_weight(&id("hub"), &id("b"), 1.0);

        let subset: BTreeSet<NodeId> = [id("a"), id("b")].into_iter().collect();
        let components = g.weak_components_within(&subset);
        assert_eq!(components.len(), 2, "a and b only connect through hub");
    }
}
