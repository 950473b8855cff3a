//! Read-only summaries of layer graphs

use super::layer_graph::LayerGraph;
use super::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Size, density and connectivity of one graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStatistics {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub is_directed: bool,
    pub is_weakly_connected: bool,
    pub is_strongly_connected: bool,
    /// Absent for an empty graph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_degree: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_degree: Option<usize>,
}

impl LayerStatistics {
    pub fn of(graph: &LayerGraph) -> Self {
        let degrees: Vec<usize> = graph.nodes().map(|n| graph.degree(n)).collect();
        let (avg_degree, max_degree) = if degrees.is_empty() {
            (None, None)
        } else {
            let total: usize = degrees.iter().sum();
            (
                Some(total as f64 / degrees.len() as f64),
                degrees.iter().max().copied(),
            )
        };

        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            density: graph.density(),
            is_directed: graph.is_directed(),
            is_weakly_connected: graph.is_weakly_connected(),
            is_strongly_connected: graph.is_strongly_connected(),
            avg_degree,
            max_degree,
        }
    }
}

/// Neighbours of a node within one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerNeighbors {
    Directed {
        #[serde(rename = "in")]
        incoming: Vec<NodeId>,
        #[serde(rename = "out")]
        outgoing: Vec<NodeId>,
    },
    Undirected(Vec<NodeId>),
}

/// A node's presence across layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProfile {
    pub node_id: NodeId,
    pub layers: Vec<String>,
    pub degrees: BTreeMap<String, usize>,
    pub neighbors: BTreeMap<String, LayerNeighbors>,
}

impl NodeProfile {
    pub fn build<'a>(node_id: &NodeId, layers: impl Iterator<Item = &'a LayerGraph>) -> Self {
        let mut profile = Self {
            node_id: node_id.clone(),
            layers: Vec::new(),
            degrees: BTreeMap::new(),
            neighbors: BTreeMap::new(),
        };

        for graph in layers {
            if !graph.contains_node(node_id) {
                continue;
            }
            let name = graph.name().to_string();
            profile.layers.push(name.clone());
            profile.degrees.insert(name.clone(), graph.degree(node_id));

            let neighbors = if graph.is_directed() {
                LayerNeighbors::Directed {
                    incoming: graph.predecessors(node_id).cloned().collect(),
                    outgoing: graph.successors(node_id).cloned().collect(),
                }
            } else {
                LayerNeighbors::Undirected(graph.successors(node_id).cloned().collect())
            };
            profile.neighbors.insert(name, neighbors);
        }

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_of_small_star() {
        let mut g = LayerGraph::new("mention", true);
        for leaf in ["a", "b", "c"] {
            g.add_weight(&leaf.into(), &"hub".into(), 1.0);
        }

        let stats = LayerStatistics::of(&g);
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.edges, 3);
        assert!(stats.is_directed);
        assert!(stats.is_weakly_connected);
        assert!(!stats.is_strongly_connected);
        assert_eq!(stats.max_degree, Some(3));
        assert_eq!(stats.avg_degree, Some(1.5));
    }

    #[test]
    fn empty_graph_has_no_degree_summary() {
        let stats = LayerStatistics::of(&LayerGraph::new("empty", false));
        assert_eq!(stats.nodes, 0);
        assert_eq!(stats.avg_degree, None);
        assert!(!stats.is_weakly_connected);

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("avg_degree").is_none());
    }

    #[test]
    fn profile_spans_layers() {
        let mut retweet = LayerGraph::new("retweet", true);
        retweet.add_weight(&"a".into(), &"b".into(), 1.0);
        let mut hashtag = LayerGraph::new("hashtag", false);
        hashtag.add_weight(&"x".into(), &"y".into(), 2.0);

        let profile = NodeProfile::build(&"b".into(), [&retweet, &hashtag].into_iter());
        assert_eq!(profile.layers, vec!["retweet"]);
        assert_eq!(profile.degrees["retweet"], 1);
        assert_eq!(
            profile.neighbors["retweet"],
            LayerNeighbors::Directed {
                incoming: vec!["a".into()],
                outgoing: vec![],
            }
        );
    }
}
