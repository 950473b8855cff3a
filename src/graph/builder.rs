//! GraphLayerBuilder: per-relation layers and their combination

use super::edge::{layer, EdgeRecord};
use super::hashtag::build_cooccurrence_layer;
use super::layer_graph::LayerGraph;
use super::node::NodeId;
use super::stats::{LayerStatistics, NodeProfile};
use crate::config::LayerConfig;
use crate::dataset::Post;
use crate::error::{TangleError, TangleResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Name under which the combined graph is reported in statistics
pub const COMBINED: &str = "combined";

/// How layers merge into the combined graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMethod {
    /// Every edge of every layer
    #[default]
    Union,
    /// Only edges present in every layer
    Intersection,
}

impl std::str::FromStr for CombineMethod {
    type Err = TangleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "union" => Ok(Self::Union),
            "intersection" => Ok(Self::Intersection),
            other => Err(TangleError::UnknownCombineMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for CombineMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Intersection => write!(f, "intersection"),
        }
    }
}

/// Builds one weighted graph per relation type and combines them.
///
/// Layers are read-only once combined: `combine_layers` reads them and
/// stores a fresh combined graph.
#[derive(Debug, Clone)]
pub struct GraphLayerBuilder {
    config: BTreeMap<String, LayerConfig>,
    layers: BTreeMap<String, LayerGraph>,
    combined: Option<LayerGraph>,
    skipped: Vec<String>,
}

impl GraphLayerBuilder {
    pub fn new(config: BTreeMap<String, LayerConfig>) -> Self {
        Self {
            config,
            layers: BTreeMap::new(),
            combined: None,
            skipped: Vec::new(),
        }
    }

    /// Build every configured, enabled layer from edge records.
    ///
    /// Records below the layer's weight threshold are dropped before
    /// aggregation, but their endpoints stay in the layer as nodes. A layer
    /// with no records is skipped with a warning.
    pub fn build_layers(&mut self, edges: &[EdgeRecord]) -> &BTreeMap<String, LayerGraph> {
        info!(records = edges.len(), "Building multi-layer network");

        for (name, layer_config) in &self.config {
            if !layer_config.enabled {
                continue;
            }

            let records: Vec<&EdgeRecord> = edges.iter().filter(|e| &e.layer == name).collect();
            if records.is_empty() {
                warn!(layer = %name, "No edges found for layer");
                self.skipped.push(name.clone());
                continue;
            }

            let mut graph = LayerGraph::new(name.clone(), layer_config.directed);
            for record in records {
                graph.add_node(record.source.clone());
                graph.add_node(record.target.clone());
                if record.weight >= layer_config.weight_threshold {
                    graph.add_weight(&record.source, &record.target, record.weight);
                }
            }

            info!(
                layer = %name,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "Layer built"
            );
            self.layers.insert(name.clone(), graph);
        }

        &self.layers
    }

    /// Build the hashtag co-occurrence layer from posts.
    ///
    /// Uses the `hashtag` layer threshold (2 when unconfigured) and replaces
    /// any hashtag layer built from edge records.
    pub fn build_hashtag_layer(&mut self, posts: &[Post]) -> &LayerGraph {
        let threshold = self
            .config
            .get(layer::HASHTAG)
            .map_or(2.0, |c| c.weight_threshold);

        let graph = build_cooccurrence_layer(posts, threshold);
        info!(
            layer = layer::HASHTAG,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Hashtag layer built"
        );

        self.skipped.retain(|s| s != layer::HASHTAG);
        self.layers.insert(layer::HASHTAG.to_string(), graph);
        &self.layers[layer::HASHTAG]
    }

    /// Combine all layers into one graph.
    ///
    /// Edge weight is the sum of that edge's weight over every layer that
    /// contains it. The combined graph is directed when any layer is;
    /// undirected layers then contribute both orientations of each edge.
    pub fn combine_layers(&mut self, method: CombineMethod) -> TangleResult<&LayerGraph> {
        info!(%method, layers = self.layers.len(), "Combining layers");

        if self.layers.is_empty() {
            return Err(TangleError::NoLayers);
        }

        let directed = self.layers.values().any(LayerGraph::is_directed);
        let mut combined = LayerGraph::new(COMBINED, directed);

        match method {
            CombineMethod::Union => {
                for graph in self.layers.values() {
                    for node in graph.nodes() {
                        combined.add_node(node.clone());
                    }
                    for (u, v, w) in contributions(graph, directed) {
                        combined.add_weight(&u, &v, w);
                    }
                }
            }
            CombineMethod::Intersection => {
                let mut layers = self.layers.values();
                let mut common: BTreeMap<(NodeId, NodeId), f64> = layers
                    .next()
                    .map(|first| {
                        contributions(first, directed)
                            .into_iter()
                            .map(|(u, v, w)| ((u, v), w))
                            .collect()
                    })
                    .unwrap_or_default();

                for graph in layers {
                    let present: BTreeMap<(NodeId, NodeId), f64> = contributions(graph, directed)
                        .into_iter()
                        .map(|(u, v, w)| ((u, v), w))
                        .collect();
                    common.retain(|key, _| present.contains_key(key));
                    for (key, total) in common.iter_mut() {
                        *total += present[key];
                    }
                }

                for ((u, v), w) in common {
                    combined.add_weight(&u, &v, w);
                }
            }
        }

        info!(
            nodes = combined.node_count(),
            edges = combined.edge_count(),
            "Combined graph built"
        );
        Ok(&*self.combined.insert(combined))
    }

    pub fn layers(&self) -> &BTreeMap<String, LayerGraph> {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&LayerGraph> {
        self.layers.get(name)
    }

    pub fn combined(&self) -> Option<&LayerGraph> {
        self.combined.as_ref()
    }

    /// Configured layers that had no edge records
    pub fn skipped_layers(&self) -> &[String] {
        &self.skipped
    }

    /// Statistics per layer, plus `combined` once it exists
    pub fn get_layer_statistics(&self) -> BTreeMap<String, LayerStatistics> {
        let mut stats: BTreeMap<String, LayerStatistics> = self
            .layers
            .iter()
            .map(|(name, graph)| (name.clone(), LayerStatistics::of(graph)))
            .collect();

        if let Some(combined) = &self.combined {
            stats.insert(COMBINED.to_string(), LayerStatistics::of(combined));
        }
        stats
    }

    /// A node's degree and neighbours in each layer it appears in
    pub fn node_profile(&self, node: &NodeId) -> NodeProfile {
        NodeProfile::build(node, self.layers.values())
    }

    /// Every node that appears in any layer
    pub fn all_nodes(&self) -> BTreeSet<NodeId> {
        self.layers
            .values()
            .flat_map(|g| g.nodes().cloned())
            .collect()
    }
}

/// Edges a layer contributes to a combined graph of the given direction.
///
/// An undirected edge is one edge in an undirected target and two opposite
/// edges in a directed one.
fn contributions(graph: &LayerGraph, directed_target: bool) -> Vec<(NodeId, NodeId, f64)> {
    if directed_target {
        graph.oriented_edges()
    } else {
        graph
            .edges()
            .map(|(u, v, w)| (u.clone(), v.clone(), w))
            .collect()
    }
}
