//! Structural anomalies: densely clustered but non-reciprocal communities

use super::types::{ClusterMetrics, IndicatorKind, MisinfoCluster};
use super::{ClusterIndicator, IndicatorInput};
use crate::config::MisinfoConfig;
use crate::error::DetectorError;
use crate::graph::NodeId;

#[derive(Debug, Clone)]
pub struct StructuralAnomaly {
    min_size: usize,
    min_clustering: f64,
    max_reciprocity: f64,
    threshold: f64,
}

impl StructuralAnomaly {
    pub fn from_config(config: &MisinfoConfig) -> Self {
        Self {
            min_size: config.cluster_size_threshold,
            min_clustering: config.anomaly_min_clustering,
            max_reciprocity: config.anomaly_max_reciprocity,
            threshold: config.structural_anomaly_threshold,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl ClusterIndicator for StructuralAnomaly {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::StructuralAnomaly
    }

    fn detect(&self, input: &IndicatorInput<'_>) -> Result<Vec<MisinfoCluster>, DetectorError> {
        let graph = input
            .combined
            .ok_or(DetectorError::MissingField("combined graph"))?;
        if input.partition.is_empty() {
            return Err(DetectorError::MissingField("community partition"));
        }
        // Reciprocity is undefined without direction
        if !graph.is_directed() {
            return Ok(Vec::new());
        }

        let mut clusters = Vec::new();
        for (community, members) in input.partition.communities() {
            let nodes: Vec<&NodeId> = members.iter().filter(|n| graph.contains_node(n)).collect();
            if nodes.len() < self.min_size {
                continue;
            }

            let avg_degree = mean(nodes.iter().map(|n| graph.degree(n) as f64)).unwrap_or(0.0);
            let avg_clustering = mean(nodes.iter().map(|n| graph.clustering(n))).unwrap_or(0.0);
            let avg_reciprocity = mean(nodes.iter().filter_map(|n| graph.reciprocity(n))).unwrap_or(0.0);

            if avg_clustering <= self.min_clustering || avg_reciprocity >= self.max_reciprocity {
                continue;
            }
            let anomaly_score = avg_clustering * (1.0 - avg_reciprocity);
            if anomaly_score < self.threshold {
                continue;
            }

            clusters.push(MisinfoCluster::new(
                format!("anomaly_{}", community),
                nodes.into_iter().cloned(),
                IndicatorKind::StructuralAnomaly,
                anomaly_score,
                ClusterMetrics::StructuralAnomaly {
                    community: community.clone(),
                    avg_degree,
                    avg_clustering,
                    avg_reciprocity,
                    anomaly_score,
                },
            ));
        }

        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LayerGraph, Partition};

    fn run(graph: &LayerGraph, partition: &Partition) -> Vec<MisinfoCluster> {
        StructuralAnomaly::from_config(&MisinfoConfig::default())
            .detect(&IndicatorInput {
                combined: Some(graph),
                posts: &[],
                partition,
                coordinated: &[],
            })
            .unwrap()
    }

    /// Directed tournament on `n` nodes: every pair linked one way only
    fn tournament(n: usize) -> LayerGraph {
        let mut g = LayerGraph::new("combined", true);
        for i in 0..n {
            for j in (i + 1)..n {
                g.add_weight(&format!("n{}", i).into(), &format!("n{}", j).into(), 1.0);
            }
        }
        g
    }

    #[test]
    fn dense_one_way_community_is_anomalous() {
        let graph = tournament(6);
        let partition = Partition::from_assignments((0..6).map(|i| (format!("n{}", i), 0u64)));

        let clusters = run(&graph, &partition);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, "anomaly_0");
        assert_eq!(clusters[0].risk_score, 1.0);
    }

    #[test]
    fn reciprocal_community_is_normal() {
        let mut graph = tournament(6);
        for i in 0..6 {
            for j in (i + 1)..6 {
                graph.add_weight(&format!("n{}", j).into(), &format!("n{}", i).into(), 1.0);
            }
        }
        let partition = Partition::from_assignments((0..6).map(|i| (format!("n{}", i), 0u64)));
        assert!(run(&graph, &partition).is_empty());
    }

    #[test]
    fn undirected_graph_yields_nothing() {
        let mut graph = LayerGraph::new("combined", false);
        graph.add_weight(&"a".into(), &"b".into(), 1.0);
        let partition = Partition::from_assignments([("a", 0u64), ("b", 0u64)]);
        assert!(run(&graph, &partition).is_empty());
    }
}
