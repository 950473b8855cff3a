//! Misinformation cluster detection
//!
//! Five [`ClusterIndicator`]s score communities, content bursts,
//! coordinated groups and graph regions for misinformation risk. Their
//! clusters are pooled, ranked by risk and deduplicated by node overlap.

mod anomaly;
mod bot;
mod coordinated;
mod ranking;
mod spread;
mod types;
mod veracity;

pub use anomaly::StructuralAnomaly;
pub use bot::{bot_score, BotLike};
pub use coordinated::CoordinatedMisinformation;
pub use ranking::rank_clusters;
pub use spread::RapidSpread;
pub use types::{ClusterMetrics, IndicatorKind, MisinfoCluster, MisinfoReport};
pub use veracity::LowVeracity;

use crate::config::MisinfoConfig;
use crate::coordination::CoordinatedGroup;
use crate::dataset::{with_claim_veracity, Claim, Post};
use crate::error::DetectorError;
use crate::graph::{GraphLayerBuilder, LayerGraph, Partition};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Everything an indicator may read. Posts already carry claim veracity.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorInput<'a> {
    pub combined: Option<&'a LayerGraph>,
    pub posts: &'a [Post],
    pub partition: &'a Partition,
    pub coordinated: &'a [CoordinatedGroup],
}

/// One misinformation risk heuristic.
///
/// `Err` degrades the indicator to an empty result; it never aborts the run.
pub trait ClusterIndicator: Send + Sync {
    fn kind(&self) -> IndicatorKind;

    fn detect(&self, input: &IndicatorInput<'_>) -> Result<Vec<MisinfoCluster>, DetectorError>;
}

/// The five built-in indicators, configured from `config`
pub fn default_indicators(config: &MisinfoConfig) -> Vec<Box<dyn ClusterIndicator>> {
    vec![
        Box::new(LowVeracity::from_config(config)),
        Box::new(RapidSpread::from_config(config)),
        Box::new(CoordinatedMisinformation::from_config(config)),
        Box::new(StructuralAnomaly::from_config(config)),
        Box::new(BotLike::from_config(config)),
    ]
}

pub struct MisinformationClusterEngine {
    config: MisinfoConfig,
    indicators: Vec<Box<dyn ClusterIndicator>>,
}

impl MisinformationClusterEngine {
    pub fn new(config: MisinfoConfig) -> Self {
        let indicators = default_indicators(&config);
        Self { config, indicators }
    }

    /// Engine with a custom indicator set, deduplicated by kind (first wins)
    pub fn with_indicators(config: MisinfoConfig, indicators: Vec<Box<dyn ClusterIndicator>>) -> Self {
        let mut seen = HashSet::new();
        let indicators = indicators
            .into_iter()
            .filter(|i| seen.insert(i.kind()))
            .collect();
        Self { config, indicators }
    }

    pub fn config(&self) -> &MisinfoConfig {
        &self.config
    }

    pub fn indicators(&self) -> &[Box<dyn ClusterIndicator>] {
        &self.indicators
    }

    pub fn detect_misinformation_clusters(
        &self,
        graph: &GraphLayerBuilder,
        posts: &[Post],
        claims: &[Claim],
        partition: &Partition,
        coordinated: &[CoordinatedGroup],
    ) -> MisinfoReport {
        info!(
            posts = posts.len(),
            communities = partition.community_count(),
            coordinated_groups = coordinated.len(),
            "Detecting misinformation clusters"
        );

        let posts = with_claim_veracity(posts, claims);
        let input = IndicatorInput {
            combined: graph.combined(),
            posts: &posts,
            partition,
            coordinated,
        };

        let mut candidates = Vec::new();
        let mut degraded = BTreeMap::new();
        for indicator in &self.indicators {
            let kind = indicator.kind();
            match indicator.detect(&input) {
                Ok(clusters) => {
                    debug!(indicator = %kind, clusters = clusters.len(), "Indicator evaluated");
                    candidates.extend(clusters);
                }
                Err(e) => {
                    warn!(indicator = %kind, error = %e, "Indicator degraded to empty result");
                    degraded.insert(kind.name().to_string(), e.to_string());
                }
            }
        }

        let ranked = rank_clusters(candidates, self.config.duplicate_overlap);
        let high_risk_clusters: Vec<MisinfoCluster> = ranked
            .iter()
            .filter(|c| c.risk_score >= self.config.high_risk_threshold)
            .cloned()
            .collect();

        info!(
            clusters = ranked.len(),
            high_risk = high_risk_clusters.len(),
            "Misinformation detection complete"
        );

        MisinfoReport {
            n_clusters: ranked.len(),
            misinfo_clusters: ranked,
            high_risk_clusters,
            degraded,
        }
    }
}

impl Default for MisinformationClusterEngine {
    fn default() -> Self {
        Self::new(MisinfoConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_layers;

    struct Fixed(IndicatorKind, Vec<MisinfoCluster>);

    impl ClusterIndicator for Fixed {
        fn kind(&self) -> IndicatorKind {
            self.0
        }
        fn detect(&self, _: &IndicatorInput<'_>) -> Result<Vec<MisinfoCluster>, DetectorError> {
            Ok(self.1.clone())
        }
    }

    fn cluster(id: &str, nodes: &[&str], risk: f64) -> MisinfoCluster {
        MisinfoCluster::new(
            id,
            nodes.iter().map(|&n| n.into()),
            IndicatorKind::BotLike,
            risk,
            ClusterMetrics::BotLike { avg_bot_score: risk },
        )
    }

    #[test]
    fn default_engine_registers_all_indicators() {
        let engine = MisinformationClusterEngine::default();
        let kinds: Vec<IndicatorKind> = engine.indicators().iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, IndicatorKind::ALL);
    }

    #[test]
    fn report_splits_high_risk() {
        let engine = MisinformationClusterEngine::with_indicators(
            MisinfoConfig::default(),
            vec![Box::new(Fixed(
                IndicatorKind::BotLike,
                vec![cluster("low", &["a"], 0.4), cluster("high", &["b"], 0.7)],
            ))],
        );
        let builder = GraphLayerBuilder::new(default_layers());

        let report =
            engine.detect_misinformation_clusters(&builder, &[], &[], &Partition::new(), &[]);
        assert_eq!(report.n_clusters, 2);
        assert_eq!(report.misinfo_clusters[0].id, "high");
        assert_eq!(report.high_risk_clusters.len(), 1);
    }

    #[test]
    fn missing_inputs_degrade_without_failing() {
        let builder = GraphLayerBuilder::new(default_layers());
        let report = MisinformationClusterEngine::default().detect_misinformation_clusters(
            &builder,
            &[Post::new("p1", "a").at(0)],
            &[],
            &Partition::new(),
            &[],
        );
        assert_eq!(report.n_clusters, 0);
        assert!(report.degraded.contains_key("low_veracity"));
        assert!(report.degraded.contains_key("bot_like"));
    }
}
