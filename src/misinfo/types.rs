//! Misinformation clusters and the engine report

use crate::coordination::SignalKind;
use crate::graph::{CommunityId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The five misinformation risk indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    LowVeracity,
    RapidSpread,
    CoordinatedMisinformation,
    StructuralAnomaly,
    BotLike,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::LowVeracity,
        IndicatorKind::RapidSpread,
        IndicatorKind::CoordinatedMisinformation,
        IndicatorKind::StructuralAnomaly,
        IndicatorKind::BotLike,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::LowVeracity => "low_veracity",
            IndicatorKind::RapidSpread => "rapid_spread",
            IndicatorKind::CoordinatedMisinformation => "coordinated_misinformation",
            IndicatorKind::StructuralAnomaly => "structural_anomaly",
            IndicatorKind::BotLike => "bot_like",
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Indicator-specific measurements behind a risk score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterMetrics {
    LowVeracity {
        community: CommunityId,
        avg_veracity: f64,
    },
    RapidSpread {
        content_id: String,
        /// Posts per second; `None` when every post shares one timestamp
        spread_velocity: Option<f64>,
        n_shares: usize,
        time_span: i64,
    },
    CoordinatedMisinformation {
        avg_veracity: f64,
        confidence: f64,
        signals: BTreeSet<SignalKind>,
    },
    StructuralAnomaly {
        community: CommunityId,
        avg_degree: f64,
        avg_clustering: f64,
        avg_reciprocity: f64,
        anomaly_score: f64,
    },
    BotLike {
        avg_bot_score: f64,
    },
}

/// Nodes one indicator associates with low-credibility content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MisinfoCluster {
    pub id: String,
    pub nodes: BTreeSet<NodeId>,
    pub indicator: IndicatorKind,
    /// In [0, 1]
    pub risk_score: f64,
    pub metrics: ClusterMetrics,
}

impl MisinfoCluster {
    /// Build a cluster, clamping the risk score into [0, 1]
    pub fn new(
        id: impl Into<String>,
        nodes: impl IntoIterator<Item = NodeId>,
        indicator: IndicatorKind,
        risk_score: f64,
        metrics: ClusterMetrics,
    ) -> Self {
        Self {
            id: id.into(),
            nodes: nodes.into_iter().collect(),
            indicator,
            risk_score: risk_score.clamp(0.0, 1.0),
            metrics,
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Output of `detect_misinformation_clusters`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MisinfoReport {
    /// Deduplicated clusters, highest risk first
    pub misinfo_clusters: Vec<MisinfoCluster>,
    pub n_clusters: usize,
    pub high_risk_clusters: Vec<MisinfoCluster>,
    /// Indicators that produced nothing, with the reason
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub degraded: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_is_clamped() {
        let c = MisinfoCluster::new(
            "bot_0",
            ["a".into()],
            IndicatorKind::BotLike,
            3.2,
            ClusterMetrics::BotLike { avg_bot_score: 3.2 },
        );
        assert_eq!(c.risk_score, 1.0);
    }

    #[test]
    fn indicator_names_match_serialization() {
        for kind in IndicatorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn unbounded_velocity_serializes_as_null() {
        let metrics = ClusterMetrics::RapidSpread {
            content_id: "u".into(),
            spread_velocity: None,
            n_shares: 5,
            time_span: 0,
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json["rapid_spread"]["spread_velocity"].is_null());
    }
}
