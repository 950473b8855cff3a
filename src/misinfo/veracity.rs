//! Low-veracity communities

use super::types::{ClusterMetrics, IndicatorKind, MisinfoCluster};
use super::{ClusterIndicator, IndicatorInput};
use crate::config::MisinfoConfig;
use crate::error::DetectorError;
use crate::graph::CommunityId;
use std::collections::BTreeMap;

/// Flags communities whose posts average at or below the veracity threshold
#[derive(Debug, Clone)]
pub struct LowVeracity {
    threshold: f64,
    min_size: usize,
}

impl LowVeracity {
    pub fn from_config(config: &MisinfoConfig) -> Self {
        Self {
            threshold: config.veracity_threshold,
            min_size: config.cluster_size_threshold,
        }
    }
}

impl ClusterIndicator for LowVeracity {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::LowVeracity
    }

    fn detect(&self, input: &IndicatorInput<'_>) -> Result<Vec<MisinfoCluster>, DetectorError> {
        if input.partition.is_empty() {
            return Err(DetectorError::MissingField("community partition"));
        }
        if input.posts.iter().all(|p| p.veracity_score.is_none()) {
            return Err(DetectorError::MissingField("veracity_score"));
        }

        let mut scores: BTreeMap<&CommunityId, Vec<f64>> = BTreeMap::new();
        for post in input.posts {
            let (Some(veracity), Some(community)) =
                (post.veracity_score, input.partition.community_of(&post.author))
            else {
                continue;
            };
            scores.entry(community).or_default().push(veracity);
        }

        let clusters = scores
            .into_iter()
            .filter_map(|(community, values)| {
                let avg = values.iter().sum::<f64>() / values.len() as f64;
                let members = input.partition.members(community);
                (avg <= self.threshold && members.len() >= self.min_size).then(|| {
                    MisinfoCluster::new(
                        format!("veracity_{}", community),
                        members.iter().cloned(),
                        IndicatorKind::LowVeracity,
                        1.0 - avg,
                        ClusterMetrics::LowVeracity {
                            community: community.clone(),
                            avg_veracity: avg,
                        },
                    )
                })
            })
            .collect();

        Ok(clusters)
    }
}
