//! Coordinated groups that push low-veracity content

use super::types::{ClusterMetrics, IndicatorKind, MisinfoCluster};
use super::{ClusterIndicator, IndicatorInput};
use crate::config::MisinfoConfig;
use crate::error::DetectorError;

#[derive(Debug, Clone)]
pub struct CoordinatedMisinformation {
    threshold: f64,
}

impl CoordinatedMisinformation {
    pub fn from_config(config: &MisinfoConfig) -> Self {
        Self {
            threshold: config.veracity_threshold,
        }
    }
}

impl ClusterIndicator for CoordinatedMisinformation {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::CoordinatedMisinformation
    }

    fn detect(&self, input: &IndicatorInput<'_>) -> Result<Vec<MisinfoCluster>, DetectorError> {
        if input.coordinated.is_empty() {
            return Ok(Vec::new());
        }
        if input.posts.iter().all(|p| p.veracity_score.is_none()) {
            return Err(DetectorError::MissingField("veracity_score"));
        }

        let mut clusters = Vec::new();
        for group in input.coordinated {
            let scores: Vec<f64> = input
                .posts
                .iter()
                .filter(|p| group.accounts.contains(&p.author))
                .filter_map(|p| p.veracity_score)
                .collect();
            if scores.is_empty() {
                continue;
            }
            let avg = scores.iter().sum::<f64>() / scores.len() as f64;
            if avg > self.threshold {
                continue;
            }

            clusters.push(MisinfoCluster::new(
                format!("coord_misinfo_{}", clusters.len()),
                group.accounts.iter().cloned(),
                IndicatorKind::CoordinatedMisinformation,
                (1.0 - avg) * group.confidence,
                ClusterMetrics::CoordinatedMisinformation {
                    avg_veracity: avg,
                    confidence: group.confidence,
                    signals: group.signals.clone(),
                },
            ));
        }

        Ok(clusters)
    }
}
