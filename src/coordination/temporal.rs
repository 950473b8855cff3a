//! Temporal synchronization: many accounts posting inside one window

use super::types::{SignalEvidence, SignalGroup, SignalKind};
use super::SignalDetector;
use crate::config::CoordinationConfig;
use crate::dataset::Post;
use crate::error::DetectorError;
use crate::graph::{AccountId, EdgeRecord};
use std::collections::{BTreeMap, BTreeSet};

/// How tightly a set of timestamps clusters, in [0, 1].
///
/// `max(0, 1 - variance / max_variance)` over the population variance.
/// Fewer than two timestamps carry no synchronization.
pub fn sync_score(timestamps: &[i64], max_variance: f64) -> f64 {
    if timestamps.len() < 2 {
        return 0.0;
    }
    let n = timestamps.len() as f64;
    let mean = timestamps.iter().map(|&t| t as f64).sum::<f64>() / n;
    let variance = timestamps
        .iter()
        .map(|&t| {
            let d = t as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (1.0 - variance / max_variance).max(0.0)
}

/// Buckets posts into fixed windows and flags windows where enough distinct
/// accounts posted with low timestamp variance.
#[derive(Debug, Clone)]
pub struct TemporalSynchronization {
    window: i64,
    min_accounts: usize,
    threshold: f64,
    max_variance: f64,
}

impl TemporalSynchronization {
    pub fn from_config(config: &CoordinationConfig) -> Self {
        Self {
            window: config.temporal_window.max(1),
            min_accounts: config.min_coordinated_accounts,
            threshold: config.synchronization_threshold,
            max_variance: config.max_variance_norm,
        }
    }
}

impl SignalDetector for TemporalSynchronization {
    fn kind(&self) -> SignalKind {
        SignalKind::Temporal
    }

    fn detect(&self, posts: &[Post], _edges: &[EdgeRecord]) -> Result<Vec<SignalGroup>, DetectorError> {
        let timed: Vec<(&Post, i64)> = posts
            .iter()
            .filter_map(|p| p.timestamp.map(|ts| (p, ts)))
            .collect();
        if timed.is_empty() && !posts.is_empty() {
            return Err(DetectorError::MissingField("timestamp"));
        }
        if timed.len() < 2 {
            return Err(DetectorError::InsufficientData {
                needed: 2,
                found: timed.len(),
            });
        }

        let mut windows: BTreeMap<i64, Vec<(&Post, i64)>> = BTreeMap::new();
        for (post, ts) in timed {
            windows.entry(ts.div_euclid(self.window)).or_default().push((post, ts));
        }

        let mut groups = Vec::new();
        for (window, members) in windows {
            if members.len() < self.min_accounts {
                continue;
            }
            let accounts: BTreeSet<AccountId> =
                members.iter().map(|(p, _)| p.author.clone()).collect();
            if accounts.len() < self.min_accounts {
                continue;
            }

            let timestamps: Vec<i64> = members.iter().map(|(_, ts)| *ts).collect();
            let score = sync_score(&timestamps, self.max_variance);
            if score >= self.threshold {
                groups.push(SignalGroup::new(
                    SignalKind::Temporal,
                    accounts,
                    SignalEvidence::Temporal {
                        window,
                        sync_score: score,
                        post_count: members.len(),
                    },
                ));
            }
        }

        Ok(groups)
    }
}
