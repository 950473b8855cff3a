//! Rapid spread: one piece of content posted many times very quickly

use super::types::{ClusterMetrics, IndicatorKind, MisinfoCluster};
use super::{ClusterIndicator, IndicatorInput};
use crate::config::MisinfoConfig;
use crate::dataset::{normalize_hashtag, Post};
use crate::error::DetectorError;
use crate::graph::NodeId;
use std::collections::{BTreeMap, BTreeSet};

/// Velocity at which risk saturates, in posts per second
const SATURATING_VELOCITY: f64 = 10.0;

/// The content a post is tracked under: its first URL, else its first hashtag
pub fn content_id(post: &Post) -> Option<String> {
    post.urls
        .iter()
        .map(|u| u.trim())
        .find(|u| !u.is_empty())
        .map(str::to_string)
        .or_else(|| post.hashtags.iter().find_map(|h| normalize_hashtag(h)))
}

#[derive(Debug, Clone)]
pub struct RapidSpread {
    velocity_threshold: f64,
    min_size: usize,
}

impl RapidSpread {
    pub fn from_config(config: &MisinfoConfig) -> Self {
        Self {
            velocity_threshold: config.spread_velocity_threshold,
            min_size: config.cluster_size_threshold,
        }
    }
}

impl ClusterIndicator for RapidSpread {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::RapidSpread
    }

    fn detect(&self, input: &IndicatorInput<'_>) -> Result<Vec<MisinfoCluster>, DetectorError> {
        let mut spreads: BTreeMap<String, Vec<(&NodeId, i64)>> = BTreeMap::new();
        let mut timed = 0;
        for post in input.posts {
            let Some(ts) = post.timestamp else { continue };
            timed += 1;
            if let Some(id) = content_id(post) {
                spreads.entry(id).or_default().push((&post.author, ts));
            }
        }
        if timed == 0 && !input.posts.is_empty() {
            return Err(DetectorError::MissingField("timestamp"));
        }

        let mut clusters = Vec::new();
        for (content, shares) in spreads {
            if shares.len() < self.min_size {
                continue;
            }
            let first = shares.iter().map(|(_, ts)| *ts).min().unwrap_or(0);
            let last = shares.iter().map(|(_, ts)| *ts).max().unwrap_or(0);
            let time_span = last - first;

            // Zero span: every share at once, unbounded velocity
            let velocity = (time_span > 0).then(|| shares.len() as f64 / time_span as f64);
            let (passes, risk) = match velocity {
                Some(v) => (v >= self.velocity_threshold, (v / SATURATING_VELOCITY).min(1.0)),
                None => (true, 1.0),
            };
            if !passes {
                continue;
            }

            let nodes: BTreeSet<NodeId> = shares.iter().map(|(a, _)| (*a).clone()).collect();
            clusters.push(MisinfoCluster::new(
                format!("spread_{}", content),
                nodes,
                IndicatorKind::RapidSpread,
                risk,
                ClusterMetrics::RapidSpread {
                    content_id: content,
                    spread_velocity: velocity,
                    n_shares: shares.len(),
                    time_span,
                },
            ));
        }

        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Partition;

    fn run(posts: &[Post]) -> Vec<MisinfoCluster> {
        RapidSpread::from_config(&MisinfoConfig::default())
            .detect(&IndicatorInput {
                combined: None,
                posts,
                partition: &Partition::new(),
                coordinated: &[],
            })
            .unwrap()
    }

    #[test]
    fn url_takes_precedence_over_hashtag() {
        let post = Post::new("p", "a").with_urls(["http://x"]).with_hashtags(["#Tag"]);
        assert_eq!(content_id(&post).as_deref(), Some("http://x"));
        let post = Post::new("p", "a").with_hashtags(["#Tag"]);
        assert_eq!(content_id(&post).as_deref(), Some("tag"));
        assert_eq!(content_id(&Post::new("p", "a")), None);
    }

    #[test]
    fn fast_burst_is_flagged() {
        // 5 shares over 4 seconds: velocity 1.25
        let posts: Vec<Post> = (0..5)
            .map(|i| Post::new(format!("p{}", i), format!("u{}", i % 4)).at(i).with_urls(["u"]))
            .collect();

        let clusters = run(&posts);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, "spread_u");
        assert_eq!(clusters[0].n_nodes(), 4);
        assert!((clusters[0].risk_score - 0.125).abs() < 1e-12);
    }

    #[test]
    fn simultaneous_shares_have_unbounded_velocity() {
        let posts: Vec<Post> = (0..5)
            .map(|i| Post::new(format!("p{}", i), format!("u{}", i)).at(42).with_hashtags(["x"]))
            .collect();

        let clusters = run(&posts);
        assert_eq!(clusters[0].risk_score, 1.0);
        assert!(matches!(
            clusters[0].metrics,
            ClusterMetrics::RapidSpread { spread_velocity: None, time_span: 0, .. }
        ));
    }

    #[test]
    fn slow_spread_is_ignored() {
        let posts: Vec<Post> = (0..5)
            .map(|i| Post::new(format!("p{}", i), "a").at(i * 100).with_urls(["u"]))
            .collect();
        assert!(run(&posts).is_empty());
    }
}
