//! Bot-like clusters: connected accounts with star-shaped, repetitive,
//! high-volume activity

use super::types::{ClusterMetrics, IndicatorKind, MisinfoCluster};
use super::{ClusterIndicator, IndicatorInput};
use crate::config::MisinfoConfig;
use crate::dataset::normalize_hashtag;
use crate::error::DetectorError;
use crate::graph::NodeId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Bot likelihood of one account, in [0, 1].
///
/// `(star / 10) × (1 − diversity) × min(1, posts / 100)` where
/// `star = in / (out + 1)` (raw in-degree when out is zero) and
/// `diversity = distinct_tags / (total_tags + 1)`.
pub fn bot_score(
    in_degree: usize,
    out_degree: usize,
    distinct_tags: usize,
    total_tags: usize,
    posts: usize,
) -> f64 {
    let star = if out_degree > 0 {
        in_degree as f64 / (out_degree + 1) as f64
    } else {
        in_degree as f64
    };
    let diversity = distinct_tags as f64 / (total_tags + 1) as f64;
    let activity = (posts as f64 / 100.0).min(1.0);
    ((star / 10.0) * (1.0 - diversity) * activity).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct BotLike {
    threshold: f64,
    min_size: usize,
}

impl BotLike {
    pub fn from_config(config: &MisinfoConfig) -> Self {
        Self {
            threshold: config.bot_score_threshold,
            min_size: config.cluster_size_threshold,
        }
    }
}

#[derive(Default)]
struct Activity {
    posts: usize,
    tags: Vec<String>,
}

impl ClusterIndicator for BotLike {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::BotLike
    }

    fn detect(&self, input: &IndicatorInput<'_>) -> Result<Vec<MisinfoCluster>, DetectorError> {
        let graph = input
            .combined
            .ok_or(DetectorError::MissingField("combined graph"))?;

        let mut activity: HashMap<&NodeId, Activity> = HashMap::new();
        for post in input.posts {
            let entry = activity.entry(&post.author).or_default();
            entry.posts += 1;
            entry
                .tags
                .extend(post.hashtags.iter().filter_map(|h| normalize_hashtag(h)));
        }

        let scores: BTreeMap<&NodeId, f64> = graph
            .nodes()
            .filter_map(|node| {
                let a = activity.get(node)?;
                let distinct = a.tags.iter().collect::<BTreeSet<_>>().len();
                let score = bot_score(
                    graph.in_degree(node),
                    graph.out_degree(node),
                    distinct,
                    a.tags.len(),
                    a.posts,
                );
                Some((node, score))
            })
            .collect();

        let suspects: BTreeSet<NodeId> = scores
            .iter()
            .filter(|(_, s)| **s >= self.threshold)
            .map(|(n, _)| (*n).clone())
            .collect();
        if suspects.len() < self.min_size {
            return Ok(Vec::new());
        }

        let clusters = graph
            .weak_components_within(&suspects)
            .into_iter()
            .enumerate()
            .filter(|(_, component)| component.len() >= self.min_size)
            .map(|(idx, component)| {
                let avg = component.iter().map(|n| scores[n]).sum::<f64>() / component.len() as f64;
                MisinfoCluster::new(
                    format!("bot_{}", idx),
                    component,
                    IndicatorKind::BotLike,
                    avg,
                    ClusterMetrics::BotLike { avg_bot_score: avg },
                )
            })
            .collect();

        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Post;
    use crate::graph::{LayerGraph, Partition};

    #[test]
    fn score_components() {
        // star 100/1 = 100 → 10, no tags → diversity 0, 100 posts → activity 1
        assert_eq!(bot_score(100, 0, 0, 0, 100), 1.0);
        // 20 / (1 + 1) = 10 → 1.0 × (1 − 1/11) × 0.5
        let s = bot_score(20, 1, 1, 10, 50);
        assert!((s - (10.0 / 11.0) * 0.5).abs() < 1e-12);
        assert_eq!(bot_score(0, 0, 0, 0, 500), 0.0);
    }

    #[test]
    fn connected_bots_form_a_cluster() {
        // five bots in a chain, each followed by 20 distinct fans
        let mut graph = LayerGraph::new("combined", true);
        let bots: Vec<NodeId> = (0..5).map(|i| format!("bot{}", i).into()).collect();
        for (i, bot) in bots.iter().enumerate() {
            for f in 0..20 {
                graph.add_weight(&format!("fan{}_{}", i, f).into(), bot, 1.0);
            }
            if i > 0 {
                graph.add_weight(&bots[i - 1], bot, 1.0);
            }
        }

        let posts: Vec<Post> = bots
            .iter()
            .flat_map(|b| {
                (0..100).map(move |k| Post::new(format!("{}-{}", b, k), b.clone()).with_hashtags(["same"]))
            })
            .collect();

        let clusters = BotLike::from_config(&MisinfoConfig::default())
            .detect(&IndicatorInput {
                combined: Some(&graph),
                posts: &posts,
                partition: &Partition::new(),
                coordinated: &[],
            })
            .unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].n_nodes(), 5);
        assert!(clusters[0].risk_score >= 0.7);
    }
}
