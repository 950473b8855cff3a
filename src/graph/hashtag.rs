//! Hashtag co-occurrence layer
//!
//! Two hashtags co-occur when one post uses both. Pairs are canonical
//! (`a < b`), never self-pairs, and their count becomes the undirected
//! edge weight once it meets the layer threshold.

use super::edge::layer;
use super::layer_graph::LayerGraph;
use super::node::NodeId;
use crate::dataset::Post;
use std::collections::BTreeMap;

/// Count co-occurring hashtag pairs across posts.
///
/// Hashtags are normalized and deduplicated per post first, so a post
/// repeating a tag never yields a self-pair.
pub fn cooccurrence_pairs(posts: &[Post]) -> BTreeMap<(String, String), usize> {
    let mut pair_counts: BTreeMap<(String, String), usize> = BTreeMap::new();

    for post in posts {
        let tags = post.normalized_hashtags();
        if tags.len() < 2 {
            continue;
        }
        for i in 0..tags.len() {
            for j in (i + 1)..tags.len() {
                let (a, b) = if tags[i] <= tags[j] {
                    (tags[i].clone(), tags[j].clone())
                } else {
                    (tags[j].clone(), tags[i].clone())
                };
                *pair_counts.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    pair_counts
}

/// Build the undirected co-occurrence layer from posts.
///
/// Pairs whose count is at least `threshold` become edges weighted by
/// that count.
pub fn build_cooccurrence_layer(posts: &[Post], threshold: f64) -> LayerGraph {
    let mut graph = LayerGraph::new(layer::HASHTAG, false);

    for ((a, b), count) in cooccurrence_pairs(posts) {
        let weight = count as f64;
        if weight >= threshold {
            graph.add_weight(&NodeId::from(a), &NodeId::from(b), weight);
        }
    }

    graph
}
