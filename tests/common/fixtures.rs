//! Scenario fixtures
//!
//! Each builder returns plain records; tests feed them through the public
//! engines.

use std::collections::BTreeSet;
use tangle::misinfo::{ClusterMetrics, IndicatorKind};
use tangle::{EdgeRecord, MisinfoCluster, NodeId, Partition, Post};

/// Account ids in a set, for order-free assertions
pub fn account_names(accounts: &BTreeSet<NodeId>) -> Vec<&str> {
    accounts.iter().map(NodeId::as_str).collect()
}

/// Four accounts post the same text within one 5-second window
pub fn synchronized_copy_posts() -> Vec<Post> {
    ["alice", "bob", "carol", "dave"]
        .iter()
        .enumerate()
        .map(|(i, author)| {
            Post::new(format!("copy-{}", i), *author)
                .at(1_000 + i as i64)
                .with_text("Polling stations moved tonight, share before they delete this")
        })
        .collect()
}

/// One community of ten accounts, every post scoring 0.2 veracity
pub fn low_veracity_community() -> (Vec<Post>, Partition) {
    let accounts: Vec<String> = (0..10).map(|i| format!("member{}", i)).collect();
    let posts = accounts
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Post::new(format!("claim-post-{}", i), a.as_str())
                .at(i as i64 * 10_000)
                .with_veracity(0.2)
        })
        .collect();
    let partition = Partition::from_assignments(accounts.iter().map(|a| (a.as_str(), 7u64)));
    (posts, partition)
}

/// Five accounts share one URL, 150 seconds apart
pub fn rapid_url_shares() -> Vec<Post> {
    (0..5)
        .map(|i| {
            Post::new(format!("share-{}", i), format!("sharer{}", i))
                .at(50_000 + i as i64 * 150)
                .with_urls(["https://news.example/leak"])
        })
        .collect()
}

/// A hub with 12 predecessors, in-degree 15 and out-degree 1
pub fn star_edges() -> Vec<EdgeRecord> {
    let mut edges: Vec<EdgeRecord> = (0..12)
        .map(|i| EdgeRecord::new(format!("fan{:02}", i), "hub", "retweet"))
        .collect();
    edges.extend((0..3).map(|i| EdgeRecord::new(format!("fan{:02}", i), "hub", "mention")));
    edges.push(EdgeRecord::new("hub", "fan00", "reply"));
    edges
}

/// Posts spread far apart in time, with unrelated text
pub fn scattered_posts(n: usize) -> Vec<Post> {
    (0..n)
        .map(|i| {
            Post::new(format!("noise-{}", i), format!("user{}", i))
                .at(i as i64 * 7_919)
                .with_text(format!("topic{} unrelated musings number{}", i, i))
        })
        .collect()
}

/// A cluster over nodes `n{start}..n{end}` with the given risk
pub fn cluster(id: &str, nodes: std::ops::Range<usize>, risk: f64) -> MisinfoCluster {
    MisinfoCluster::new(
        id,
        nodes.map(|i| NodeId::from(format!("n{}", i))),
        IndicatorKind::StructuralAnomaly,
        risk,
        ClusterMetrics::BotLike { avg_bot_score: risk },
    )
}
