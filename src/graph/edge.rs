//! Raw relation records

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// Relation layer names shipped in the default configuration
pub mod layer {
    pub const FOLLOWER: &str = "follower";
    pub const RETWEET: &str = "retweet";
    pub const MENTION: &str = "mention";
    pub const REPLY: &str = "reply";
    pub const HASHTAG: &str = "hashtag";
}

fn default_weight() -> f64 {
    1.0
}

/// One typed, weighted interaction between two accounts.
///
/// Many records may share a `(source, target)` pair within a layer; their
/// weights add up when the layer graph is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    /// Relation type (e.g., "retweet", "mention")
    #[serde(alias = "layer_name")]
    pub layer: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl EdgeRecord {
    /// Create a record with unit weight and no timestamp
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        layer: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            layer: layer.into(),
            weight: default_weight(),
            timestamp: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
