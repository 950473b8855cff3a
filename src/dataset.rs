//! Typed input records
//!
//! A dataset is an ordered snapshot of posts, relation edges and claims.
//! Input order is preserved: detectors that keep first-seen order (e.g. the
//! representative content id of a post) depend on it.

use crate::error::TangleResult;
use crate::graph::{EdgeRecord, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Normalize a hashtag: trim whitespace, strip `#` markers, lower-case.
///
/// Returns `None` when nothing is left.
pub fn normalize_hashtag(raw: &str) -> Option<String> {
    let tag = raw.trim().trim_matches('#').trim().to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// A timestamped post by one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(alias = "tweet_id")]
    pub id: String,
    #[serde(alias = "user_id", alias = "author_account")]
    pub author: NodeId,
    /// Epoch seconds
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    /// Credibility estimate in [0, 1]; lower is less credible
    #[serde(default)]
    pub veracity_score: Option<f64>,
}

impl Post {
    pub fn new(id: impl Into<String>, author: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            timestamp: None,
            text: None,
            hashtags: Vec::new(),
            urls: Vec::new(),
            veracity_score: None,
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_hashtags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_veracity(mut self, score: f64) -> Self {
        self.veracity_score = Some(score);
        self
    }

    /// Normalized hashtags in first-seen order, duplicates removed.
    pub fn normalized_hashtags(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.hashtags
            .iter()
            .filter_map(|h| normalize_hashtag(h))
            .filter(|h| seen.insert(h.clone()))
            .collect()
    }

    /// Non-empty text, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// A fact-checked claim and the posts that discuss it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub veracity_score: f64,
    #[serde(default)]
    pub post_ids: Vec<String>,
}

/// A fully materialized input snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl Dataset {
    pub fn new(posts: Vec<Post>, edges: Vec<EdgeRecord>) -> Self {
        Self {
            posts,
            edges,
            claims: Vec::new(),
        }
    }

    pub fn with_claims(mut self, claims: Vec<Claim>) -> Self {
        self.claims = claims;
        self
    }

    /// Load a dataset from a JSON file with `posts`, `edges` and `claims` arrays
    pub fn from_path(path: &Path) -> TangleResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Posts with veracity back-filled from claims.
///
/// A post keeps its own score when it has one; otherwise it takes the score
/// of the first claim that references it.
pub fn with_claim_veracity(posts: &[Post], claims: &[Claim]) -> Vec<Post> {
    if claims.is_empty() {
        return posts.to_vec();
    }

    let mut by_post: HashMap<&str, f64> = HashMap::new();
    for claim in claims {
        for post_id in &claim.post_ids {
            by_post.entry(post_id.as_str()).or_insert(claim.veracity_score);
        }
    }

    posts
        .iter()
        .map(|p| {
            let mut post = p.clone();
            if post.veracity_score.is_none() {
                post.veracity_score = by_post.get(post.id.as_str()).copied();
            }
            post
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn normalizes_hashtags() {
        assert_eq!(normalize_hashtag("#Election"), Some("election".to_string()));
        assert_eq!(normalize_hashtag("  ##vote# "), Some("vote".to_string()));
        assert_eq!(normalize_hashtag("#"), None);
        assert_eq!(normalize_hashtag(""), None);
    }

    #[test]
    fn normalized_hashtags_dedupe_in_order() {
        let post = Post::new("p1", "alice").with_hashtags(["#B", "a", "b", "#A", "c"]);
        assert_eq!(post.normalized_hashtags(), vec!["b", "a", "c"]);
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(Post::new("p1", "a").with_text("   ").text(), None);
        assert_eq!(Post::new("p1", "a").with_text("hi").text(), Some("hi"));
    }

    #[test]
    fn post_accepts_source_column_aliases() {
        let json = r#"{"tweet_id": "t1", "user_id": "u1", "timestamp": 42}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, "t1");
        assert_eq!(post.author.as_str(), "u1");
        assert_eq!(post.timestamp, Some(42));
        assert!(post.hashtags.is_empty());
        assert!(post.veracity_score.is_none());
    }

    #[test]
    fn edge_record_defaults_weight() {
        let json = r#"{"source": "a", "target": "b", "layer_name": "retweet"}"#;
        let edge: EdgeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(edge.layer, "retweet");
        assert_eq!(edge.weight, 1.0);
    }

    #[test]
    fn claims_backfill_missing_veracity_only() {
        let posts = vec![
            Post::new("p1", "a"),
            Post::new("p2", "b").with_veracity(0.9),
            Post::new("p3", "c"),
        ];
        let claims = vec![Claim {
            id: "c1".to_string(),
            veracity_score: 0.1,
            post_ids: vec!["p1".to_string(), "p2".to_string()],
        }];

        let filled = with_claim_veracity(&posts, &claims);
        assert_eq!(filled[0].veracity_score, Some(0.1));
        assert_eq!(filled[1].veracity_score, Some(0.9));
        assert_eq!(filled[2].veracity_score, None);
    }

    #[test]
    fn loads_dataset_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"posts": [{{"id": "p1", "author": "a", "text": "hello"}}],
                "edges": [{{"source": "a", "target": "b", "layer": "mention"}}]}}"#
        )
        .unwrap();

        let dataset = Dataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.posts.len(), 1);
        assert_eq!(dataset.edges.len(), 1);
        assert!(dataset.claims.is_empty());
    }
}
