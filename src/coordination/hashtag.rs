//! Hashtag coordination: accounts using overlapping hashtag sets in the
//! same time window

use super::types::{SignalEvidence, SignalGroup, SignalKind};
use super::SignalDetector;
use crate::config::CoordinationConfig;
use crate::dataset::Post;
use crate::error::DetectorError;
use crate::graph::{AccountId, EdgeRecord};
use crate::similarity::{jaccard, DisjointSet};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct HashtagCoordination {
    window: i64,
    threshold: f64,
    min_accounts: usize,
}

impl HashtagCoordination {
    pub fn from_config(config: &CoordinationConfig) -> Self {
        Self {
            window: config.temporal_window.max(1),
            threshold: config.hashtag_jaccard_threshold,
            min_accounts: config.min_coordinated_accounts,
        }
    }
}

/// A qualifying account pair and where it was seen
struct Overlap<'a> {
    first: &'a AccountId,
    jaccard: f64,
    window: i64,
}

impl SignalDetector for HashtagCoordination {
    fn kind(&self) -> SignalKind {
        SignalKind::Hashtag
    }

    fn detect(&self, posts: &[Post], _edges: &[EdgeRecord]) -> Result<Vec<SignalGroup>, DetectorError> {
        let tagged: Vec<(&Post, Vec<String>, i64)> = posts
            .iter()
            .filter_map(|p| {
                let tags = p.normalized_hashtags();
                match (tags.is_empty(), p.timestamp) {
                    (false, Some(ts)) => Some((p, tags, ts)),
                    _ => None,
                }
            })
            .collect();
        if tagged.len() < 2 {
            return Err(DetectorError::InsufficientData {
                needed: 2,
                found: tagged.len(),
            });
        }

        let mut windows: BTreeMap<i64, Vec<(&Post, &[String])>> = BTreeMap::new();
        for (post, tags, ts) in &tagged {
            windows
                .entry(ts.div_euclid(self.window))
                .or_default()
                .push((*post, tags.as_slice()));
        }

        // One disjoint-set across all windows: a pair overlapping in any
        // window links its accounts.
        let mut sets = DisjointSet::new();
        let mut overlaps: Vec<Overlap> = Vec::new();

        for (window, members) in &windows {
            if members.len() < self.min_accounts {
                continue;
            }

            let mut account_tags: BTreeMap<&AccountId, BTreeSet<&str>> = BTreeMap::new();
            for (post, tags) in members {
                account_tags
                    .entry(&post.author)
                    .or_default()
                    .extend(tags.iter().map(String::as_str));
            }

            let accounts: Vec<(&AccountId, &BTreeSet<&str>)> =
                account_tags.iter().map(|(a, t)| (*a, t)).collect();
            for i in 0..accounts.len() {
                for j in (i + 1)..accounts.len() {
                    let similarity = jaccard(accounts[i].1, accounts[j].1);
                    if similarity >= self.threshold {
                        sets.union(accounts[i].0, accounts[j].0);
                        overlaps.push(Overlap {
                            first: accounts[i].0,
                            jaccard: similarity,
                            window: *window,
                        });
                    }
                }
            }
        }

        let groups = sets
            .groups()
            .into_iter()
            .filter(|members| members.len() >= self.min_accounts)
            .map(|members| {
                let mine: Vec<&Overlap> =
                    overlaps.iter().filter(|o| members.contains(o.first)).collect();
                let avg_jaccard =
                    mine.iter().map(|o| o.jaccard).sum::<f64>() / mine.len().max(1) as f64;
                let windows: BTreeSet<i64> = mine.iter().map(|o| o.window).collect();
                SignalGroup::new(
                    SignalKind::Hashtag,
                    members,
                    SignalEvidence::Hashtag {
                        avg_jaccard,
                        windows: windows.into_iter().collect(),
                    },
                )
            })
            .collect();

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> HashtagCoordination {
        HashtagCoordination::from_config(&CoordinationConfig::default())
    }

    fn post(id: &str, author: &str, ts: i64, tags: &[&str]) -> Post {
        Post::new(id, author).at(ts).with_hashtags(tags.iter().copied())
    }

    #[test]
    fn shared_hashtag_burst_groups_accounts() {
        let posts = vec![
            post("p1", "a", 10, &["#StopTheCount", "#fraud"]),
            post("p2", "b", 11, &["stopthecount", "Fraud"]),
            post("p3", "c", 12, &["#fraud", "#stopthecount"]),
            post("p4", "d", 13, &["#gardening"]),
        ];

        let groups = detector().detect(&posts, &[]).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
        assert!(!groups[0].accounts.contains(&AccountId::from("d")));
        match &groups[0].evidence {
            SignalEvidence::Hashtag { avg_jaccard, windows } => {
                assert_eq!(*avg_jaccard, 1.0);
                assert_eq!(windows, &vec![2]);
            }
            other => panic!("unexpected evidence {:?}", other),
        }
    }

    #[test]
    fn pairs_from_different_windows_link_through_shared_account() {
        let posts = vec![
            post("p1", "a", 0, &["x"]),
            post("p2", "b", 1, &["x"]),
            post("p3", "z", 2, &["other"]),
            post("p4", "b", 100, &["y"]),
            post("p5", "c", 101, &["y"]),
            post("p6", "z", 102, &["else"]),
        ];

        let groups = detector().detect(&posts, &[]).unwrap();
        assert_eq!(groups.len(), 1);
        let accounts: Vec<&str> = groups[0].accounts.iter().map(|a| a.as_str()).collect();
        assert_eq!(accounts, ["a", "b", "c"]);
    }

    #[test]
    fn untimed_tags_are_unusable() {
        let posts = vec![
            Post::new("p1", "a").with_hashtags(["x"]),
            Post::new("p2", "b").with_hashtags(["x"]),
        ];
        assert!(matches!(
            detector().detect(&posts, &[]),
            Err(DetectorError::InsufficientData { found: 0, .. })
        ));
    }
}
