//! URL sharing: one link pushed by many accounts in a short burst

use super::types::{SignalEvidence, SignalGroup, SignalKind};
use super::SignalDetector;
use crate::config::CoordinationConfig;
use crate::dataset::Post;
use crate::error::DetectorError;
use crate::graph::{AccountId, EdgeRecord};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct UrlSharing {
    min_accounts: usize,
    burst_window: i64,
}

impl UrlSharing {
    pub fn from_config(config: &CoordinationConfig) -> Self {
        Self {
            min_accounts: config.min_coordinated_accounts,
            burst_window: config.url_burst_window,
        }
    }
}

impl SignalDetector for UrlSharing {
    fn kind(&self) -> SignalKind {
        SignalKind::Url
    }

    fn detect(&self, posts: &[Post], _edges: &[EdgeRecord]) -> Result<Vec<SignalGroup>, DetectorError> {
        let mut shares: BTreeMap<&str, Vec<&Post>> = BTreeMap::new();
        let mut with_urls = 0;
        for post in posts {
            let urls: BTreeSet<&str> = post
                .urls
                .iter()
                .map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .collect();
            if urls.is_empty() {
                continue;
            }
            with_urls += 1;
            for url in urls {
                shares.entry(url).or_default().push(post);
            }
        }
        if with_urls < 2 {
            return Err(DetectorError::InsufficientData {
                needed: 2,
                found: with_urls,
            });
        }

        let mut seen: BTreeSet<BTreeSet<AccountId>> = BTreeSet::new();
        let mut groups = Vec::new();

        for (url, sharing) in shares {
            if sharing.len() < self.min_accounts {
                continue;
            }
            let accounts: BTreeSet<AccountId> = sharing.iter().map(|p| p.author.clone()).collect();
            if accounts.len() < self.min_accounts {
                continue;
            }

            let timestamps: Vec<i64> = sharing.iter().filter_map(|p| p.timestamp).collect();
            let (Some(first), Some(last)) = (timestamps.iter().min(), timestamps.iter().max()) else {
                continue;
            };
            let time_span = last - first;
            if timestamps.len() < 2 || time_span >= self.burst_window {
                continue;
            }

            if seen.insert(accounts.clone()) {
                groups.push(SignalGroup::new(
                    SignalKind::Url,
                    accounts,
                    SignalEvidence::Url {
                        url: url.to_string(),
                        share_count: sharing.len(),
                        time_span,
                    },
                ));
            }
        }

        Ok(groups)
    }
}
