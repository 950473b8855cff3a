//! Content similarity: different accounts posting near-identical text

use super::tfidf::TfidfVectorizer;
use super::types::{SignalEvidence, SignalGroup, SignalKind};
use super::SignalDetector;
use crate::config::CoordinationConfig;
use crate::dataset::Post;
use crate::error::DetectorError;
use crate::graph::{AccountId, EdgeRecord};
use crate::similarity::{cosine, DisjointSet};
use std::collections::BTreeMap;

/// Links accounts whose posts reach the cosine threshold and reports each
/// transitively linked set of accounts as one group.
#[derive(Debug, Clone)]
pub struct ContentSimilarity {
    threshold: f64,
    min_accounts: usize,
    max_vocabulary: usize,
}

impl ContentSimilarity {
    pub fn from_config(config: &CoordinationConfig) -> Self {
        Self {
            threshold: config.text_similarity_threshold,
            min_accounts: config.min_coordinated_accounts,
            max_vocabulary: config.max_vocabulary,
        }
    }
}

impl SignalDetector for ContentSimilarity {
    fn kind(&self) -> SignalKind {
        SignalKind::Content
    }

    fn detect(&self, posts: &[Post], _edges: &[EdgeRecord]) -> Result<Vec<SignalGroup>, DetectorError> {
        let texts: Vec<(&AccountId, &str)> = posts
            .iter()
            .filter_map(|p| p.text().map(|t| (&p.author, t)))
            .collect();
        if texts.len() < 2 {
            return Err(DetectorError::InsufficientData {
                needed: 2,
                found: texts.len(),
            });
        }

        let docs: Vec<&str> = texts.iter().map(|(_, t)| *t).collect();
        let vectors = TfidfVectorizer::new(self.max_vocabulary).fit_transform(&docs)?;

        // First similarity seen for each account pair
        let mut pair_similarity: BTreeMap<(&AccountId, &AccountId), f64> = BTreeMap::new();
        let mut sets = DisjointSet::new();
        for i in 0..texts.len() {
            for j in (i + 1)..texts.len() {
                let (a, b) = (texts[i].0, texts[j].0);
                if a == b {
                    continue;
                }
                let similarity = cosine(&vectors[i], &vectors[j]);
                if similarity >= self.threshold {
                    let key = if a < b { (a, b) } else { (b, a) };
                    pair_similarity.entry(key).or_insert(similarity);
                    sets.union(a, b);
                }
            }
        }

        let groups = sets
            .groups()
            .into_iter()
            .filter(|members| members.len() >= self.min_accounts)
            .map(|members| {
                let scores: Vec<f64> = pair_similarity
                    .iter()
                    .filter(|((a, _), _)| members.contains(*a))
                    .map(|(_, s)| *s)
                    .collect();
                let avg_similarity = scores.iter().sum::<f64>() / scores.len().max(1) as f64;
                SignalGroup::new(
                    SignalKind::Content,
                    members,
                    SignalEvidence::Content { avg_similarity },
                )
            })
            .collect();

        Ok(groups)
    }
}
