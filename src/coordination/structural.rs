//! Structural pattern: star-shaped hubs in the raw relation edges

use super::types::{SignalEvidence, SignalGroup, SignalKind};
use super::SignalDetector;
use crate::config::CoordinationConfig;
use crate::dataset::Post;
use crate::error::DetectorError;
use crate::graph::{AccountId, EdgeRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Flags nodes that receive many edges but emit few.
///
/// Degrees count raw edge records across all layers, so repeated
/// interactions from one predecessor add to the hub's in-degree while the
/// predecessor itself is counted once.
#[derive(Debug, Clone)]
pub struct StructuralPattern {
    min_in_degree: usize,
    max_out_degree: usize,
    min_accounts: usize,
}

impl StructuralPattern {
    pub fn from_config(config: &CoordinationConfig) -> Self {
        Self {
            min_in_degree: config.hub_min_in_degree,
            max_out_degree: config.hub_max_out_degree,
            min_accounts: config.min_coordinated_accounts,
        }
    }
}

#[derive(Default)]
struct Degree<'a> {
    incoming: usize,
    outgoing: usize,
    predecessors: BTreeSet<&'a AccountId>,
}

impl SignalDetector for StructuralPattern {
    fn kind(&self) -> SignalKind {
        SignalKind::Structural
    }

    fn detect(&self, _posts: &[Post], edges: &[EdgeRecord]) -> Result<Vec<SignalGroup>, DetectorError> {
        if edges.is_empty() {
            return Err(DetectorError::InsufficientData { needed: 1, found: 0 });
        }

        let mut degrees: BTreeMap<&AccountId, Degree> = BTreeMap::new();
        for edge in edges {
            degrees.entry(&edge.source).or_default().outgoing += 1;
            let target = degrees.entry(&edge.target).or_default();
            target.incoming += 1;
            target.predecessors.insert(&edge.source);
        }

        let groups = degrees
            .into_iter()
            .filter(|(_, d)| {
                d.incoming > self.min_in_degree
                    && d.outgoing < self.max_out_degree
                    && d.predecessors.len() >= self.min_accounts
            })
            .map(|(hub, d)| {
                let accounts = d
                    .predecessors
                    .into_iter()
                    .chain(std::iter::once(hub))
                    .cloned();
                SignalGroup::new(
                    SignalKind::Structural,
                    accounts,
                    SignalEvidence::Structural {
                        center: hub.clone(),
                        in_degree: d.incoming,
                        out_degree: d.outgoing,
                    },
                )
            })
            .collect();

        Ok(groups)
    }
}
