//! Risk ranking with overlap deduplication

use super::types::MisinfoCluster;
use crate::similarity::jaccard;

/// Sort clusters by risk (highest first) and drop near-duplicates.
///
/// Candidates are folded in risk order. A candidate whose best Jaccard
/// overlap with an accepted cluster exceeds `max_overlap` replaces that
/// cluster only if it scores strictly higher; otherwise it is skipped.
/// No two returned clusters overlap by more than `max_overlap`.
pub fn rank_clusters(mut candidates: Vec<MisinfoCluster>, max_overlap: f64) -> Vec<MisinfoCluster> {
    candidates.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));

    let mut accepted = candidates
        .into_iter()
        .fold(Vec::<MisinfoCluster>::new(), |mut accepted, candidate| {
            let closest = accepted
                .iter()
                .enumerate()
                .map(|(i, existing)| (i, jaccard(&existing.nodes, &candidate.nodes)))
                .max_by(|a, b| a.1.total_cmp(&b.1));

            match closest {
                Some((i, overlap)) if overlap > max_overlap => {
                    if candidate.risk_score > accepted[i].risk_score {
                        accepted[i] = candidate;
                    }
                }
                _ => accepted.push(candidate),
            }
            accepted
        });

    accepted.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    accepted
}
