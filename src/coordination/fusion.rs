//! Fusion of independent signal groups into coordinated groups

use super::types::{CoordinatedGroup, SignalGroup, SignalKind};
use crate::graph::AccountId;
use std::collections::{BTreeMap, BTreeSet};

/// Fuse signal groups into coordinated groups.
///
/// An account is high-confidence when groups from at least
/// `max(2, min_interactions)` distinct signals contain it. Seeds are taken
/// in account-id order; each unclaimed seed gathers the accounts of every
/// group it belongs to, keeps only the high-confidence ones, and is accepted
/// when at least `min_accounts` remain. Accepted members are claimed and
/// never seed or join a later group.
pub fn fuse_signals(
    signal_groups: &[SignalGroup],
    min_interactions: usize,
    min_accounts: usize,
) -> Vec<CoordinatedGroup> {
    let mut index: BTreeMap<&AccountId, Vec<&SignalGroup>> = BTreeMap::new();
    for group in signal_groups {
        for account in &group.accounts {
            index.entry(account).or_default().push(group);
        }
    }

    let required = min_interactions.max(2);
    let high_confidence: BTreeSet<&AccountId> = index
        .iter()
        .filter(|(_, groups)| {
            groups.iter().map(|g| g.signal).collect::<BTreeSet<_>>().len() >= required
        })
        .map(|(account, _)| *account)
        .collect();

    let mut claimed: BTreeSet<&AccountId> = BTreeSet::new();
    let mut fused = Vec::new();

    for seed in &high_confidence {
        if claimed.contains(seed) {
            continue;
        }
        let entries = &index[seed];

        let signals: BTreeSet<SignalKind> = entries.iter().map(|g| g.signal).collect();
        let members: BTreeSet<&AccountId> = entries
            .iter()
            .flat_map(|g| g.accounts.iter())
            .filter(|a| high_confidence.contains(a) && !claimed.contains(a))
            .collect();

        if members.len() < min_accounts {
            continue;
        }
        claimed.extend(members.iter().copied());
        fused.push(CoordinatedGroup::new(
            members.into_iter().cloned().collect(),
            signals,
        ));
    }

    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::SignalEvidence;

    fn group(signal: SignalKind, accounts: &[&str]) -> SignalGroup {
        SignalGroup::new(
            signal,
            accounts.iter().map(|&a| a.into()),
            SignalEvidence::Content { avg_similarity: 1.0 },
        )
    }

    #[test]
    fn single_signal_accounts_are_not_fused() {
        let groups = vec![group(SignalKind::Temporal, &["a", "b", "c"])];
        assert!(fuse_signals(&groups, 2, 3).is_empty());
    }

    #[test]
    fn two_signals_yield_forty_percent_confidence() {
        let groups = vec![
            group(SignalKind::Temporal, &["a", "b", "c", "d"]),
            group(SignalKind::Content, &["a", "b", "c", "d"]),
        ];
        let fused = fuse_signals(&groups, 2, 3);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].accounts.len(), 4);
        assert!((fused[0].confidence - 0.4).abs() < 1e-12);
    }

    #[test]
    fn two_groups_of_one_signal_do_not_qualify() {
        let groups = vec![
            group(SignalKind::Url, &["a", "b", "c"]),
            group(SignalKind::Url, &["a", "b", "c"]),
        ];
        assert!(fuse_signals(&groups, 2, 3).is_empty());
    }

    #[test]
    fn members_seen_by_one_signal_are_excluded() {
        let groups = vec![
            group(SignalKind::Temporal, &["a", "b", "c", "x"]),
            group(SignalKind::Structural, &["a", "b", "c", "y"]),
        ];
        let fused = fuse_signals(&groups, 2, 3);
        let accounts: Vec<&str> = fused[0].accounts.iter().map(|a| a.as_str()).collect();
        assert_eq!(accounts, ["a", "b", "c"]);
    }

    #[test]
    fn claimed_accounts_do_not_seed_again() {
        let groups = vec![
            group(SignalKind::Temporal, &["a", "b", "c"]),
            group(SignalKind::Content, &["a", "b", "c"]),
            group(SignalKind::Hashtag, &["c", "d", "e"]),
            group(SignalKind::Url, &["c", "d", "e"]),
        ];
        let fused = fuse_signals(&groups, 2, 3);
        // seed a claims a, b, c; seed d then finds only d and e unclaimed
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].signals.len(), 2);
    }

    #[test]
    fn min_interactions_raises_the_bar() {
        let groups = vec![
            group(SignalKind::Temporal, &["a", "b", "c"]),
            group(SignalKind::Content, &["a", "b", "c"]),
        ];
        assert!(fuse_signals(&groups, 3, 3).is_empty());
    }
}
