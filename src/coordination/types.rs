//! Signal groups, coordinated groups and the coordination report

use crate::graph::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The five behavioural coordination signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Temporal,
    Content,
    Hashtag,
    Url,
    Structural,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::Temporal,
        SignalKind::Content,
        SignalKind::Hashtag,
        SignalKind::Url,
        SignalKind::Structural,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::Temporal => "temporal",
            SignalKind::Content => "content",
            SignalKind::Hashtag => "hashtag",
            SignalKind::Url => "url",
            SignalKind::Structural => "structural",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of signal types; the denominator of fused confidence
pub const SIGNAL_COUNT: usize = SignalKind::ALL.len();

/// Signal-specific metrics attached to a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalEvidence {
    Temporal {
        /// Bucket index: `timestamp / window`
        window: i64,
        sync_score: f64,
        post_count: usize,
    },
    Content {
        avg_similarity: f64,
    },
    Hashtag {
        avg_jaccard: f64,
        /// Windows in which member pairs overlapped
        windows: Vec<i64>,
    },
    Url {
        url: String,
        share_count: usize,
        /// Seconds between the first and last share
        time_span: i64,
    },
    Structural {
        center: AccountId,
        in_degree: usize,
        out_degree: usize,
    },
}

/// Accounts flagged together by one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalGroup {
    pub signal: SignalKind,
    pub accounts: BTreeSet<AccountId>,
    pub evidence: SignalEvidence,
}

impl SignalGroup {
    pub fn new(
        signal: SignalKind,
        accounts: impl IntoIterator<Item = AccountId>,
        evidence: SignalEvidence,
    ) -> Self {
        Self {
            signal,
            accounts: accounts.into_iter().collect(),
            evidence,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Accounts flagged by at least two distinct signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatedGroup {
    pub accounts: BTreeSet<AccountId>,
    pub signals: BTreeSet<SignalKind>,
    /// `signals.len() / SIGNAL_COUNT`
    pub confidence: f64,
}

impl CoordinatedGroup {
    pub fn new(accounts: BTreeSet<AccountId>, signals: BTreeSet<SignalKind>) -> Self {
        let confidence = signals.len() as f64 / SIGNAL_COUNT as f64;
        Self {
            accounts,
            signals,
            confidence,
        }
    }

    pub fn n_signals(&self) -> usize {
        self.signals.len()
    }
}

/// Output of `detect_coordinated_accounts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinationReport {
    pub coordinated_groups: Vec<CoordinatedGroup>,
    pub n_groups: usize,
    /// Distinct accounts across all coordinated groups
    pub n_accounts: usize,
    /// Group count per signal name
    pub signals: BTreeMap<String, usize>,
    pub signal_groups: Vec<SignalGroup>,
    /// Signals that produced nothing, with the reason
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub degraded: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_signal_fraction() {
        let group = CoordinatedGroup::new(
            ["a".into(), "b".into()].into_iter().collect(),
            [SignalKind::Temporal, SignalKind::Content].into_iter().collect(),
        );
        assert!((group.confidence - 0.4).abs() < 1e-12);
        assert_eq!(group.n_signals(), 2);
    }

    #[test]
    fn signal_kind_names() {
        let names: Vec<&str> = SignalKind::ALL.iter().map(SignalKind::name).collect();
        assert_eq!(names, ["temporal", "content", "hashtag", "url", "structural"]);
        assert_eq!(serde_json::to_string(&SignalKind::Url).unwrap(), "\"url\"");
    }

    #[test]
    fn evidence_serializes_tagged_by_signal() {
        let group = SignalGroup::new(
            SignalKind::Content,
            ["a".into()],
            SignalEvidence::Content { avg_similarity: 0.95 },
        );
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["signal"], "content");
        assert_eq!(json["evidence"]["content"]["avg_similarity"], 0.95);
    }
}
