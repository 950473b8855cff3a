//! Coordinated-behaviour detection
//!
//! Five independent [`SignalDetector`]s each score one behaviour over the
//! posts and raw relation edges. Their groups are then fused into
//! [`CoordinatedGroup`]s: accounts that at least two signals agree on.
//!
//! A detector that cannot run (no timestamps, no text, no edges) degrades
//! to an empty result; the reason is logged and kept in
//! [`CoordinationReport::degraded`].

mod content;
mod fusion;
mod hashtag;
mod structural;
mod temporal;
mod tfidf;
mod types;
mod url;

pub use content::ContentSimilarity;
pub use fusion::fuse_signals;
pub use hashtag::HashtagCoordination;
pub use structural::StructuralPattern;
pub use temporal::{sync_score, TemporalSynchronization};
pub use tfidf::TfidfVectorizer;
pub use types::{
    CoordinatedGroup, CoordinationReport, SignalEvidence, SignalGroup, SignalKind, SIGNAL_COUNT,
};
pub use url::UrlSharing;

use crate::config::CoordinationConfig;
use crate::dataset::Post;
use crate::error::DetectorError;
use crate::graph::EdgeRecord;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// One coordination heuristic.
///
/// Detectors see the whole batch and never each other's output. Returning
/// `Err` is not fatal: the engine records the reason and treats the signal
/// as having found nothing.
pub trait SignalDetector: Send + Sync {
    /// Which signal this detector produces; also its registry key
    fn kind(&self) -> SignalKind;

    fn detect(&self, posts: &[Post], edges: &[EdgeRecord])
        -> Result<Vec<SignalGroup>, DetectorError>;
}

/// The five built-in detectors, configured from `config`
pub fn default_detectors(config: &CoordinationConfig) -> Vec<Box<dyn SignalDetector>> {
    vec![
        Box::new(TemporalSynchronization::from_config(config)),
        Box::new(ContentSimilarity::from_config(config)),
        Box::new(HashtagCoordination::from_config(config)),
        Box::new(UrlSharing::from_config(config)),
        Box::new(StructuralPattern::from_config(config)),
    ]
}

/// Runs every registered detector and fuses their groups
pub struct CoordinationSignalEngine {
    config: CoordinationConfig,
    detectors: Vec<Box<dyn SignalDetector>>,
}

impl CoordinationSignalEngine {
    pub fn new(config: CoordinationConfig) -> Self {
        let detectors = default_detectors(&config);
        Self { config, detectors }
    }

    /// Engine with a custom detector set, deduplicated by kind (first wins)
    pub fn with_detectors(
        config: CoordinationConfig,
        detectors: Vec<Box<dyn SignalDetector>>,
    ) -> Self {
        let mut seen = HashSet::new();
        let detectors = detectors
            .into_iter()
            .filter(|d| seen.insert(d.kind()))
            .collect();
        Self { config, detectors }
    }

    pub fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    pub fn detectors(&self) -> &[Box<dyn SignalDetector>] {
        &self.detectors
    }

    pub fn detect_coordinated_accounts(
        &self,
        posts: &[Post],
        edges: &[EdgeRecord],
    ) -> CoordinationReport {
        info!(
            posts = posts.len(),
            edges = edges.len(),
            "Detecting coordinated accounts"
        );

        let mut signals: BTreeMap<String, usize> = SignalKind::ALL
            .iter()
            .map(|k| (k.name().to_string(), 0))
            .collect();
        let mut degraded = BTreeMap::new();
        let mut signal_groups = Vec::new();

        for detector in &self.detectors {
            let kind = detector.kind();
            match detector.detect(posts, edges) {
                Ok(groups) => {
                    debug!(signal = %kind, groups = groups.len(), "Signal evaluated");
                    signals.insert(kind.name().to_string(), groups.len());
                    signal_groups.extend(groups);
                }
                Err(e) => {
                    warn!(signal = %kind, error = %e, "Signal degraded to empty result");
                    degraded.insert(kind.name().to_string(), e.to_string());
                }
            }
        }

        let coordinated_groups = fuse_signals(
            &signal_groups,
            self.config.min_interactions,
            self.config.min_coordinated_accounts,
        );

        let n_accounts = coordinated_groups
            .iter()
            .flat_map(|g| g.accounts.iter())
            .collect::<BTreeSet<_>>()
            .len();

        info!(
            groups = coordinated_groups.len(),
            accounts = n_accounts,
            "Coordination detection complete"
        );

        CoordinationReport {
            n_groups: coordinated_groups.len(),
            n_accounts,
            coordinated_groups,
            signals,
            signal_groups,
            degraded,
        }
    }
}

impl Default for CoordinationSignalEngine {
    fn default() -> Self {
        Self::new(CoordinationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        kind: SignalKind,
        accounts: Vec<&'static str>,
    }

    impl SignalDetector for Fixed {
        fn kind(&self) -> SignalKind {
            self.kind
        }
        fn detect(&self, _: &[Post], _: &[EdgeRecord]) -> Result<Vec<SignalGroup>, DetectorError> {
            Ok(vec![SignalGroup::new(
                self.kind,
                self.accounts.iter().map(|&a| a.into()),
                SignalEvidence::Content { avg_similarity: 1.0 },
            )])
        }
    }

    struct Failing;

    impl SignalDetector for Failing {
        fn kind(&self) -> SignalKind {
            SignalKind::Url
        }
        fn detect(&self, _: &[Post], _: &[EdgeRecord]) -> Result<Vec<SignalGroup>, DetectorError> {
            Err(DetectorError::MissingField("urls"))
        }
    }

    #[test]
    fn registry_deduplicates_by_kind() {
        let engine = CoordinationSignalEngine::with_detectors(
            CoordinationConfig::default(),
            vec![
                Box::new(Fixed { kind: SignalKind::Temporal, accounts: vec!["a"] }),
                Box::new(Fixed { kind: SignalKind::Temporal, accounts: vec!["b"] }),
                Box::new(Failing),
            ],
        );
        assert_eq!(engine.detectors().len(), 2);
    }

    #[test]
    fn default_engine_registers_all_signals() {
        let engine = CoordinationSignalEngine::default();
        let kinds: Vec<SignalKind> = engine.detectors().iter().map(|d| d.kind()).collect();
        assert_eq!(kinds, SignalKind::ALL);
    }

    #[test]
    fn fuses_agreeing_signals_and_records_degradation() {
        let engine = CoordinationSignalEngine::with_detectors(
            CoordinationConfig::default(),
            vec![
                Box::new(Fixed { kind: SignalKind::Temporal, accounts: vec!["a", "b", "c"] }),
                Box::new(Fixed { kind: SignalKind::Content, accounts: vec!["a", "b", "c"] }),
                Box::new(Failing),
            ],
        );

        let report = engine.detect_coordinated_accounts(&[], &[]);
        assert_eq!(report.n_groups, 1);
        assert_eq!(report.n_accounts, 3);
        assert_eq!(report.signals["temporal"], 1);
        assert_eq!(report.signals["url"], 0);
        assert_eq!(report.signals.len(), SIGNAL_COUNT);
        assert_eq!(report.degraded["url"], "missing field: urls");
        assert!((report.coordinated_groups[0].confidence - 0.4).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = CoordinationSignalEngine::default().detect_coordinated_accounts(&[], &[]);
        assert_eq!(report.n_groups, 0);
        assert!(report.signal_groups.is_empty());
        assert!(report.signals.values().all(|&n| n == 0));
    }
}
