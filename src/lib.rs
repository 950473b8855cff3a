//! Tangle: Multi-Layer Social Network Analysis
//!
//! Detects coordinated inauthentic behaviour and misinformation clusters in
//! a batch snapshot of posts and typed account interactions.
//!
//! # Core Concepts
//!
//! - **Layers**: one weighted graph per relation (follower, retweet, mention,
//!   reply, hashtag co-occurrence), merged into a combined graph
//! - **Signals**: five independent coordination heuristics, fused into
//!   groups of accounts that at least two signals agree on
//! - **Indicators**: five misinformation risk heuristics, ranked and
//!   deduplicated by node overlap
//!
//! # Example
//!
//! ```
//! use tangle::{AnalysisEngine, Dataset, EdgeRecord, Partition};
//!
//! let dataset = Dataset::new(Vec::new(), vec![EdgeRecord::new("a", "b", "retweet")]);
//! let engine = AnalysisEngine::default();
//! let snapshot = engine.run(&dataset, &Partition::new()).unwrap();
//! assert!(snapshot.coordination.is_some());
//! ```

pub mod config;
pub mod coordination;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod misinfo;
pub mod pipeline;
pub mod similarity;

pub use config::{AnalysisConfig, CoordinationConfig, LayerConfig, MisinfoConfig};
pub use coordination::{
    CoordinatedGroup, CoordinationReport, CoordinationSignalEngine, SignalDetector, SignalGroup,
    SignalKind,
};
pub use dataset::{Claim, Dataset, Post};
pub use error::{DetectorError, TangleError, TangleResult};
pub use graph::{
    AccountId, CombineMethod, CommunityId, EdgeRecord, GraphLayerBuilder, LayerGraph,
    LayerStatistics, NodeId, NodeProfile, Partition,
};
pub use misinfo::{
    ClusterIndicator, IndicatorKind, MisinfoCluster, MisinfoReport, MisinformationClusterEngine,
};
pub use pipeline::{AnalysisEngine, AnalysisSnapshot, PartitionSource, RunId, RunRecord, RunStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
