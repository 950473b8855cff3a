//! AnalysisEngine: runs the full pipeline and tracks run status
//!
//! A run moves through network construction, partitioning, coordination
//! and misinformation detection. Each stage commits its output to the
//! latest-run snapshot only after it succeeds, so a failed run still
//! exposes whatever the earlier stages produced.

use crate::config::AnalysisConfig;
use crate::coordination::{CoordinationReport, CoordinationSignalEngine};
use crate::dataset::Dataset;
use crate::error::{TangleError, TangleResult};
use crate::graph::{layer, GraphLayerBuilder, LayerStatistics, Partition};
use crate::misinfo::{MisinfoReport, MisinformationClusterEngine};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{error, info};
use uuid::Uuid;

/// Unique identifier for an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Observable state of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Running { progress: u8, message: String },
    Completed,
    Error { message: String },
}

impl RunStatus {
    fn running(progress: u8, message: &str) -> Self {
        Self::Running {
            progress,
            message: message.to_string(),
        }
    }

    pub fn progress(&self) -> u8 {
        match self {
            Self::Running { progress, .. } => *progress,
            Self::Completed => 100,
            Self::Error { .. } => 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Running { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Supplies the community partition for a run.
///
/// Community detection is outside this crate; implementors wrap whatever
/// external algorithm produces the node → community mapping.
pub trait PartitionSource: Send + Sync {
    fn partition(&self, graph: &GraphLayerBuilder) -> TangleResult<Partition>;
}

/// A precomputed partition, used as-is
impl PartitionSource for Partition {
    fn partition(&self, _graph: &GraphLayerBuilder) -> TangleResult<Partition> {
        Ok(self.clone())
    }
}

/// Outputs of one run, filled stage by stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub run_id: RunId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<BTreeMap<String, LayerStatistics>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<Partition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordination: Option<CoordinationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misinformation: Option<MisinfoReport>,
}

impl AnalysisSnapshot {
    fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            network: None,
            partition: None,
            coordination: None,
            misinformation: None,
        }
    }
}

/// Orchestrates runs over the graph, coordination and misinformation stages
#[derive(Debug)]
pub struct AnalysisEngine {
    config: AnalysisConfig,
    runs: DashMap<RunId, RunRecord>,
    latest: RwLock<Option<AnalysisSnapshot>>,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            runs: DashMap::new(),
            latest: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Register a new run and reset the latest snapshot to it
    pub fn start_run(&self) -> RunId {
        let id = RunId::new();
        let now = Utc::now();
        self.runs.insert(
            id.clone(),
            RunRecord {
                id: id.clone(),
                status: RunStatus::running(0, "Queued"),
                started_at: now,
                updated_at: now,
            },
        );
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) =
            Some(AnalysisSnapshot::new(id.clone()));
        id
    }

    /// Run the whole pipeline synchronously
    pub fn run(
        &self,
        dataset: &Dataset,
        partitions: &dyn PartitionSource,
    ) -> TangleResult<AnalysisSnapshot> {
        let id = self.start_run();
        self.execute(&id, dataset, partitions)
    }

    /// Start a run on the blocking thread pool and return its id at once
    pub fn submit(
        self: &Arc<Self>,
        dataset: Dataset,
        partitions: Arc<dyn PartitionSource>,
    ) -> RunId {
        let id = self.start_run();
        let engine = Arc::clone(self);
        let run_id = id.clone();
        tokio::task::spawn_blocking(move || {
            // The outcome is recorded in the run registry
            let _ = engine.execute(&run_id, &dataset, partitions.as_ref());
        });
        id
    }

    /// Execute the stages of an already registered run
    pub fn execute(
        &self,
        id: &RunId,
        dataset: &Dataset,
        partitions: &dyn PartitionSource,
    ) -> TangleResult<AnalysisSnapshot> {
        info!(run = %id, posts = dataset.posts.len(), edges = dataset.edges.len(), "Analysis started");

        match self.stages(id, dataset, partitions) {
            Ok(snapshot) => {
                self.set_status(id, RunStatus::Completed);
                info!(run = %id, "Analysis completed");
                Ok(snapshot)
            }
            Err(e) => {
                error!(run = %id, error = %e, "Analysis failed");
                self.set_status(
                    id,
                    RunStatus::Error {
                        message: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    fn stages(
        &self,
        id: &RunId,
        dataset: &Dataset,
        partitions: &dyn PartitionSource,
    ) -> TangleResult<AnalysisSnapshot> {
        let mut snapshot = AnalysisSnapshot::new(id.clone());

        self.set_status(id, RunStatus::running(10, "Building multi-layer network"));
        let mut builder = GraphLayerBuilder::new(self.config.layers.clone());
        builder.build_layers(&dataset.edges);
        if self
            .config
            .layers
            .get(layer::HASHTAG)
            .is_some_and(|c| c.enabled)
        {
            builder.build_hashtag_layer(&dataset.posts);
        }
        builder.combine_layers(self.config.combine)?;
        snapshot.network = Some(builder.get_layer_statistics());
        self.commit(id, |s| s.network = snapshot.network.clone());

        self.set_status(id, RunStatus::running(30, "Detecting communities"));
        let partition = partitions.partition(&builder)?;
        snapshot.partition = Some(partition.clone());
        self.commit(id, |s| s.partition = Some(partition.clone()));

        self.set_status(id, RunStatus::running(50, "Detecting coordinated behavior"));
        let coordination = CoordinationSignalEngine::new(self.config.coordination.clone())
            .detect_coordinated_accounts(&dataset.posts, &dataset.edges);
        snapshot.coordination = Some(coordination.clone());
        self.commit(id, |s| s.coordination = snapshot.coordination.clone());

        self.set_status(id, RunStatus::running(70, "Detecting misinformation clusters"));
        let misinformation = MisinformationClusterEngine::new(self.config.misinformation.clone())
            .detect_misinformation_clusters(
                &builder,
                &dataset.posts,
                &dataset.claims,
                &partition,
                &coordination.coordinated_groups,
            );
        snapshot.misinformation = Some(misinformation);
        self.commit(id, |s| s.misinformation = snapshot.misinformation.clone());

        self.set_status(id, RunStatus::running(85, "Finalizing"));
        Ok(snapshot)
    }

    /// Apply a stage's output to the latest snapshot if it still belongs to `id`
    fn commit(&self, id: &RunId, apply: impl FnOnce(&mut AnalysisSnapshot)) {
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = latest.as_mut().filter(|s| &s.run_id == id) {
            apply(snapshot);
        }
    }

    fn set_status(&self, id: &RunId, status: RunStatus) {
        if let Some(mut record) = self.runs.get_mut(id) {
            record.status = status;
            record.updated_at = Utc::now();
        }
    }

    pub fn status(&self, id: &RunId) -> TangleResult<RunRecord> {
        self.runs
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| TangleError::RunNotFound(id.to_string()))
    }

    /// All known runs, oldest first
    pub fn runs(&self) -> Vec<RunRecord> {
        let mut runs: Vec<RunRecord> = self.runs.iter().map(|r| r.value().clone()).collect();
        runs.sort_by_key(|r| r.started_at);
        runs
    }

    /// Outputs of the most recently started run
    pub fn latest(&self) -> Option<AnalysisSnapshot> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeRecord;

    struct FailingSource;

    impl PartitionSource for FailingSource {
        fn partition(&self, _: &GraphLayerBuilder) -> TangleResult<Partition> {
            Err(TangleError::Configuration("no community backend".to_string()))
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(Vec::new(), vec![EdgeRecord::new("a", "b", "retweet")])
    }

    #[test]
    fn completed_run_reports_every_stage() {
        let engine = AnalysisEngine::default();
        let snapshot = engine.run(&dataset(), &Partition::new()).unwrap();

        assert!(snapshot.network.unwrap().contains_key("combined"));
        assert!(snapshot.coordination.is_some());
        assert!(snapshot.misinformation.is_some());

        let record = engine.status(&snapshot.run_id).unwrap();
        assert_eq!(record.status, RunStatus::Completed);
        assert_eq!(record.status.progress(), 100);
    }

    #[test]
    fn failed_stage_keeps_earlier_outputs() {
        let engine = AnalysisEngine::default();
        let err = engine.run(&dataset(), &FailingSource).unwrap_err();
        assert!(err.to_string().contains("no community backend"));

        let latest = engine.latest().unwrap();
        assert!(latest.network.is_some());
        assert!(latest.partition.is_none());
        assert!(latest.coordination.is_none());

        let record = engine.status(&latest.run_id).unwrap();
        assert!(matches!(record.status, RunStatus::Error { ref message } if message.contains("no community backend")));
    }

    #[test]
    fn no_layers_is_fatal() {
        let mut config = AnalysisConfig::default();
        config.layers.clear();
        let engine = AnalysisEngine::new(config);

        let err = engine.run(&dataset(), &Partition::new()).unwrap_err();
        assert!(matches!(err, TangleError::NoLayers));
    }

    #[test]
    fn unknown_run_is_not_found() {
        let engine = AnalysisEngine::default();
        assert!(matches!(
            engine.status(&RunId::from("missing")),
            Err(TangleError::RunNotFound(_))
        ));
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_value(RunStatus::running(30, "Detecting communities")).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["progress"], 30);
    }
}
