//! Analysis configuration
//!
//! Every section deserializes with defaults, so a YAML file only needs the
//! keys it overrides:
//!
//! ```yaml
//! coordination:
//!   temporal_window: 60
//! layers:
//!   follower:
//!     enabled: false
//! ```

use crate::error::{TangleError, TangleResult};
use crate::graph::{layer, CombineMethod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// How one relation layer is materialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub enabled: bool,
    /// Edge records (or co-occurrence counts) below this weight are dropped
    pub weight_threshold: f64,
    pub directed: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight_threshold: 1.0,
            directed: true,
        }
    }
}

impl LayerConfig {
    pub fn directed(weight_threshold: f64) -> Self {
        Self {
            enabled: true,
            weight_threshold,
            directed: true,
        }
    }

    pub fn undirected(weight_threshold: f64) -> Self {
        Self {
            enabled: true,
            weight_threshold,
            directed: false,
        }
    }
}

/// The default five relation layers
pub fn default_layers() -> BTreeMap<String, LayerConfig> {
    BTreeMap::from([
        (layer::FOLLOWER.to_string(), LayerConfig::directed(1.0)),
        (layer::RETWEET.to_string(), LayerConfig::directed(1.0)),
        (layer::MENTION.to_string(), LayerConfig::directed(1.0)),
        (layer::HASHTAG.to_string(), LayerConfig::undirected(2.0)),
        (layer::REPLY.to_string(), LayerConfig::directed(1.0)),
    ])
}

/// Coordination-signal tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Bucket width in seconds for temporal and hashtag signals
    pub temporal_window: i64,
    pub text_similarity_threshold: f64,
    pub hashtag_jaccard_threshold: f64,
    pub min_coordinated_accounts: usize,
    pub synchronization_threshold: f64,
    /// Distinct signals an account needs to seed a coordinated group
    pub min_interactions: usize,
    /// Timestamp variance (seconds²) at which synchronization reaches zero
    pub max_variance_norm: f64,
    /// Shares of one URL must span less than this many seconds
    pub url_burst_window: i64,
    /// A hub needs strictly more incoming edges than this
    pub hub_min_in_degree: usize,
    /// A hub needs strictly fewer outgoing edges than this
    pub hub_max_out_degree: usize,
    /// Vocabulary cap for the TF-IDF vectorizer
    pub max_vocabulary: usize,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            temporal_window: 5,
            text_similarity_threshold: 0.9,
            hashtag_jaccard_threshold: 0.7,
            min_coordinated_accounts: 3,
            synchronization_threshold: 0.8,
            min_interactions: 2,
            max_variance_norm: 3600.0,
            url_burst_window: 3600,
            hub_min_in_degree: 10,
            hub_max_out_degree: 3,
            max_vocabulary: 1000,
        }
    }
}

/// Misinformation-indicator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MisinfoConfig {
    pub cluster_size_threshold: usize,
    pub veracity_threshold: f64,
    /// Posts per second
    pub spread_velocity_threshold: f64,
    pub bot_score_threshold: f64,
    pub structural_anomaly_threshold: f64,
    /// Clusters at or above this risk are reported as high risk
    pub high_risk_threshold: f64,
    /// Clusters overlapping more than this (Jaccard) are duplicates
    pub duplicate_overlap: f64,
    /// A community is anomalous above this mean clustering...
    pub anomaly_min_clustering: f64,
    /// ...and below this mean reciprocity
    pub anomaly_max_reciprocity: f64,
}

impl Default for MisinfoConfig {
    fn default() -> Self {
        Self {
            cluster_size_threshold: 5,
            veracity_threshold: 0.3,
            spread_velocity_threshold: 0.5,
            bot_score_threshold: 0.7,
            structural_anomaly_threshold: 0.8,
            high_risk_threshold: 0.7,
            duplicate_overlap: 0.5,
            anomaly_min_clustering: 0.5,
            anomaly_max_reciprocity: 0.2,
        }
    }
}

/// Complete configuration surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub layers: BTreeMap<String, LayerConfig>,
    pub coordination: CoordinationConfig,
    pub misinformation: MisinfoConfig,
    pub combine: CombineMethod,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            layers: default_layers(),
            coordination: CoordinationConfig::default(),
            misinformation: MisinfoConfig::default(),
            combine: CombineMethod::Union,
        }
    }
}

impl AnalysisConfig {
    /// Default config file location (`<config_dir>/tangle/config.yaml`)
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"));
        config_dir.join("tangle").join("config.yaml")
    }

    /// Parse a YAML config file and validate it
    pub fn load(path: &Path) -> TangleResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> TangleResult<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> TangleResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject settings no detector can work with
    pub fn validate(&self) -> TangleResult<()> {
        let c = &self.coordination;
        if c.temporal_window <= 0 {
            return Err(invalid("coordination.temporal_window must be positive"));
        }
        if c.url_burst_window <= 0 {
            return Err(invalid("coordination.url_burst_window must be positive"));
        }
        if c.max_variance_norm <= 0.0 {
            return Err(invalid("coordination.max_variance_norm must be positive"));
        }
        if c.min_coordinated_accounts < 2 {
            return Err(invalid("coordination.min_coordinated_accounts must be at least 2"));
        }
        if c.max_vocabulary == 0 {
            return Err(invalid("coordination.max_vocabulary must be positive"));
        }
        unit("coordination.text_similarity_threshold", c.text_similarity_threshold)?;
        unit("coordination.hashtag_jaccard_threshold", c.hashtag_jaccard_threshold)?;
        unit("coordination.synchronization_threshold", c.synchronization_threshold)?;

        let m = &self.misinformation;
        unit("misinformation.veracity_threshold", m.veracity_threshold)?;
        unit("misinformation.bot_score_threshold", m.bot_score_threshold)?;
        unit("misinformation.structural_anomaly_threshold", m.structural_anomaly_threshold)?;
        unit("misinformation.high_risk_threshold", m.high_risk_threshold)?;
        unit("misinformation.duplicate_overlap", m.duplicate_overlap)?;
        if m.spread_velocity_threshold < 0.0 {
            return Err(invalid("misinformation.spread_velocity_threshold must not be negative"));
        }

        for (name, layer) in &self.layers {
            if layer.weight_threshold < 0.0 {
                return Err(TangleError::Configuration(format!(
                    "layers.{}.weight_threshold must not be negative",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> TangleError {
    TangleError::Configuration(message.to_string())
}

fn unit(name: &str, value: f64) -> TangleResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TangleError::Configuration(format!(
            "{} must lie in [0, 1], got {}",
            name, value
        )))
    }
}
