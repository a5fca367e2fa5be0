//! Walk and corruption configuration
//!
//! Defaults reproduce the classic keyword defaults of the walker entry
//! points. Configs can be loaded from YAML or JSON files; every field is
//! optional in the file.

use crate::error::{WalkerError, WalkerResult};
use mlg_walker_core::DateAnchor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for [`crate::random_walks`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    /// Walks per start node
    pub n_walks: usize,
    /// Nodes per walk, including the start node
    pub walk_len: usize,
    /// Node2vec return parameter
    pub p: f32,
    /// Node2vec in-out parameter
    pub q: f32,
    /// Restart probability
    pub alpha: f32,
    /// Do not walk into the future relative to the anchor node's date
    pub no_future: bool,
    #[serde(with = "anchor_name")]
    pub date_anchor: DateAnchor,
    /// Accept neighbors dated exactly at the anchor date
    pub inclusive_dates: bool,
    /// Edge weight attribute; `None` walks the graph unweighted
    pub weight: Option<String>,
    /// Node attribute holding the date used by `no_future`
    pub date_attribute: String,
    /// Start node names; `None` starts from every node in order
    pub start_nodes: Option<Vec<String>>,
    /// RNG seed; `None` draws a fresh one
    pub seed: Option<u64>,
    /// Log phase timings at info level
    pub verbose: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            n_walks: 10,
            walk_len: 10,
            p: 1.0,
            q: 1.0,
            alpha: 0.0,
            no_future: false,
            date_anchor: DateAnchor::Start,
            inclusive_dates: false,
            weight: Some("weight".to_string()),
            date_attribute: "date".to_string(),
            start_nodes: None,
            seed: None,
            verbose: true,
        }
    }
}

/// Options for [`crate::corrupt`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptOptions {
    /// Per-position corruption probability
    pub r: f32,
    /// Exponent applied to weighted degrees when building the negative table
    pub ns_exponent: f32,
    /// Number of entries in the negative table
    pub negative_size: usize,
    /// Edge weight attribute used for weighted degrees
    pub weight: Option<String>,
    /// RNG seed; `None` draws a fresh one
    pub seed: Option<u64>,
    /// Log phase timings at info level
    pub verbose: bool,
}

impl Default for CorruptOptions {
    fn default() -> Self {
        Self {
            r: 0.01,
            ns_exponent: 0.75,
            negative_size: 100_000,
            weight: Some("weight".to_string()),
            seed: None,
            verbose: true,
        }
    }
}

/// File-level configuration: one section per phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    pub walk: WalkOptions,
    pub corrupt: CorruptOptions,
}

impl WalkerConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> WalkerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            Some("json") => Self::from_json(&text),
            other => Err(WalkerError::Config(format!(
                "unsupported config extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    pub fn from_yaml(text: &str) -> WalkerResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> WalkerResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// `DateAnchor` as a lowercase string ("start" / "current")
mod anchor_name {
    use mlg_walker_core::DateAnchor;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(anchor: &DateAnchor, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match anchor {
            DateAnchor::Start => "start",
            DateAnchor::Current => "current",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateAnchor, D::Error> {
        let name = String::deserialize(deserializer)?;
        match name.as_str() {
            "start" => Ok(DateAnchor::Start),
            "current" => Ok(DateAnchor::Current),
            other => Err(serde::de::Error::unknown_variant(other, &["start", "current"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let walk = WalkOptions::default();
        assert_eq!((walk.n_walks, walk.walk_len), (10, 10));
        assert_eq!((walk.p, walk.q, walk.alpha), (1.0, 1.0, 0.0));
        assert_eq!(walk.weight.as_deref(), Some("weight"));

        let corrupt = CorruptOptions::default();
        assert_eq!(corrupt.r, 0.01);
        assert_eq!(corrupt.ns_exponent, 0.75);
        assert_eq!(corrupt.negative_size, 100_000);
    }

    #[test]
    fn test_partial_yaml() {
        let config = WalkerConfig::from_yaml(
            "walk:\n  walk_len: 40\n  no_future: true\n  date_anchor: current\n  seed: 7\n\
             corrupt:\n  r: 0.2\n",
        )
        .unwrap();
        assert_eq!(config.walk.walk_len, 40);
        assert_eq!(config.walk.n_walks, 10);
        assert!(config.walk.no_future);
        assert_eq!(config.walk.date_anchor, DateAnchor::Current);
        assert_eq!(config.walk.seed, Some(7));
        assert_eq!(config.corrupt.r, 0.2);
        assert_eq!(config.corrupt.negative_size, 100_000);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = WalkerConfig::default();
        config.walk.start_nodes = Some(vec!["A".to_string()]);
        config.walk.weight = None;
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(WalkerConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("walker.yml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "walk:\n  n_walks: 3").unwrap();
        assert_eq!(WalkerConfig::load(&yaml_path).unwrap().walk.n_walks, 3);

        let toml_path = dir.path().join("walker.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(WalkerConfig::load(&toml_path), Err(WalkerError::Config(_))));
    }

    #[test]
    fn test_unknown_anchor_rejected() {
        assert!(WalkerConfig::from_yaml("walk:\n  date_anchor: sideways\n").is_err());
    }
}
