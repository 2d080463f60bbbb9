use crate::model::EdgeTypeLayout;
use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Where the drug table and the three per-drug matrices live.
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub smiles_table: String,
    /// Zero-based column holding the SMILES string.
    #[serde(default = "default_smiles_column")]
    pub smiles_column: usize,
    #[serde(default)]
    pub has_header: bool,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Only this many leading rows of the table are used.
    #[serde(default = "default_max_molecules")]
    pub max_molecules: usize,
    pub similarity: String,
    pub target_profile: String,
    pub side_effects: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FeaturizeConfig {
    #[serde(default)]
    pub edge_type_layout: EdgeTypeLayout,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_snapshot_dir")]
    pub dir: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_snapshot_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub featurize: FeaturizeConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

fn default_smiles_column() -> usize {
    1
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_max_molecules() -> usize {
    750
}

fn default_snapshot_dir() -> String {
    "data/processed".to_string()
}

impl DataConfig {
    /// First byte of the configured delimiter; falls back to a comma.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(b',')
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Reads `<dir>/default`, then `<dir>/<RUN_MODE>` if present, then
    /// `SIDER__SECTION__KEY` environment overrides.
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(dir.as_ref(), None)
    }

    /// `vars` replaces the process environment when given.
    fn load_with_env(dir: &Path, vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let default_path = dir.join("default");
        let mode_path = dir.join(&run_mode);

        let builder = Config::builder()
            .add_source(File::with_name(&default_path.to_string_lossy()))
            .add_source(File::with_name(&mode_path.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("SIDER")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            );

        builder.build()?.try_deserialize()
    }
}
