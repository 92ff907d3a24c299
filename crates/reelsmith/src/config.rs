//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from reelsmith.toml)
//! - `~/.config/reelsmith/reelsmith.toml`
//! - `./reelsmith.toml`

use config::{Config, File, FileFormat};
use reelsmith_error::{ConfigError, ReelsmithError, ReelsmithResult};
use reelsmith_models::ModelsConfig;
use reelsmith_pipeline::PipelineConfig;
use reelsmith_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../reelsmith.toml");

/// Resolver settings per media kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ResolverSections {
    /// Still image lookup
    #[serde(default)]
    images: ResolverConfig,
    /// Stock footage lookup
    #[serde(default)]
    videos: ResolverConfig,
}

/// Complete application configuration.
///
/// # Example
///
/// ```no_run
/// use reelsmith::ReelsmithConfig;
///
/// let config = ReelsmithConfig::load()?;
/// println!("checkpoints in {}", config.checkpoint_dir().display());
/// # Ok::<(), reelsmith::ReelsmithError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ReelsmithConfig {
    /// Where job checkpoints are stored
    #[serde(default = "default_checkpoint_dir")]
    checkpoint_dir: PathBuf,
    /// Step tuning
    #[serde(default)]
    pipeline: PipelineConfig,
    /// Asset lookup
    #[serde(default)]
    resolver: ResolverSections,
    /// Concrete collaborators
    #[serde(default)]
    models: ModelsConfig,
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from(".reelsmith/checkpoints")
}

impl Default for ReelsmithConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: default_checkpoint_dir(),
            pipeline: PipelineConfig::default(),
            resolver: ResolverSections::default(),
            models: ModelsConfig::default(),
        }
    }
}

fn config_error(context: &str, e: config::ConfigError) -> ReelsmithError {
    ReelsmithError::from(ConfigError::new(format!("{}: {}", context, e)))
}

impl ReelsmithConfig {
    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    #[instrument]
    pub fn load() -> ReelsmithResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/reelsmith/reelsmith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("reelsmith").required(false));

        builder
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Load bundled defaults overlaid with one explicit file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ReelsmithResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                config_error(
                    &format!(
                        "Failed to read configuration from {}",
                        path.as_ref().display()
                    ),
                    e,
                )
            })?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Parse configuration from TOML text alone, without the bundled defaults.
    pub fn from_toml(text: &str) -> ReelsmithResult<Self> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Same configuration storing everything under `root`.
    pub fn rooted_at(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.checkpoint_dir = root.join("checkpoints");
        self.pipeline = self
            .pipeline
            .with_dirs(root.join("work"), root.join("videos"));
        self
    }
}
