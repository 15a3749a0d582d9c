//! Configuration management for reflector.
//!
//! Parses `reflector.toml` with serde and provides auto-discovery of the
//! config file in parent directories. A missing file means defaults.
//!
//! CLI settings can be applied during load via [`CliSettings`]; they take
//! precedence over file values and are validated together with them.

use std::path::{Path, PathBuf};

use reflector_core::{
    BuildOptions, DEFAULT_EXCLUSIONS, DEFAULT_PARALLELISM, Layers, WriteOptions, WriteStrategy,
};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override write strategy.
    pub strategy: Option<WriteStrategy>,
    /// Override requested layers.
    pub layers: Option<Layers>,
    /// Override attribute rendering.
    pub show_attributes: Option<bool>,
    /// Override worker pool width.
    pub parallelism: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "reflector.toml";

const DEFAULT_OUTPUT_DIR: &str = "diagrams";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output section as parsed from TOML.
    output: OutputConfigRaw,
    /// Render section as parsed from TOML.
    render: RenderConfigRaw,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Resolved render configuration (set after loading).
    #[serde(skip)]
    pub render_resolved: RenderConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    strategy: Option<String>,
    extension: Option<String>,
    parallelism: Option<usize>,
    qualify_type_names: Option<bool>,
}

/// Resolved output configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory documents are written to.
    pub dir: PathBuf,
    /// How pairs are grouped into documents.
    pub strategy: WriteStrategy,
    /// Document file extension, without the dot. `None` means the diagram
    /// syntax's default.
    pub extension: Option<String>,
    /// Worker pool width.
    pub parallelism: usize,
    /// Whether per-type grouping keys include the namespace.
    pub qualify_type_names: bool,
}

impl OutputConfig {
    /// Configured extension, or `default` when unset.
    #[must_use]
    pub fn extension_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.extension.as_deref().unwrap_or(default)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            strategy: WriteStrategy::default(),
            extension: None,
            parallelism: DEFAULT_PARALLELISM,
            qualify_type_names: true,
        }
    }
}

/// Raw render configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RenderConfigRaw {
    layers: Option<String>,
    show_attributes: Option<bool>,
    exclusions: Option<Vec<String>>,
}

/// Resolved render configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Layers requested for every type.
    pub layers: Layers,
    /// Render attribute blocks.
    pub show_attributes: bool,
    /// Full-name prefixes suppressed from edges.
    pub exclusions: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layers: Layers::ALL,
            show_attributes: false,
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `reflector.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Generation settings for [`reflector_core::build_types`].
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            show_attributes: self.render_resolved.show_attributes,
            exclusions: self.render_resolved.exclusions.clone(),
        }
    }

    /// Writer settings for [`reflector_core::PartitionedWriter`].
    #[must_use]
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            strategy: self.output_resolved.strategy,
            parallelism: self.output_resolved.parallelism,
            qualify_type_names: self.output_resolved.qualify_type_names,
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(strategy) = settings.strategy {
            self.output_resolved.strategy = strategy;
        }
        if let Some(layers) = settings.layers {
            self.render_resolved.layers = layers;
        }
        if let Some(show_attributes) = settings.show_attributes {
            self.render_resolved.show_attributes = show_attributes;
        }
        if let Some(parallelism) = settings.parallelism {
            self.output_resolved.parallelism = parallelism;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            output: OutputConfigRaw::default(),
            render: RenderConfigRaw::default(),
            output_resolved: OutputConfig {
                dir: base.join(DEFAULT_OUTPUT_DIR),
                ..OutputConfig::default()
            },
            render_resolved: RenderConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_resolved.parallelism == 0 {
            return Err(ConfigError::Validation(
                "output.parallelism must be at least 1".to_owned(),
            ));
        }
        if self
            .output_resolved
            .extension
            .as_deref()
            .is_some_and(|ext| ext.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "output.extension cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parse raw strings and resolve relative paths against the config directory.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let output = &self.output;
        let strategy = match output.strategy.as_deref() {
            Some(name) => name
                .parse()
                .map_err(|e| ConfigError::Validation(format!("output.strategy: {e}")))?,
            None => WriteStrategy::default(),
        };
        self.output_resolved = OutputConfig {
            dir: config_dir.join(output.dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)),
            strategy,
            extension: output.extension.clone(),
            parallelism: output.parallelism.unwrap_or(DEFAULT_PARALLELISM),
            qualify_type_names: output.qualify_type_names.unwrap_or(true),
        };

        let render = &self.render;
        let defaults = RenderConfig::default();
        let layers = match render.layers.as_deref() {
            Some(expr) => expr
                .parse()
                .map_err(|e| ConfigError::Validation(format!("render.layers: {e}")))?,
            None => defaults.layers,
        };
        self.render_resolved = RenderConfig {
            layers,
            show_attributes: render.show_attributes.unwrap_or(defaults.show_attributes),
            exclusions: render.exclusions.clone().unwrap_or(defaults.exclusions),
        };

        Ok(())
    }
}
