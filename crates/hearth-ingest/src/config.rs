use anyhow::{Context, Result};
use confyg::{env, Confygery};
use hearth_core::EngineSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for hearth.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (HEARTH_* prefix)
/// 3. Config file (~/.config/hearth/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the catalog snapshot (JSON).
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/catalog.json
    /// - ENV: HEARTH_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/catalog.json"
    /// - Default: ~/.local/share/hearth/catalog.json
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Path to an engine settings file (TOML). Built-in weights are used
    /// when unset.
    ///
    /// Can be set via:
    /// - CLI: --settings /path/to/settings.toml
    /// - ENV: HEARTH_SETTINGS_PATH
    /// - Config: settings_path = "/path/to/settings.toml"
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    /// Logger options.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            settings_path: None,
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/hearth/config.toml
    /// Reads environment variables with HEARTH_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific file plus the environment.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("hearth");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, then apply the CLI overrides that were given.
    pub fn load_with_overrides(
        catalog_path: Option<PathBuf>,
        settings_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(catalog_path, settings_path);
        Ok(config)
    }

    fn apply_overrides(&mut self, catalog_path: Option<PathBuf>, settings_path: Option<PathBuf>) {
        if let Some(path) = catalog_path {
            self.catalog_path = path;
        }
        if settings_path.is_some() {
            self.settings_path = settings_path;
        }
    }

    /// The engine settings this configuration points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or does not
    /// validate.
    pub fn engine_settings(&self) -> Result<EngineSettings> {
        match &self.settings_path {
            Some(path) => EngineSettings::load(path)
                .with_context(|| format!("Failed to load engine settings from {}", path.display())),
            None => {
                log::debug!("No settings file configured, using built-in weights");
                Ok(EngineSettings::default())
            }
        }
    }
}

/// Get the default catalog path.
///
/// Returns: ~/.local/share/hearth/catalog.json (or platform equivalent)
fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hearth")
        .join("catalog.json")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/hearth/config.toml
/// - macOS: ~/Library/Application Support/hearth/config.toml
/// - Windows: %APPDATA%\hearth\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hearth")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Hearth Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (HEARTH_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Catalog snapshot to load
#
# A JSON export of the properties, property_images and neighbourhoods tables.
#
# Can also be set via:
# - CLI: hearth --catalog /custom/catalog.json recommend <id>
# - Environment: HEARTH_CATALOG_PATH=/custom/catalog.json
#
# Default: Platform-specific data directory
#catalog_path = "/path/to/catalog.json"

# Engine settings (metadata weights, aspect weights, image caps, top_k)
#
# Print a template with: hearth settings example
#
# Can also be set via:
# - CLI: hearth --settings /custom/settings.toml recommend <id>
# - Environment: HEARTH_SETTINGS_PATH=/custom/settings.toml
#
# Default: built-in weights
#settings_path = "/path/to/settings.toml"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    ensure_config_file_at(&config_file_path())
}

fn ensure_config_file_at(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
