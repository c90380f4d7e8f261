use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::presets::SizePreset;

/// File name of the config stored next to the executable.
pub const CONFIG_FILE_NAME: &str = "icon-forge.json";

/// Top-level configuration for the icon-forge CLI.
///
/// The library itself only needs a size list; this carries the defaults the
/// command line falls back to when a flag is not given.
///
/// # Loading
///
/// ```rust,no_run
/// use icon_forge::config::Config;
/// use icon_forge::presets::SizePreset;
///
/// // From a JSON file
/// let config = Config::load(Some("icon-forge.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.preset = SizePreset::Max256;
/// config.encoder.parallel = true;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size preset used when no explicit size list is given.
    pub preset: SizePreset,
    /// Encoder behaviour.
    pub encoder: EncoderConfig,
    /// Where and how icons are written.
    pub output: OutputConfig,
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Resample and compress sizes on worker threads.
    pub parallel: bool,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated icons. `None` writes next to the input image.
    pub directory: Option<PathBuf>,
    /// Replace an existing icon file instead of refusing.
    pub overwrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: SizePreset::Max1024,
            encoder: EncoderConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join(CONFIG_FILE_NAME))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::debug!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Where the icon for `input` goes when no explicit output is given.
    ///
    /// `photos/logo.png` becomes `<output.directory>/logo.ico`, or
    /// `photos/logo.ico` when no directory is configured.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let icon = input.with_extension("ico");
        match (&self.output.directory, icon.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => icon,
        }
    }
}
