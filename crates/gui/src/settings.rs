//! User settings loaded from a TOML file.

use std::path::{Path, PathBuf};

use engine_host::EngineConfig;
use serde::Deserialize;
use xiangqi_core::Side;

/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "XIANGQI_CONFIG";
/// Overrides the engine binary path from the settings file.
pub const ENGINE_ENV: &str = "XIANGQI_ENGINE";
pub const DEFAULT_CONFIG_FILE: &str = "xiangqi.toml";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine_path: PathBuf,
    pub engine_args: Vec<String>,
    /// Search budget per `go`, in milliseconds
    pub think_time_ms: u64,
    /// Number of variations requested from the engine
    pub multipv: u32,
    pub play_vs_engine: bool,
    pub auto_analyze: bool,
    pub engine_side: Side,
    /// Pause before an engine reply is played on the board
    pub reply_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            engine_args: Vec::new(),
            think_time_ms: 1000,
            multipv: 3,
            play_vs_engine: true,
            auto_analyze: true,
            engine_side: Side::Black,
            reply_delay_ms: 300,
        }
    }
}

/// `engine/pikafish` next to the running executable.
fn default_engine_path() -> PathBuf {
    let name = format!("pikafish{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("engine").join(&name)))
        .unwrap_or_else(|| Path::new("engine").join(&name))
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Read settings from `path`. A missing file yields `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml_str(&contents)
            .map(Some)
            .map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Resolve settings from the environment and the settings file,
    /// falling back to defaults when the file is missing or broken.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut settings = match Self::load_from(&path) {
            Ok(Some(s)) => {
                tracing::info!(path = %path.display(), "loaded settings");
                s
            }
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        };

        if let Some(engine) = std::env::var_os(ENGINE_ENV) {
            settings.engine_path = PathBuf::from(engine);
        }
        settings
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(&self.engine_path).with_args(self.engine_args.clone())
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod settings_tests;
