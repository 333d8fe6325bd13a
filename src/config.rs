//! Runtime configuration loaded from a TOML file (`arcade.toml` by default).
//!
//! Every key is optional; missing keys keep their compiled defaults, so a
//! file containing only `frame_ms = 16` is valid.
//!
//! ```toml
//! frame_ms = 33
//! hold_window = 4
//! catcher_time_limit = 60
//! audio = true
//! log_file = "arcade.log"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::catcher::DEFAULT_TIME_LIMIT;
use crate::error::{ArcadeError, ArcadeResult};
use crate::input::DEFAULT_HOLD_WINDOW;

pub const DEFAULT_CONFIG_PATH: &str = "arcade.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Target frame length in milliseconds (33 ≈ 30 FPS).
    pub frame_ms: u64,
    /// Frames a key counts as held after its last press/repeat.
    pub hold_window: u64,
    /// Seconds on the fruit catcher's clock.
    pub catcher_time_limit: u32,
    /// Play tones when an audio backend is compiled in.
    pub audio: bool,
    /// Where tracing output goes; no logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            frame_ms: 33,
            hold_window: DEFAULT_HOLD_WINDOW,
            catcher_time_limit: DEFAULT_TIME_LIMIT,
            audio: true,
            log_file: None,
        }
    }
}

impl ArcadeConfig {
    pub fn from_toml(path: &Path, contents: &str) -> ArcadeResult<Self> {
        let config: ArcadeConfig =
            toml::from_str(contents).map_err(|source| ArcadeError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ArcadeResult<()> {
        if self.frame_ms == 0 {
            return Err(ArcadeError::InvalidConfig {
                key: "frame_ms",
                expected: "greater than 0",
            });
        }
        if self.catcher_time_limit == 0 {
            return Err(ArcadeError::InvalidConfig {
                key: "catcher_time_limit",
                expected: "at least 1 second",
            });
        }
        Ok(())
    }
}

/// Read and parse `path`.  `Ok(None)` when the file does not exist.
pub fn try_load_config(path: &Path) -> ArcadeResult<Option<ArcadeConfig>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => ArcadeConfig::from_toml(path, &contents).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Load `path`, falling back to defaults.
///
/// A missing file is not an error.  A file that cannot be read, parsed or
/// validated is reported as a warning and ignored so the game still starts.
pub fn load_config(path: &Path) -> ArcadeConfig {
    match try_load_config(path) {
        Ok(Some(config)) => {
            info!(path = %path.display(), "loaded config");
            config
        }
        Ok(None) => {
            info!(path = %path.display(), "no config file; using defaults");
            ArcadeConfig::default()
        }
        Err(e) => {
            warn!(error = %e, "using default config");
            ArcadeConfig::default()
        }
    }
}
