//! Error types for the fallible edges of the arcade: configuration and
//! terminal I/O.  The simulations themselves cannot fail.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ArcadeError {
    /// Reading a file or talking to the terminal failed.
    Io(std::io::Error),

    /// A configuration file exists but is not valid TOML for `ArcadeConfig`.
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A configuration value is outside its usable range.
    InvalidConfig {
        /// Name of the key (for logging).
        key: &'static str,
        /// Human-readable description of what is accepted.
        expected: &'static str,
    },
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcadeError::Io(e) => write!(f, "i/o error: {}", e),
            ArcadeError::ConfigParse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            ArcadeError::InvalidConfig { key, expected } => {
                write!(f, "config key '{}' must be {}", key, expected)
            }
        }
    }
}

impl std::error::Error for ArcadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArcadeError::Io(e) => Some(e),
            ArcadeError::ConfigParse { source, .. } => Some(source),
            ArcadeError::InvalidConfig { .. } => None,
        }
    }
}

impl From<std::io::Error> for ArcadeError {
    fn from(e: std::io::Error) -> Self {
        ArcadeError::Io(e)
    }
}

/// Convenience alias: a `Result` using `ArcadeError` as the error type.
pub type ArcadeResult<T> = Result<T, ArcadeError>;
