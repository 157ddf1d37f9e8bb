use std::fmt;

/// Result type for wirlwind-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// §7 `ConfigError`: invalid collection YAML, unknown vendor, missing
/// command. Fatal at startup, not per-cycle.
#[derive(Debug)]
pub enum Error {
    Config { detail: String },
    Io { path: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config { detail } => write!(f, "ConfigError: {detail}"),
            Error::Io { path, reason } => write!(f, "ConfigError: could not read '{path}': {reason}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<wirlwind_types::Error> for Error {
    fn from(e: wirlwind_types::Error) -> Self {
        Error::Config { detail: e.to_string() }
    }
}
