use std::fmt;

/// Result type for wirlwind-runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type surfaced by the Poll Engine and `wirlwind-cli`'s
/// `main` (§7 full taxonomy, minus the per-collection kinds that never
/// escape the pipeline).
#[derive(Debug)]
pub enum Error {
    /// SSH channel read/write failure, timeout, unexpected disconnect
    /// (§7 `TransportError`). Triggers the retry/backoff path rather than
    /// aborting the session.
    Transport { reason: String },

    /// Invalid collection YAML, unknown vendor, missing command (§7
    /// `ConfigError`). Fatal at startup.
    Config { detail: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport { reason } => write!(f, "TransportError: {reason}"),
            Error::Config { detail } => write!(f, "ConfigError: {detail}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<wirlwind_engine::Error> for Error {
    fn from(e: wirlwind_engine::Error) -> Self {
        Error::Config { detail: e.to_string() }
    }
}

impl From<wirlwind_providers::Error> for Error {
    fn from(e: wirlwind_providers::Error) -> Self {
        Error::Config { detail: e.to_string() }
    }
}
