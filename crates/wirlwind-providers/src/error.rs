use std::fmt;

/// Result type for wirlwind-providers operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Two drivers registered under the same vendor identifier (§4.6:
    /// "Duplicate registration is a fatal startup error").
    DuplicateRegistration { vendor_id: String },

    /// A driver's `post_process` raised (§7 `PostProcessError`). Callers
    /// are expected to catch this and substitute a sentinel error
    /// envelope rather than propagate it further (§4.6 Resilience).
    PostProcess { reason: String },

    /// Looked up a vendor identifier with no registered driver and no
    /// applicable fallback.
    UnknownVendor { vendor_id: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateRegistration { vendor_id } => {
                write!(f, "duplicate driver registration for vendor '{vendor_id}'")
            }
            Error::PostProcess { reason } => write!(f, "PostProcessError: {reason}"),
            Error::UnknownVendor { vendor_id } => {
                write!(f, "no driver registered for vendor '{vendor_id}'")
            }
        }
    }
}

impl std::error::Error for Error {}
