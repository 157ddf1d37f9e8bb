use std::fmt;

/// Result type for wirlwind-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the core layer (§7 error taxonomy).
#[derive(Debug)]
pub enum Error {
    /// Neither the local override directory nor the system template
    /// directory resolved the filename (§4.1, §7 `TemplateNotFound`).
    TemplateNotFound {
        filename: String,
        local_path_searched: String,
        system_path_searched: String,
    },

    /// A template failed to compile, or a parser implementation raised
    /// (§7 `ParseError`).
    ParseError { reason: String },

    /// Every parser in the chain yielded `ParseEmpty` or `ParseError`
    /// (§7 `AllParsersFailed`).
    AllParsersFailed { reasons: Vec<String> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TemplateNotFound {
                filename,
                local_path_searched,
                system_path_searched,
            } => write!(
                f,
                "TemplateNotFound: '{filename}' not found in '{local_path_searched}' or '{system_path_searched}'"
            ),
            Error::ParseError { reason } => write!(f, "ParseError: {reason}"),
            Error::AllParsersFailed { reasons } => {
                write!(f, "AllParsersFailed: {}", reasons.join("; "))
            }
        }
    }
}

impl std::error::Error for Error {}
