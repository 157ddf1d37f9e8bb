use std::fmt;

/// Result type for wirlwind-types operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer.
#[derive(Debug)]
pub enum Error {
    /// A row value could not be coerced to the schema-declared type.
    Coercion { field: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Coercion { field, reason } => {
                write!(f, "coercion error on field '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}
