use std::fmt;

/// Result type for glaze-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while declaring or constructing presenters.
///
/// Missing source data never shows up here: the resolver absorbs it as
/// `Value::Null`.
#[derive(Debug)]
pub enum Error {
    /// An unrecognized resolver option key
    IllegalOption(String),

    /// A recognized option key with a value of the wrong shape
    InvalidOption { key: String, reason: String },

    /// A field declaration without any field names
    EmptyKeys,

    /// Two classes registered under the same name
    DuplicateClass(String),

    /// A parent class that was never registered
    UnknownClass(String),

    /// A class that (transitively) extends itself
    InheritanceCycle(String),

    /// A method or transform referenced by a field but defined nowhere on the
    /// class chain
    UnknownMethod { class: String, method: String },

    /// Read or write of a field the presenter does not declare
    UnknownField(String),

    /// Malformed declaration file
    Config(String),

    /// IO operation failed
    Io(std::io::Error),

    /// Failure raised from a hydration callback
    Internal(anyhow::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IllegalOption(key) => write!(f, "Illegal option: {}", key),
            Error::InvalidOption { key, reason } => {
                write!(f, "Invalid value for option '{}': {}", key, reason)
            }
            Error::EmptyKeys => write!(f, "keys cannot be empty"),
            Error::DuplicateClass(name) => {
                write!(f, "Presenter class '{}' is already registered", name)
            }
            Error::UnknownClass(name) => write!(f, "Unknown presenter class: {}", name),
            Error::InheritanceCycle(name) => {
                write!(f, "Presenter class '{}' inherits from itself", name)
            }
            Error::UnknownMethod { class, method } => {
                write!(f, "Undefined method '{}' for presenter '{}'", method, class)
            }
            Error::UnknownField(name) => write!(f, "Unknown field: {}", name),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Internal(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_option_message() {
        let err = Error::IllegalOption("colour".to_string());
        assert_eq!(err.to_string(), "Illegal option: colour");
    }

    #[test]
    fn test_internal_error_keeps_source() {
        let err = Error::from(anyhow::anyhow!("hydration exploded"));
        let msg = err.to_string();

        assert!(msg.starts_with("Internal error:"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
