use std::fmt;

/// Result type for strato operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the engine and the CLI front-end
#[derive(Debug)]
pub enum Error {
    /// A validator or option-set check rejected the parsed arguments.
    /// The message is reported to the user verbatim.
    Validation(String),

    /// The requested command name or alias is not registered.
    /// Carries the sorted list of registered names so callers can
    /// print a helpful listing.
    CommandNotFound { name: String, available: Vec<String> },

    /// A command body or a nested command invocation failed.
    /// The message travels end-to-end unchanged regardless of
    /// nesting depth.
    Command(String),

    /// Settings store or command registration problem
    Config(String),

    /// IO operation failed
    Io(std::io::Error),
}

impl Error {
    /// The message a user should see for this error.
    pub fn message(&self) -> String {
        match self {
            Error::Validation(msg) | Error::Command(msg) | Error::Config(msg) => msg.clone(),
            Error::CommandNotFound { name, .. } => {
                format!("Command '{}' was not found", name)
            }
            Error::Io(err) => err.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::CommandNotFound { name, .. } => {
                write!(f, "Command '{}' was not found", name)
            }
            Error::Command(msg) => write!(f, "{}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
