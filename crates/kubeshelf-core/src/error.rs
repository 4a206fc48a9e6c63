use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    ExternalCommandFailed(String),
    NoSelection,
    ConfirmationDeclined,
    Io(String),
    Parse(String),
}

impl StoreError {
    /// Errors a command reports and then stops on, without treating the run as failed.
    pub fn is_user_abort(&self) -> bool {
        matches!(self, Self::ConfirmationDeclined)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::ExternalCommandFailed(msg) => write!(f, "External command failed: {msg}"),
            Self::NoSelection => write!(f, "No context selected"),
            Self::ConfirmationDeclined => write!(f, "Aborted"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
