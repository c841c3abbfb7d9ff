use std::path::PathBuf;

use serde_json::error::Category;

/// Failures raised while reading or decoding a state document.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid JSON at line {line}, column {column}: {source}")]
    Syntax {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("state document does not match the expected layout: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unable to read state file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a valid state file: {source}", path.display())]
    InvalidStateFile {
        path: PathBuf,
        #[source]
        source: Box<StateError>,
    },
}

impl StateError {
    /// True when the underlying input was not well-formed JSON.
    pub fn is_syntax(&self) -> bool {
        match self {
            StateError::Syntax { .. } => true,
            StateError::InvalidStateFile { source, .. } => source.is_syntax(),
            StateError::Decode(_) | StateError::Io { .. } => false,
        }
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            // truncated input is reported as a syntax failure too
            Category::Syntax | Category::Eof => {
                StateError::Syntax { line: err.line(), column: err.column(), source: err }
            }
            Category::Data | Category::Io => StateError::Decode(err),
        }
    }
}
