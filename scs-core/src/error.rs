use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing configuration key: {0}")]
    MissingKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("IO error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Program not found: {program} ({reason})")]
    ProgramNotFound { program: String, reason: String },

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed return code: {}", describe_code(*code))]
    CommandFailed { command: String, code: Option<i32> },
}

impl SetupError {
    /// Wrap an IO error with the path it happened on.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SetupError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
