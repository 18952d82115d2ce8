//! Error types for chrome-instrument

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Main error type for staging and instrumentation
#[derive(Error, Debug)]
pub enum InstrumentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to walk installation tree")]
    Glob(#[from] glob::GlobError),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Could not find {name} in {}", path.display())]
    ToolNotFound { name: String, path: PathBuf },

    #[error("Target \"{target}\" not found at {}", path.display())]
    MissingTarget { target: String, path: PathBuf },

    #[error("Failed to launch {}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to instrument \"{target}\" ({status}).")]
    ToolFailed { target: String, status: ExitStatus },
}
