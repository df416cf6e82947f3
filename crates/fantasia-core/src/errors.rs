//! Error taxonomy.
//!
//! Every variant is fatal to the current run; nothing here is retried.
use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FantasiaError>;

#[derive(Debug, Error)]
pub enum FantasiaError {
    #[error("{what} '{}' does not exist", .path.display())]
    InputNotFound { what: &'static str, path: PathBuf },

    #[error("required parameter `{name}` is missing: {reason}")]
    MissingParameter { name: &'static str, reason: String },

    #[error("mode '{0}' is not valid, must be cpu or gpu")]
    InvalidMode(String),

    #[error("{stage} stage failed ({status}): {command}")]
    ExternalProcess {
        stage: &'static str,
        command: String,
        status: ProcessStatus,
    },

    #[error("run configuration '{}' is malformed: {message}", .path.display())]
    ConfigSchema { path: PathBuf, message: String },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize document for '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl FantasiaError {
    pub(crate) fn missing(name: &'static str, reason: impl Into<String>) -> Self {
        Self::MissingParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// How an external stage ended when it did not succeed.
#[derive(Debug, Clone)]
pub enum ProcessStatus {
    /// The process could not be started at all.
    SpawnFailed(String),
    /// The process ran and returned a non-success status.
    Exited(ExitStatus),
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::SpawnFailed(reason) => write!(f, "could not start: {reason}"),
            ProcessStatus::Exited(status) => match status.code() {
                Some(code) => write!(f, "exit code {code}"),
                None => write!(f, "terminated by signal"),
            },
        }
    }
}
