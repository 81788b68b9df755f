use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Reasons a compiler version query produced no usable banner.
///
/// Callers of [`crate::detect`] never see these: every variant collapses into
/// "no version information". They exist so the reason can be logged.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("cannot split compiler invocation `{0}` into arguments")]
    InvalidInvocation(String),
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("error while waiting on `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Web assets directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Missing required files: {}", .0.join(", "))]
    MissingFiles(Vec<&'static str>),
    #[error("failed to listen on {addr}: {message}")]
    Bind { addr: String, message: String },
}
