use std::process::ExitStatus;

pub type InstallResult<T> = Result<T, InstallError>;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("invalid invocation: {0}")]
    BadOptions(String),

    #[error("host prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error(
        "insufficient memory: {available_kb} kB available, at least {required_kb} kB required"
    )]
    InsufficientMemory { available_kb: u64, required_kb: u64 },

    #[error("missing certificate files: {}", .0.join(", "))]
    MissingCertificates(Vec<String>),

    #[error("{service} is not healthy: {hint}")]
    ServiceUnhealthy { service: String, hint: String },

    #[error("command failed: {command}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
