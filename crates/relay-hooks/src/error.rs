use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    /// No manifest at the resolved path. Normal when no hook is installed.
    #[error("Hook manifest not found: {0}")]
    NotFound(String),

    /// The manifest exists but could not be read or parsed.
    #[error("Hook manifest invalid: {0}")]
    InvalidManifest(String),

    /// The hook process could not be started or exited non-zero.
    #[error("Hook execution failed: {0}")]
    ExecutionFailed(String),

    /// The hook exceeded its allowed wall-clock budget.
    #[error("Hook timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The hook's stdout was not a valid decision.
    #[error("Hook reply invalid: {0}")]
    InvalidReply(String),
}

pub type Result<T> = std::result::Result<T, HookError>;
