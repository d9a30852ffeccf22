use std::path::PathBuf;

/// All errors produced by refstore.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The contention bound was exhausted without a successful publish.
    ///
    /// The only fatal outcome of retried remote operations; carries the
    /// last underlying cause.
    #[error("retry count exceeded after {attempts} attempts")]
    RetryExceeded {
        attempts: u32,
        #[source]
        source: Option<Box<Error>>,
    },

    /// The payload file could not be decoded. Never retried.
    #[error("corrupt payload: {0}")]
    Corrupt(String),

    /// The local repository already contains history where a fresh one
    /// was expected (partial state from an earlier failed bootstrap).
    #[error("local repository already contains history: {}", .0.display())]
    Diverged(PathBuf),

    /// The remote refused a non-force ref update.
    #[error("push rejected: {0}")]
    Rejected(String),

    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("git error: {0}")]
    Git(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

impl Error {
    pub fn retry_exceeded(attempts: u32, last: Option<Error>) -> Self {
        Self::RetryExceeded {
            attempts,
            source: last.map(Box::new),
        }
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }

    pub fn diverged(path: impl Into<PathBuf>) -> Self {
        Self::Diverged(path.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn ref_not_found(name: impl Into<String>) -> Self {
        Self::RefNotFound(name.into())
    }

    pub fn git(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Git(Box::new(err))
    }

    pub fn git_msg(msg: impl Into<String>) -> Self {
        Self::Git(msg.into().into())
    }

    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.into().display(), err),
        ))
    }
}
