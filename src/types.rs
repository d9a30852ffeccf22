use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Author/committer identity.
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            name: "refstore".into(),
            email: "refstore@localhost".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// OpenOptions
// ---------------------------------------------------------------------------

/// Options for opening a `RefStore`.
///
/// Every field is an opaque string/path passed through to the version
/// control layer; none is interpreted by the store itself.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Remote branch holding the set. Defaults to `"storage"`.
    pub branch: Option<String>,
    /// Payload file path inside the working copy. Defaults to
    /// `"storage.json"`.
    pub file_name: Option<PathBuf>,
    /// Commit author name.
    pub author: Option<String>,
    /// Commit author email.
    pub email: Option<String>,
    /// Commit message used for every update.
    pub message: Option<String>,
}

