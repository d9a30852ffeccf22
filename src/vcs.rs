//! The version-control seam.
//!
//! `Vcs` is the single doorway to version control: every repository
//! operation the store performs flows through this trait, and no other
//! module touches the git backend directly. The store only needs a
//! handful of blocking, I/O-bound primitives; [`crate::git::Git`]
//! implements them with libgit2, and tests substitute scripted fakes.

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::types::Signature;

// ---------------------------------------------------------------------------
// CommitId
// ---------------------------------------------------------------------------

/// Identifier of a commit, as a hex object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Materialize
// ---------------------------------------------------------------------------

/// Outcome of a materialize attempt.
///
/// "Ref doesn't exist yet" is an expected state during bootstrap, not a
/// fault, so it is reported as data rather than as an error. Transport
/// faults (unreachable remote, failed transfer) are `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialize {
    /// The remote ref exists and the working copy now matches it.
    Found,
    /// The remote is reachable but does not have the ref.
    RefAbsent,
}

// ---------------------------------------------------------------------------
// Vcs
// ---------------------------------------------------------------------------

/// Version-control operations the store depends on.
///
/// All operations are blocking and act on the working copy at `local`.
/// `remote` is an opaque location (URL or filesystem path) and `branch`
/// a short ref name; neither is interpreted by the store.
pub trait Vcs {
    /// Produce a working copy at `local` matching the remote ref.
    fn materialize(&self, local: &Path, remote: &str, branch: &str) -> Result<Materialize>;

    /// Initialize an empty repository at `local` (open it if one is
    /// already there).
    fn init(&self, local: &Path, branch: &str) -> Result<()>;

    /// Whether the repository at `local` has no history.
    fn is_empty(&self, local: &Path) -> Result<bool>;

    /// Stage `file` (relative to the working copy root).
    fn add(&self, local: &Path, file: &Path) -> Result<()>;

    /// Commit the staged changes, returning the new commit id.
    fn commit(&self, local: &Path, message: &str, signature: &Signature) -> Result<CommitId>;

    /// Publish `commit` to the remote ref with standard non-force
    /// semantics; fails if the remote has diverged.
    fn push(&self, local: &Path, commit: &CommitId, remote: &str, branch: &str) -> Result<()>;

    /// Retrieve the remote ref's current position.
    fn fetch(&self, local: &Path, remote: &str, branch: &str) -> Result<CommitId>;

    /// Check out `commit`, discarding local modifications when `force`.
    fn checkout(&self, local: &Path, commit: &CommitId, force: bool) -> Result<()>;

    /// The working copy's current head commit.
    fn head(&self, local: &Path) -> Result<CommitId>;
}
