use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::bootstrap;
use crate::codec::SetCodec;
use crate::error::{Error, Result};
use crate::git::Git;
use crate::types::{OpenOptions, Signature};
use crate::vcs::{CommitId, Vcs};
use crate::working::WorkingSet;

const MAX_ATTEMPTS: u32 = 10;

/// A set store whose source of truth is a branch of a remote repository.
///
/// Each instance exclusively owns one local working copy; two instances
/// must not share a working-copy path. Any number of instances, on any
/// number of machines, may target the same remote ref concurrently:
/// the remote's atomic non-force ref update is the only serialization
/// point, and [`put`](RefStore::put) resolves lost races by fetching,
/// resetting and retrying.
#[derive(Debug)]
pub struct RefStore<T, C, V = Git> {
    vcs: V,
    remote: String,
    local: PathBuf,
    branch: String,
    working: WorkingSet<T, C>,
    current: BTreeSet<T>,
}

impl<T, C> RefStore<T, C, Git>
where
    T: Ord + Clone,
    C: SetCodec<T>,
{
    /// Open the store over libgit2.
    ///
    /// Materializes `local` from the remote ref (creating the ref with
    /// an empty payload if absent) and primes the in-memory snapshot.
    pub fn open(
        remote: impl Into<String>,
        local: impl AsRef<Path>,
        options: OpenOptions,
        codec: C,
    ) -> Result<Self> {
        Self::open_with(Git::new(), remote, local, options, codec)
    }
}

impl<T, C, V> RefStore<T, C, V>
where
    T: Ord + Clone,
    C: SetCodec<T>,
    V: Vcs,
{
    /// Open the store over a caller-supplied version control backend.
    pub fn open_with(
        vcs: V,
        remote: impl Into<String>,
        local: impl AsRef<Path>,
        options: OpenOptions,
        codec: C,
    ) -> Result<Self> {
        let remote = remote.into();
        let local = local.as_ref().to_path_buf();

        let branch = options.branch.unwrap_or_else(|| "storage".into());
        let file_name = options.file_name.unwrap_or_else(|| "storage.json".into());
        let signature = Signature {
            name: options.author.unwrap_or_else(|| "refstore".into()),
            email: options.email.unwrap_or_else(|| "refstore@localhost".into()),
        };
        let message = options.message.unwrap_or_else(|| "Update storage".into());

        bootstrap::materialize(
            &vcs, &remote, &local, &branch, &file_name, &signature, &message,
        )?;

        let working = WorkingSet::new(&local, file_name, signature, message, codec);
        let current = working.current()?;

        Ok(Self {
            vcs,
            remote,
            local,
            branch,
            working,
            current,
        })
    }

    /// The current set, decoded fresh from the working copy.
    ///
    /// Reflects remote writers only up to the last reconcile; a
    /// successful [`put`](RefStore::put) catches up as a side effect.
    pub fn current(&self) -> Result<BTreeSet<T>> {
        self.working.current()
    }

    /// Add a single item. See [`put`](RefStore::put).
    pub fn insert(&mut self, item: T) -> Result<()> {
        self.put([item])
    }

    /// Durably merge `items` into the remote set.
    ///
    /// Applies the union locally, then publishes it with a non-force
    /// push. A rejected push means the remote moved: the store fetches
    /// the remote position and, if it has not been seen yet, resets
    /// onto it and retries. Catching up is forward progress and does
    /// not consume the retry bound; only genuine contention (no new
    /// remote state observed) counts against the bound of 10 attempts.
    ///
    /// On success all of `items` are in the remote set. On
    /// [`Error::RetryExceeded`] nothing was published by this call,
    /// though the items may sit in the local working copy awaiting a
    /// future successful push. Corrupt payload content fails
    /// immediately and is never retried.
    pub fn put<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let mut attempts = 0;
        let mut last_err = None;
        let mut last_remote: Option<CommitId> = None;

        while attempts < MAX_ATTEMPTS {
            self.working.put(&self.vcs, &items)?;
            let updated = self.working.current()?;
            if updated == self.current {
                // Nothing changed since the last reconcile.
                return Ok(());
            }

            match self.publish() {
                Ok(()) => {
                    self.current = updated;
                    return Ok(());
                }
                Err(err) => {
                    warn!("publish to {} failed: {}", self.branch, err);
                    last_err = Some(err);
                }
            }

            match self.vcs.fetch(&self.local, &self.remote, &self.branch) {
                Ok(remote_head) if last_remote.as_ref() != Some(&remote_head) => {
                    // The remote has content we haven't seen. Reset onto it,
                    // dropping our unpublished commit; the items are
                    // re-applied on the next pass. Progress, not contention.
                    debug!("catching up {} to {}", self.branch, remote_head);
                    match self.vcs.checkout(&self.local, &remote_head, true) {
                        Ok(()) => last_remote = Some(remote_head),
                        Err(err) => {
                            last_err = Some(err);
                            attempts += 1;
                        }
                    }
                }
                Ok(_) => attempts += 1,
                Err(err) => {
                    last_err = Some(err);
                    attempts += 1;
                }
            }
        }

        Err(Error::retry_exceeded(attempts, last_err))
    }

    fn publish(&self) -> Result<()> {
        let head = self.vcs.head(&self.local)?;
        self.vcs.push(&self.local, &head, &self.remote, &self.branch)
    }

    /// Path of the local working copy.
    pub fn path(&self) -> &Path {
        &self.local
    }

    /// The remote location this store publishes to.
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// The remote branch holding the set.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// The identity used for commits.
    pub fn signature(&self) -> &Signature {
        self.working.signature()
    }
}
