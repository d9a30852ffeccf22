//! `Vcs` implementation on top of libgit2.
//!
//! `Git` is a stateless driver: every call opens the working copy at
//! the given path and uses an anonymous remote for the given location,
//! so one driver value can serve any number of stores. Ref updates on
//! push keep libgit2's standard non-force semantics; a rejected update
//! is surfaced as [`Error::Rejected`].

use std::cell::RefCell;
use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{Direction, ErrorCode, PushOptions, RemoteCallbacks, Repository, RepositoryInitOptions};

use crate::error::{Error, Result};
use crate::types::Signature;
use crate::vcs::{CommitId, Materialize, Vcs};

fn full_ref(branch: &str) -> String {
    format!("refs/heads/{}", branch)
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        CommitId::new(oid.to_string())
    }
}

/// Version control backed by libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git;

impl Git {
    pub fn new() -> Self {
        Git
    }

    fn open(&self, local: &Path) -> Result<Repository> {
        Repository::open(local).map_err(Error::git)
    }

    fn open_or_init(&self, local: &Path, branch: &str) -> Result<Repository> {
        if local.join(".git").exists() {
            return self.open(local);
        }
        std::fs::create_dir_all(local).map_err(|e| Error::io(local, e))?;
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(branch);
        Repository::init_opts(local, &opts).map_err(Error::git)
    }
}

/// Fetch `refname` from `remote` and return its position, read back
/// from FETCH_HEAD.
fn fetch_ref(repo: &Repository, remote: &str, refname: &str) -> Result<git2::Oid> {
    let mut origin = repo.remote_anonymous(remote).map_err(Error::git)?;
    origin.fetch(&[refname], None, None).map_err(Error::git)?;

    let mut fetched = None;
    repo.fetchhead_foreach(|name, _url, oid, _is_merge| {
        if name == refname {
            fetched = Some(*oid);
        }
        true
    })
    .map_err(Error::git)?;

    fetched.ok_or_else(|| Error::ref_not_found(refname))
}

impl Vcs for Git {
    fn materialize(&self, local: &Path, remote: &str, branch: &str) -> Result<Materialize> {
        let repo = self.open_or_init(local, branch)?;
        let refname = full_ref(branch);

        // Probe the advertised refs first: an absent ref is an expected
        // bootstrap state, not a transport fault.
        let mut origin = repo.remote_anonymous(remote).map_err(Error::git)?;
        origin.connect(Direction::Fetch).map_err(Error::git)?;
        let advertised = origin
            .list()
            .map_err(Error::git)?
            .iter()
            .any(|head| head.name() == refname);
        origin.disconnect().map_err(Error::git)?;
        drop(origin);

        if !advertised {
            return Ok(Materialize::RefAbsent);
        }

        let oid = fetch_ref(&repo, remote, &refname)?;
        repo.reference(&refname, oid, true, "materialize")
            .map_err(Error::git)?;
        repo.set_head(&refname).map_err(Error::git)?;
        repo.checkout_head(Some(CheckoutBuilder::new().force()))
            .map_err(Error::git)?;
        Ok(Materialize::Found)
    }

    fn init(&self, local: &Path, branch: &str) -> Result<()> {
        self.open_or_init(local, branch)?;
        Ok(())
    }

    fn is_empty(&self, local: &Path) -> Result<bool> {
        let repo = self.open(local)?;
        repo.is_empty().map_err(Error::git)
    }

    fn add(&self, local: &Path, file: &Path) -> Result<()> {
        let repo = self.open(local)?;
        let mut index = repo.index().map_err(Error::git)?;
        index.add_path(file).map_err(Error::git)?;
        index.write().map_err(Error::git)?;
        Ok(())
    }

    fn commit(&self, local: &Path, message: &str, signature: &Signature) -> Result<CommitId> {
        let repo = self.open(local)?;
        let sig = git2::Signature::now(&signature.name, &signature.email).map_err(Error::git)?;

        let mut index = repo.index().map_err(Error::git)?;
        let tree_oid = index.write_tree().map_err(Error::git)?;
        let tree = repo.find_tree(tree_oid).map_err(Error::git)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(Error::git)?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(Error::git(e)),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(Error::git)?;
        Ok(oid.into())
    }

    fn push(&self, local: &Path, commit: &CommitId, remote: &str, branch: &str) -> Result<()> {
        let repo = self.open(local)?;
        let mut origin = repo.remote_anonymous(remote).map_err(Error::git)?;

        // libgit2 reports a refused ref update through the callback, not
        // necessarily through the push call's return value.
        let rejected = RefCell::new(None::<String>);
        let mut callbacks = RemoteCallbacks::new();
        callbacks.push_update_reference(|refname, status| {
            if let Some(msg) = status {
                *rejected.borrow_mut() = Some(format!("{}: {}", refname, msg));
            }
            Ok(())
        });
        let mut opts = PushOptions::new();
        opts.remote_callbacks(callbacks);

        let refspec = format!("{}:{}", commit, full_ref(branch));
        origin
            .push(&[refspec.as_str()], Some(&mut opts))
            .map_err(Error::git)?;

        if let Some(reason) = rejected.borrow_mut().take() {
            return Err(Error::rejected(reason));
        }
        Ok(())
    }

    fn fetch(&self, local: &Path, remote: &str, branch: &str) -> Result<CommitId> {
        let repo = self.open(local)?;
        let oid = fetch_ref(&repo, remote, &full_ref(branch))?;
        Ok(oid.into())
    }

    fn checkout(&self, local: &Path, commit: &CommitId, force: bool) -> Result<()> {
        let repo = self.open(local)?;
        let oid = git2::Oid::from_str(commit.as_str()).map_err(Error::git)?;
        let object = repo.find_object(oid, None).map_err(Error::git)?;

        let mut builder = CheckoutBuilder::new();
        if force {
            builder.force();
        }
        repo.checkout_tree(&object, Some(&mut builder))
            .map_err(Error::git)?;
        repo.set_head_detached(oid).map_err(Error::git)?;
        Ok(())
    }

    fn head(&self, local: &Path) -> Result<CommitId> {
        let repo = self.open(local)?;
        let commit = repo
            .head()
            .map_err(Error::git)?
            .peel_to_commit()
            .map_err(Error::git)?;
        Ok(commit.id().into())
    }
}
