//! Bootstrapping a working copy from a remote ref that may not exist.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::types::Signature;
use crate::vcs::{Materialize, Vcs};

const MAX_ATTEMPTS: u32 = 10;

/// Produce a working copy at `local` matching the remote ref, creating
/// the ref with an empty payload if it does not yet exist.
///
/// Safe to run from multiple processes targeting the same fresh ref: at
/// most one wins the creation race; the rest lose the push and converge
/// on a later materialize attempt. A local repository that already
/// contains history when the ref is absent is conflicting partial state
/// from an earlier failure; it is never overwritten, only retried.
pub fn materialize<V: Vcs>(
    vcs: &V,
    remote: &str,
    local: &Path,
    branch: &str,
    file_name: &Path,
    signature: &Signature,
    message: &str,
) -> Result<()> {
    let mut last_err = None;

    for _ in 0..MAX_ATTEMPTS {
        match vcs.materialize(local, remote, branch) {
            Ok(Materialize::Found) => return Ok(()),
            Ok(Materialize::RefAbsent) => {
                match create_initial(vcs, remote, local, branch, file_name, signature, message) {
                    Ok(()) => return Ok(()),
                    Err(err) => {
                        warn!("initial creation of {} failed: {}", branch, err);
                        last_err = Some(err);
                    }
                }
            }
            Err(err) => {
                warn!("materialize of {} failed: {}", branch, err);
                last_err = Some(err);
            }
        }
    }

    Err(Error::retry_exceeded(MAX_ATTEMPTS, last_err))
}

/// Create the ref with an empty payload file and push it as the first
/// commit. Loses to any concurrent creator: the non-force push fails
/// and the caller retries from a plain materialize.
fn create_initial<V: Vcs>(
    vcs: &V,
    remote: &str,
    local: &Path,
    branch: &str,
    file_name: &Path,
    signature: &Signature,
    message: &str,
) -> Result<()> {
    vcs.init(local, branch)?;
    if !vcs.is_empty(local)? {
        return Err(Error::diverged(local));
    }

    info!("creating initial storage for {}", branch);
    let file = local.join(file_name);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(&file, "").map_err(|e| Error::io(&file, e))?;

    vcs.add(local, file_name)?;
    let first = vcs.commit(local, message, signature)?;
    vcs.push(local, &first, remote, branch)?;
    Ok(())
}
