//! The file-backed set, bound to one working copy.

use std::collections::BTreeSet;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::codec::SetCodec;
use crate::error::{Error, Result};
use crate::types::Signature;
use crate::vcs::Vcs;

/// Reads and updates the payload file of a single working copy.
///
/// The entire file content encodes the full set; one commit is one
/// full-set snapshot. `WorkingSet` holds no cache of its own and every
/// read decodes the current checkout, so after the working copy is
/// reset to a new remote position the next read reflects it without
/// any invalidation step.
#[derive(Debug)]
pub struct WorkingSet<T, C> {
    root: PathBuf,
    file_name: PathBuf,
    signature: Signature,
    message: String,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> WorkingSet<T, C>
where
    T: Ord + Clone,
    C: SetCodec<T>,
{
    pub fn new(
        root: impl Into<PathBuf>,
        file_name: impl Into<PathBuf>,
        signature: Signature,
        message: impl Into<String>,
        codec: C,
    ) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
            signature,
            message: message.into(),
            codec,
            _marker: PhantomData,
        }
    }

    /// Decode the payload file from the current checkout.
    pub fn current(&self) -> Result<BTreeSet<T>> {
        let path = self.root.join(&self.file_name);
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        self.codec.decode(&content)
    }

    /// Union `items` into the set and commit, unless the encoded
    /// content is unchanged (no empty commits).
    pub fn put<V: Vcs>(&self, vcs: &V, items: &[T]) -> Result<()> {
        let path = self.root.join(&self.file_name);
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;

        let mut set = self.codec.decode(&content)?;
        set.extend(items.iter().cloned());

        let encoded = self.codec.encode(&set)?;
        if encoded == content {
            return Ok(());
        }

        fs::write(&path, &encoded).map_err(|e| Error::io(&path, e))?;
        vcs.add(&self.root, &self.file_name)?;
        vcs.commit(&self.root, &self.message, &self.signature)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}
