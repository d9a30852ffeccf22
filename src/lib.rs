//! A replicated set store backed by a branch of a remote git repository.
//!
//! `refstore` keeps a set of typed items in a single file on a remote
//! ref. Independent processes on different machines read and append to
//! the shared set with no lock service or database: the remote's atomic
//! non-force ref update is the only point of serialization, and every
//! lost race is resolved by an optimistic fetch-reset-retry loop.
//!
//! # Key types
//!
//! - [`RefStore`] — the store. Bootstraps a local working copy from the
//!   remote ref (creating the ref if absent) and publishes updates with
//!   a bounded retry loop.
//! - [`SetCodec`] — encodes the whole set to the payload file's text
//!   and back. [`JsonLines`] is the provided one-JSON-document-per-line
//!   implementation.
//! - [`Vcs`] — the version-control seam. [`Git`] implements it with
//!   libgit2; tests substitute fakes.
//!
//! # Quick example
//!
//! ```rust,no_run
//! use refstore::{JsonLines, OpenOptions, RefStore};
//!
//! let mut store: RefStore<String, _> = RefStore::open(
//!     "https://example.com/shared.git",
//!     "/var/lib/myapp/storage",
//!     OpenOptions::default(),
//!     JsonLines::new(),
//! )
//! .unwrap();
//!
//! store.insert("seen/pr-17".to_string()).unwrap();
//! assert!(store.current().unwrap().contains("seen/pr-17"));
//! ```

pub mod bootstrap;
pub mod codec;
pub mod error;
pub mod git;
pub mod store;
pub mod types;
pub mod vcs;
pub mod working;

// Re-export primary public types at crate root.
pub use codec::{JsonLines, SetCodec};
pub use error::{Error, Result};
pub use git::Git;
pub use store::RefStore;
pub use types::{OpenOptions, Signature};
pub use vcs::{CommitId, Materialize, Vcs};
pub use working::WorkingSet;
