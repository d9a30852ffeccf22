use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use refstore::{JsonLines, OpenOptions, RefStore};

pub type StringStore = RefStore<String, JsonLines<String>>;

/// Route store warnings to the test harness (visible with RUST_LOG).
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a bare repository under `dir` to act as the remote.
pub fn init_remote(dir: &Path) -> String {
    let path = dir.join("remote.git");
    git2::Repository::init_bare(&path).unwrap();
    path.to_str().unwrap().to_string()
}

pub fn open_store(remote: &str, local: impl Into<PathBuf>) -> StringStore {
    RefStore::open(
        remote,
        local.into(),
        OpenOptions::default(),
        JsonLines::new(),
    )
    .unwrap()
}

/// Position of the default storage branch on the remote, if it exists.
#[allow(dead_code)]
pub fn remote_head(remote: &str) -> Option<String> {
    let repo = git2::Repository::open(remote).unwrap();
    repo.refname_to_id("refs/heads/storage")
        .ok()
        .map(|oid| oid.to_string())
}

/// Number of commits on the remote storage branch.
#[allow(dead_code)]
pub fn remote_commit_count(remote: &str) -> usize {
    let repo = git2::Repository::open(remote).unwrap();
    let head = repo.refname_to_id("refs/heads/storage").unwrap();
    let mut walk = repo.revwalk().unwrap();
    walk.push(head).unwrap();
    walk.count()
}

#[allow(dead_code)]
pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
