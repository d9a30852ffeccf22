//! Two or more engines targeting the same remote ref.

mod common;

// ---------------------------------------------------------------------------
// Catch-up after a lost race
// ---------------------------------------------------------------------------

#[test]
fn second_writer_catches_up() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let remote = common::init_remote(dir.path());

    // Both engines bootstrap before either writes
    let mut first = common::open_store(&remote, dir.path().join("first"));
    let mut second = common::open_store(&remote, dir.path().join("second"));

    first.put(["a".to_string()]).unwrap();

    // The second engine's push is rejected, it fetches, resets and retries
    second.put(["b".to_string()]).unwrap();
    assert_eq!(second.current().unwrap(), common::set(&["a", "b"]));

    // The first engine still sees its own snapshot until its next put
    assert_eq!(first.current().unwrap(), common::set(&["a"]));
    first.put(["c".to_string()]).unwrap();
    assert_eq!(first.current().unwrap(), common::set(&["a", "b", "c"]));
}

#[test]
fn convergence_of_three_writers() {
    let dir = tempfile::tempdir().unwrap();
    let remote = common::init_remote(dir.path());

    let mut stores: Vec<common::StringStore> = (0..3)
        .map(|i| common::open_store(&remote, dir.path().join(format!("writer{}", i))))
        .collect();

    for (i, store) in stores.iter_mut().enumerate() {
        store.put([format!("item{}", i)]).unwrap();
    }

    // The last writer to publish has seen everything
    assert_eq!(
        stores[2].current().unwrap(),
        common::set(&["item0", "item1", "item2"])
    );

    // Every writer converges on its next successful put
    for store in stores.iter_mut() {
        store.put(["fin".to_string()]).unwrap();
    }
    assert_eq!(
        stores[0].current().unwrap(),
        common::set(&["item0", "item1", "item2", "fin"])
    );
}

// ---------------------------------------------------------------------------
// Concurrent writers of the same item
// ---------------------------------------------------------------------------

#[test]
fn same_item_from_two_writers_converges_without_new_commit() {
    let dir = tempfile::tempdir().unwrap();
    let remote = common::init_remote(dir.path());

    let mut first = common::open_store(&remote, dir.path().join("first"));
    let mut second = common::open_store(&remote, dir.path().join("second"));

    first.put(["same".to_string()]).unwrap();
    let head = common::remote_head(&remote);

    // After catching up, the second engine finds the item already
    // present and publishes nothing new
    second.put(["same".to_string()]).unwrap();
    assert_eq!(common::remote_head(&remote), head);
    assert_eq!(second.current().unwrap(), common::set(&["same"]));
}

// ---------------------------------------------------------------------------
// Remote history stays linear
// ---------------------------------------------------------------------------

#[test]
fn lost_races_leave_no_extra_commits() {
    let dir = tempfile::tempdir().unwrap();
    let remote = common::init_remote(dir.path());

    let mut first = common::open_store(&remote, dir.path().join("first"));
    let mut second = common::open_store(&remote, dir.path().join("second"));

    first.put(["a".to_string()]).unwrap();
    second.put(["b".to_string()]).unwrap();

    // initial + first's update + second's post-catch-up update; the
    // second engine's rejected commit never reached the remote
    assert_eq!(common::remote_commit_count(&remote), 3);
}
