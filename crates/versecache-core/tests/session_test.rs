mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{dawn_and_dusk, fast_options, ScriptedSource};
use versecache_core::{
    ListState, PoemSession, RemoteError, StorageSession, StoreLocation, SyncResult,
};

fn session(source: ScriptedSource) -> PoemSession {
    PoemSession::new(
        Arc::new(StorageSession::in_memory()),
        Arc::new(source),
        fast_options(),
    )
}

#[tokio::test]
async fn test_list_state_moves_from_loading_to_ready() {
    let session = session(ScriptedSource::with_records(dawn_and_dusk()));
    assert!(session.is_loading());
    assert_eq!(session.list_state(), ListState::Loading);

    let snapshot = session.start().await.expect("start");
    assert!(snapshot.is_empty());
    assert_eq!(session.list_state(), ListState::Empty);

    let (result, snapshot) = session.sync_and_reload().await.expect("sync and reload");
    assert_eq!(result.inserted(), 2);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(session.list_state(), ListState::Ready(2));
    assert_eq!(session.poems().len(), 2);
    assert_eq!(session.last_sync(), Some(result));
}

#[tokio::test]
async fn test_sync_does_not_refresh_snapshot_on_its_own() {
    let session = session(ScriptedSource::with_records(dawn_and_dusk()));
    session.start().await.expect("start");

    assert_eq!(session.sync_if_empty().await.inserted(), 2);
    assert!(session.poems().is_empty());

    session.reload().await.expect("reload");
    assert_eq!(session.poems().len(), 2);
}

#[tokio::test]
async fn test_failed_sync_still_renders_empty_state() {
    let session = session(ScriptedSource::always_failing(|| RemoteError::Unauthorized));
    session.start().await.expect("start");

    let (result, snapshot) = session.sync_and_reload().await.expect("reload still works");
    assert!(result.is_failed());
    assert!(snapshot.is_empty());
    assert_eq!(session.list_state(), ListState::Empty);
}

#[tokio::test]
async fn test_second_session_start_skips_sync() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("localdata.db");

    let first = PoemSession::new(
        Arc::new(StorageSession::new(StoreLocation::File(path.clone()))),
        Arc::new(ScriptedSource::with_records(dawn_and_dusk())),
        fast_options(),
    );
    first.start().await.expect("start");
    first.sync_and_reload().await.expect("sync");

    // A later app start against the same file finds the poems already there.
    let source = Arc::new(ScriptedSource::with_records(dawn_and_dusk()));
    let second = PoemSession::new(
        Arc::new(StorageSession::new(StoreLocation::File(path))),
        source.clone(),
        fast_options(),
    );
    let snapshot = second.start().await.expect("start");
    assert_eq!(snapshot.len(), 2);

    let (result, _) = second.sync_and_reload().await.expect("sync");
    assert_eq!(result, SyncResult::Skipped);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_selection_hand_off() {
    let session = session(ScriptedSource::with_records(dawn_and_dusk()));
    session.start().await.expect("start");
    session.sync_and_reload().await.expect("sync");

    assert!(session.current_selection().is_none());

    let dusk = session.poems().find(2).cloned().expect("poem 2 cached");
    session.select(dusk.clone());
    assert_eq!(session.current_selection(), Some(dusk));

    let dawn = session.select_by_id(1).expect("poem 1 cached");
    assert_eq!(dawn.title, "Dawn");
    assert_eq!(session.current_selection(), Some(dawn.clone()));

    // Unknown id leaves the selection alone.
    assert!(session.select_by_id(99).is_none());
    assert_eq!(session.current_selection(), Some(dawn));

    session.clear_selection();
    assert!(session.current_selection().is_none());
}

#[tokio::test]
async fn test_storage_failure_puts_session_offline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").expect("write blocker");

    let session = PoemSession::new(
        Arc::new(StorageSession::new(StoreLocation::File(blocker.join("localdata.db")))),
        Arc::new(ScriptedSource::with_records(dawn_and_dusk())),
        fast_options(),
    );

    assert!(session.start().await.is_err());
    assert!(!session.is_loading());
    assert_eq!(session.list_state(), ListState::Unavailable);
    assert!(session.poems().is_empty());
}

#[tokio::test]
async fn test_two_sessions_starting_together_fetch_once() {
    let storage = Arc::new(StorageSession::in_memory());
    let source = Arc::new(
        ScriptedSource::with_records(dawn_and_dusk()).delayed(Duration::from_millis(50)),
    );
    let first = PoemSession::new(Arc::clone(&storage), source.clone(), fast_options());
    let second = PoemSession::new(Arc::clone(&storage), source.clone(), fast_options());

    let (a, b) = tokio::join!(first.sync_and_reload(), second.sync_and_reload());
    let (a, b) = (a.expect("first"), b.expect("second"));

    assert_eq!(a.0, b.0);
    assert!(!a.0.is_partial());
    assert_eq!(source.calls(), 1);
    assert_eq!(first.list_state(), ListState::Ready(2));
    assert_eq!(second.list_state(), ListState::Ready(2));
}
