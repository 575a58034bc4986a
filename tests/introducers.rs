//! Introducer list editing against a scratch Tahoe home.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use plinth_modules::edit::{
    with_config, write_atomic_with, ConfigDocument, EditError, EditSession, LoadError,
};
use plinth_modules::tahoe::{IntroducerEntry, RestartError, TahoeError, TahoeNode};
use serde_yaml::Value;

mod common;
use common::{tahoe_home, RecordingRunner};

const INTRODUCERS: &str = "\
# Introducers this storage node connects to.
introducers:
  friend:
    furl: pb://friend@tcp:friend.example:3456/swiss   # kept by hand
nickname: freedombox
";

fn setup(runner: RecordingRunner) -> (tempfile::TempDir, TahoeNode<RecordingRunner>) {
    let dir = tempfile::tempdir().unwrap();
    let config = tahoe_home(dir.path(), INTRODUCERS);
    (dir, TahoeNode::new(config, runner))
}

fn file_of(node: &TahoeNode<RecordingRunner>) -> PathBuf {
    node.config().introducers_file()
}

#[tokio::test]
async fn test_unmodified_session_keeps_bytes() {
    let (_dir, node) = setup(RecordingRunner::default());
    let path = file_of(&node);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    with_config(
        &path,
        || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), EditError>(())
        },
        |_doc: &mut ConfigDocument| Ok::<(), EditError>(()),
    )
    .await
    .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), INTRODUCERS);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_interrupted_write_keeps_original() {
    let (_dir, node) = setup(RecordingRunner::default());
    let path = file_of(&node);
    let dir = path.parent().unwrap().to_path_buf();

    let result = write_atomic_with(&path, |file| {
        file.write_all(b"introducers:\n  half")?;
        Err(io::Error::other("interrupted"))
    });

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), INTRODUCERS);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    assert_eq!(
        node.introducers().unwrap().list().unwrap(),
        vec![IntroducerEntry::new(
            "friend",
            "pb://friend@tcp:friend.example:3456/swiss"
        )]
    );
}

#[test]
fn test_interrupted_commit_keeps_original() {
    let (_dir, node) = setup(RecordingRunner::default());
    let path = file_of(&node);
    let dir = path.parent().unwrap().to_path_buf();

    let mut session = EditSession::open(&path).unwrap();
    session
        .document_mut()
        .mapping_mut("introducers")
        .unwrap()
        .insert(Value::from("mallory"), Value::from("pb://mallory"));

    let result = session.commit_with(|target, bytes| {
        write_atomic_with(target, |file| {
            file.write_all(&bytes[..bytes.len() / 2])?;
            Err(io::Error::other("interrupted"))
        })
    });

    assert!(matches!(result, Err(EditError::Write { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), INTRODUCERS);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[tokio::test]
async fn test_edits_keep_comments() {
    let runner = RecordingRunner::default();
    let dir = tempfile::tempdir().unwrap();
    let config = tahoe_home(
        dir.path(),
        "# keep me\nintroducers:\n  friend:\n    furl: pb://f # note\nnickname: box\n",
    );
    let node = TahoeNode::new(config, runner);
    let introducers = node.introducers().unwrap();

    introducers.add("alice", "pb://a").await.unwrap();
    assert_eq!(
        fs::read_to_string(introducers.path()).unwrap(),
        "# keep me\nintroducers:\n  friend:\n    furl: pb://f # note\n  alice:\n    furl: pb://a\nnickname: box\n"
    );

    introducers.remove("alice").await.unwrap();
    assert_eq!(
        fs::read_to_string(introducers.path()).unwrap(),
        "# keep me\nintroducers:\n  friend:\n    furl: pb://f # note\nnickname: box\n"
    );
}

#[tokio::test]
async fn test_numeric_pet_name_is_one_entry() {
    let runner = RecordingRunner::default();
    let dir = tempfile::tempdir().unwrap();
    let config = tahoe_home(dir.path(), "introducers:\n  2:\n    furl: pb://two\n");
    let node = TahoeNode::new(config, runner);
    let introducers = node.introducers().unwrap();

    assert_eq!(
        introducers.list().unwrap(),
        vec![IntroducerEntry::new("2", "pb://two")]
    );

    introducers.add("2", "pb://new").await.unwrap();
    assert_eq!(
        introducers.list().unwrap(),
        vec![IntroducerEntry::new("2", "pb://new")]
    );

    introducers.remove("2").await.unwrap();
    assert!(introducers.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_then_list() {
    let runner = RecordingRunner::default();
    let (_dir, node) = setup(runner.clone());
    let introducers = node.introducers().unwrap();

    introducers.add("alice", "furl://abc").await.unwrap();
    let listed = introducers.list().unwrap();
    assert!(listed.contains(&IntroducerEntry::new("alice", "furl://abc")));

    introducers.add("alice", "furl://xyz").await.unwrap();
    let listed = introducers.list().unwrap();
    let alices: Vec<_> = listed.iter().filter(|e| e.pet_name == "alice").collect();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].furl, "furl://xyz");

    // Existing entries, unrelated keys and comments survive the rewrite.
    assert_eq!(listed[0].pet_name, "friend");
    let doc = ConfigDocument::load(&file_of(&node)).unwrap();
    assert_eq!(doc.root().get("nickname"), Some(&Value::from("freedombox")));
    let text = fs::read_to_string(file_of(&node)).unwrap();
    assert!(text.starts_with("# Introducers this storage node connects to.\n"));
    assert!(text.contains("/swiss   # kept by hand\n"));

    assert_eq!(runner.commands(), vec!["tahoe restart storage_node"; 2]);
}

#[tokio::test]
async fn test_restart_runs_as_service_account_from_home() {
    let runner = RecordingRunner::default();
    let (dir, node) = setup(runner.clone());

    node.introducers()
        .unwrap()
        .add("alice", "pb://alice")
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].user.as_deref(), Some("tahoe"));
    assert_eq!(calls[0].cwd.as_deref(), Some(dir.path()));
}

#[tokio::test]
async fn test_remove_missing_fails_without_write() {
    let runner = RecordingRunner::default();
    let (_dir, node) = setup(runner.clone());

    let result = node.introducers().unwrap().remove("ghost").await;

    match result {
        Err(TahoeError::IntroducerNotFound { pet_name }) => assert_eq!(pet_name, "ghost"),
        other => panic!("expected not found, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(file_of(&node)).unwrap(), INTRODUCERS);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_remove_existing() {
    let runner = RecordingRunner::default();
    let (_dir, node) = setup(runner.clone());
    let introducers = node.introducers().unwrap();

    introducers.add("alice", "pb://alice").await.unwrap();
    introducers.remove("friend").await.unwrap();

    assert_eq!(
        introducers.list().unwrap(),
        vec![IntroducerEntry::new("alice", "pb://alice")]
    );
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn test_failed_body_discards_mutation() {
    let (_dir, node) = setup(RecordingRunner::default());
    let path = file_of(&node);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let result: Result<(), TahoeError> = with_config(
        &path,
        || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
        |doc| {
            doc.mapping_mut("introducers")
                .map_err(EditError::from)?
                .insert(Value::from("mallory"), Value::from("pb://mallory"));
            Err(TahoeError::InvalidIntroducer("rejected mid-edit".to_string()))
        },
    )
    .await;

    assert!(matches!(result, Err(TahoeError::InvalidIntroducer(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), INTRODUCERS);
    let names: Vec<_> = node
        .introducers()
        .unwrap()
        .list()
        .unwrap()
        .into_iter()
        .map(|e| e.pet_name)
        .collect();
    assert_eq!(names, vec!["friend"]);
}

#[tokio::test]
async fn test_callback_counts() {
    let (_dir, node) = setup(RecordingRunner::default());
    let path = file_of(&node);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    with_config(
        &path,
        || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), TahoeError>(())
        },
        |doc| {
            doc.mapping_mut("introducers")
                .map_err(EditError::from)?
                .insert(Value::from("bob"), Value::from("pb://bob"));
            Ok(())
        },
    )
    .await
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let counter = calls.clone();
    let failed: Result<(), TahoeError> = with_config(
        &path,
        || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
        |_doc| Err(TahoeError::DomainNotConfigured),
    )
    .await;
    assert!(failed.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_restart_keeps_committed_change() {
    let runner = RecordingRunner::failing_on("restart");
    let (_dir, node) = setup(runner.clone());
    let introducers = node.introducers().unwrap();

    let err = introducers.add("carol", "pb://carol").await.unwrap_err();

    assert!(err.is_committed());
    assert!(matches!(err, TahoeError::Restart(RestartError::Action { .. })));
    assert!(introducers
        .list()
        .unwrap()
        .contains(&IntroducerEntry::new("carol", "pb://carol")));
}

#[tokio::test]
async fn test_hung_restart_times_out() {
    let runner = RecordingRunner::hanging_on("restart");
    let (_dir, node) = setup(runner);
    let introducers = node.introducers().unwrap();

    let err = introducers.add("dave", "pb://dave").await.unwrap_err();

    assert!(matches!(
        err,
        TahoeError::Restart(RestartError::Timeout { secs: 1, .. })
    ));
    assert!(introducers
        .list()
        .unwrap()
        .contains(&IntroducerEntry::new("dave", "pb://dave")));
}

#[tokio::test]
async fn test_missing_file_is_load_error() {
    let (_dir, node) = setup(RecordingRunner::default());
    fs::remove_file(file_of(&node)).unwrap();
    let introducers = node.introducers().unwrap();

    assert!(matches!(
        introducers.list(),
        Err(TahoeError::Load(LoadError::NotFound { .. }))
    ));
    assert!(matches!(
        introducers.add("alice", "pb://alice").await,
        Err(TahoeError::Load(LoadError::NotFound { .. }))
    ));
}

#[tokio::test]
async fn test_malformed_file_is_load_error() {
    let (_dir, node) = setup(RecordingRunner::default());
    fs::write(file_of(&node), "introducers: [unterminated\n").unwrap();

    assert!(matches!(
        node.introducers().unwrap().list(),
        Err(TahoeError::Load(LoadError::Parse { .. }))
    ));
}

#[test]
fn test_introducers_need_domain_name() {
    let (_dir, node) = setup(RecordingRunner::default());
    fs::remove_file(node.config().domain_name_file()).unwrap();

    assert!(matches!(
        node.introducers(),
        Err(TahoeError::DomainNotConfigured)
    ));
    assert!(matches!(
        node.configured_domain_name(),
        Err(TahoeError::DomainNotConfigured)
    ));
}

#[test]
fn test_domain_name_round_trip() {
    let (_dir, node) = setup(RecordingRunner::default());
    assert_eq!(node.configured_domain_name().unwrap(), "box.example.org");

    node.set_domain_name("storage.example.net").unwrap();
    assert_eq!(node.configured_domain_name().unwrap(), "storage.example.net");

    assert!(matches!(
        node.set_domain_name("not a domain"),
        Err(TahoeError::InvalidDomainName(_))
    ));
    assert_eq!(node.configured_domain_name().unwrap(), "storage.example.net");
}

#[test]
fn test_local_introducer() {
    let (_dir, node) = setup(RecordingRunner::default());
    let furl_file = node.config().introducer_furl_file();
    fs::create_dir_all(furl_file.parent().unwrap()).unwrap();
    fs::write(&furl_file, "pb://local@tcp:box.example.org:3456/intro\n").unwrap();

    assert_eq!(
        node.local_introducer().unwrap(),
        IntroducerEntry::new("local", "pb://local@tcp:box.example.org:3456/intro")
    );
}
