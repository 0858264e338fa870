use dedication_board::events::{BoardSettings, DedicationItem, ItemId};
use dedication_board::tasks::board::{self, BoardDocument};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const BOARD: &str = r#"{
  "items": [
    {"id": "a1", "type": "memorial", "mainName": "ר' משה", "hebrewDate": "י\"ז בחשון תשפ\"ג"},
    {"id": 2, "type": "birthday", "mainName": "שרה", "date": "2023-11-01"}
  ],
  "settings": {"slideDuration": 7000}
}"#;

#[test]
fn load_board_reads_items_and_settings() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("board.json");
    fs::write(&path, BOARD).unwrap();

    let doc = board::load_board(&path).unwrap();
    assert_eq!(doc.items.len(), 2);
    assert_eq!(doc.items[0].id, Some(ItemId::Text("a1".into())));
    assert_eq!(doc.items[1].kind, "birthday");
    assert_eq!(doc.settings.slide_duration(), Some(Duration::from_millis(7000)));
}

#[test]
fn missing_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let err = board::load_board(&tmp.path().join("nope.json")).unwrap_err();
    assert!(format!("{err:#}").contains("nope.json"), "{err:#}");
}

#[test]
fn corrupt_file_keeps_last_good_document() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("board.json");
    fs::write(&path, BOARD).unwrap();
    let good = board::load_board(&path).unwrap();

    fs::write(&path, "{ \"items\": [ broken").unwrap();
    let kept = board::reload_or_keep(&path, &good);
    assert_eq!(kept, good);

    fs::write(&path, "[]").unwrap();
    assert_eq!(board::reload_or_keep(&path, &good), BoardDocument::default());
}

async fn wait_for_items(
    rx: &mut watch::Receiver<Vec<DedicationItem>>,
    len: usize,
) -> Vec<DedicationItem> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if rx.borrow_and_update().len() == len {
                return rx.borrow().clone();
            }
            rx.changed().await.expect("board task dropped sender");
        }
    })
    .await
    .expect("timeout waiting for board items")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn publishes_startup_document_and_edits() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("board.json");
    fs::write(&path, BOARD).unwrap();

    let (items_tx, mut items_rx) = watch::channel(Vec::new());
    let (settings_tx, settings_rx) = watch::channel(BoardSettings::default());
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(board::run(
        path.clone(),
        items_tx,
        settings_tx,
        cancel.clone(),
    ));

    let items = wait_for_items(&mut items_rx, 2).await;
    assert_eq!(items[1].main_name.as_deref(), Some("שרה"));
    assert_eq!(settings_rx.borrow().slide_duration, Some(7000));

    // Give the watcher a moment to register before editing.
    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(&path, r#"[{"id": 9, "mainName": "חדש"}]"#).unwrap();
    let items = wait_for_items(&mut items_rx, 1).await;
    assert_eq!(items[0].id, Some(ItemId::Number(9)));

    cancel.cancel();
    handle.await.unwrap().unwrap();
}
