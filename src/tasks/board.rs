use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher, recommended_watcher};
use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::events::{BoardSettings, DedicationItem};

/// Items and settings as last read from the board document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardDocument {
    pub items: Vec<DedicationItem>,
    pub settings: BoardSettings,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Full {
        #[serde(default)]
        items: Vec<DedicationItem>,
        #[serde(default)]
        settings: BoardSettings,
    },
    ItemsOnly(Vec<DedicationItem>),
}

/// Parse a board document: either `{ "items": [...], "settings": {...} }` or a bare
/// array of items.
pub fn parse_board(text: &str) -> Result<BoardDocument> {
    let raw: RawDocument = serde_json::from_str(text).context("malformed board document")?;
    Ok(match raw {
        RawDocument::Full { items, settings } => BoardDocument { items, settings },
        RawDocument::ItemsOnly(items) => BoardDocument {
            items,
            settings: BoardSettings::default(),
        },
    })
}

pub fn load_board(path: &Path) -> Result<BoardDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_board(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Read the file, or keep `last_good` when it cannot be read or parsed.
pub fn reload_or_keep(path: &Path, last_good: &BoardDocument) -> BoardDocument {
    match load_board(path) {
        Ok(doc) => doc,
        Err(err) => {
            error!(path = %path.display(), "{err:#}; keeping previous board");
            last_good.clone()
        }
    }
}

/// Publish the board document and its later edits until cancelled.
#[instrument(skip(path, items_tx, settings_tx, cancel), fields(path = %path.display()))]
pub async fn run(
    path: PathBuf,
    items_tx: watch::Sender<Vec<DedicationItem>>,
    settings_tx: watch::Sender<BoardSettings>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut current = reload_or_keep(&path, &BoardDocument::default());
    publish(&current, &items_tx, &settings_tx);
    info!(items = current.items.len(), "board loaded");

    // Editors replace files by rename, so watch the directory and filter by name.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(ToOwned::to_owned)
        .with_context(|| format!("{} does not name a file", path.display()))?;

    let (watch_tx, mut watch_rx) = mpsc::channel::<notify::Result<Event>>(32);
    let mut watcher = recommended_watcher(move |res| {
        let _ = watch_tx.blocking_send(res);
    })?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;
    info!(watching = %dir.display(), "notify watcher initialized");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("cancel received; exiting board task");
                break;
            }
            Some(res) = watch_rx.recv() => match res {
                Ok(event) => {
                    let touches_board = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if !touches_board {
                        continue;
                    }
                    match event.kind {
                        EventKind::Create(_) | EventKind::Modify(_) => {
                            debug!(kind = ?event.kind, "board changed");
                            current = reload_or_keep(&path, &current);
                            publish(&current, &items_tx, &settings_tx);
                        }
                        EventKind::Remove(_) => {
                            warn!("board file removed; keeping previous board");
                        }
                        _ => debug!(kind = ?event.kind, "fs: ignored"),
                    }
                }
                Err(err) => error!("watch error: {err}"),
            }
        }
    }
    Ok(())
}

fn publish(
    doc: &BoardDocument,
    items_tx: &watch::Sender<Vec<DedicationItem>>,
    settings_tx: &watch::Sender<BoardSettings>,
) {
    let items_changed = items_tx.send_if_modified(|items| {
        if *items == doc.items {
            return false;
        }
        items.clone_from(&doc.items);
        true
    });
    let settings_changed = settings_tx.send_if_modified(|settings| {
        if *settings == doc.settings {
            return false;
        }
        settings.clone_from(&doc.settings);
        true
    });
    if items_changed || settings_changed {
        info!(
            items = doc.items.len(),
            items_changed, settings_changed, "board published"
        );
    }
}
