//! Best-effort play counting.
//!
//! Reports are queued to a worker thread that owns `plays.toml`; callers never
//! wait on disk I/O and failures are only logged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::TrackId;

/// Sink for "this track started playing" notifications.
pub trait PlayReporter {
    /// Fire-and-forget; must not block and must not fail.
    fn report_play(&self, id: &TrackId);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlayCounts {
    #[serde(default)]
    plays: BTreeMap<TrackId, u64>,
}

fn read_counts(path: &Path) -> Result<PlayCounts, Box<dyn std::error::Error>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PlayCounts::default()),
        Err(e) => Err(e.into()),
    }
}

/// Load stored play counts; an unreadable file counts as empty.
pub fn load_counts(path: &Path) -> BTreeMap<TrackId, u64> {
    match read_counts(path) {
        Ok(counts) => counts.plays,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable play counts");
            BTreeMap::new()
        }
    }
}

fn bump(path: &Path, id: &TrackId) -> Result<u64, Box<dyn std::error::Error>> {
    let mut counts = read_counts(path)?;
    let entry = counts.plays.entry(id.clone()).or_insert(0);
    *entry += 1;
    let total = *entry;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string(&counts)?)?;
    Ok(total)
}

pub struct PlayCounter {
    tx: Sender<TrackId>,
    join: JoinHandle<()>,
}

impl PlayCounter {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<TrackId>();
        let join = thread::spawn(move || {
            for id in rx {
                match bump(&path, &id) {
                    Ok(total) => debug!(track = %id, total, "play counted"),
                    Err(e) => warn!(track = %id, error = %e, "failed to record play"),
                }
            }
        });
        Self { tx, join }
    }

    /// A cloneable reporter feeding this counter's worker.
    ///
    /// Every reporter must be dropped before [`PlayCounter::shutdown`] or the
    /// worker never drains.
    pub fn reporter(&self) -> PlayReports {
        PlayReports {
            tx: self.tx.clone(),
        }
    }

    /// Flush queued reports and stop the worker.
    pub fn shutdown(self) {
        drop(self.tx);
        let _ = self.join.join();
    }
}

fn send_report(tx: &Sender<TrackId>, id: &TrackId) {
    if tx.send(id.clone()).is_err() {
        debug!(track = %id, "play counter already stopped");
    }
}

impl PlayReporter for PlayCounter {
    fn report_play(&self, id: &TrackId) {
        send_report(&self.tx, id);
    }
}

#[derive(Clone)]
pub struct PlayReports {
    tx: Sender<TrackId>,
}

impl PlayReporter for PlayReports {
    fn report_play(&self, id: &TrackId) {
        send_report(&self.tx, id);
    }
}
