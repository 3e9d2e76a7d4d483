//! The beat catalog: track metadata plus locator resolution.
//!
//! A catalog directory either carries a `catalog.toml` manifest or is scanned
//! for audio files. Trigger sites resolve a track's audio source here before
//! asking the player to play it.

mod manifest;
mod model;
mod plays;
mod scan;
mod source;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::CatalogSettings;
use crate::error::CatalogError;

pub use model::*;
pub use plays::{PlayCounter, PlayReporter, load_counts};
pub use source::{AudioSource, file_url};

#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    tracks: Vec<Track>,
}

impl Catalog {
    /// Load `dir`, preferring its manifest and falling back to a scan.
    pub fn load(dir: &Path, settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let manifest_path = dir.join(&settings.manifest);
        let tracks = if manifest_path.is_file() {
            let tracks = manifest::read(&manifest_path)?;
            info!(path = %manifest_path.display(), beats = tracks.len(), "loaded catalog manifest");
            tracks
        } else {
            let tracks = scan::scan(dir, settings);
            info!(dir = %dir.display(), beats = tracks.len(), "scanned catalog directory");
            tracks
        };

        Ok(Self::from_tracks(dir, tracks))
    }

    pub fn from_tracks(root: impl Into<PathBuf>, tracks: Vec<Track>) -> Self {
        Self {
            root: root.into(),
            tracks,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// Look up a track and its audio source in one step.
    pub fn resolve(&self, id: &TrackId) -> Option<(Track, AudioSource)> {
        self.get(id).map(|t| (t.clone(), self.audio_source(t)))
    }

    pub fn audio_source(&self, track: &Track) -> AudioSource {
        AudioSource::new(source::resolve_locator(&self.root, &track.audio))
    }

    pub fn cover_path(&self, track: &Track) -> Option<PathBuf> {
        track
            .cover
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| source::resolve_locator(&self.root, c))
    }

    /// Overlay locally recorded play counts on top of the manifest values.
    pub fn merge_play_counts(&mut self, counts: &BTreeMap<TrackId, u64>) {
        for track in &mut self.tracks {
            if let Some(&n) = counts.get(&track.id) {
                track.plays = track.plays.max(n);
            }
        }
    }
}

#[cfg(test)]
mod tests;
