//! `catalog.toml` parsing.
//!
//! ```toml
//! [[beats]]
//! id = "beat_3f9a1c"
//! name = "Midnight Drive"
//! genre = "Trap"
//! bpm = 140
//! key = "C# minor"
//! audio = "audio/beat_3f9a1c.mp3"
//! cover = "covers/beat_3f9a1c.png"
//! prices = { basic = 29.0, premium = 79.0, exclusive = 299.0 }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;

use super::model::Track;

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    beats: Vec<Track>,
}

pub(super) fn parse(text: &str, path: &Path) -> Result<Vec<Track>, CatalogError> {
    let manifest: Manifest = toml::from_str(text).map_err(|source| CatalogError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    for track in &manifest.beats {
        if !seen.insert(track.id.clone()) {
            return Err(CatalogError::DuplicateId(track.id.to_string()));
        }
    }

    Ok(manifest.beats)
}

pub(super) fn read(path: &Path) -> Result<Vec<Track>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}
