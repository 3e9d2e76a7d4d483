use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a beat. Two tracks are "the same track" exactly when
/// their ids are equal; no other field takes part in identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// License prices for a single beat.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prices {
    pub basic: f64,
    pub premium: f64,
    pub exclusive: f64,
}

/// A playable beat and its media locators.
///
/// `audio` and `cover` are locators, not paths: they are resolved against the
/// catalog root by [`super::Catalog::audio_source`] and
/// [`super::Catalog::cover_path`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub bpm: Option<u32>,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub cover: Option<String>,
    pub audio: String,
    #[serde(default)]
    pub prices: Prices,
    #[serde(default)]
    pub plays: u64,
}

impl Track {
    /// `"Trap • 140 BPM"`, skipping whatever is unknown.
    pub fn subtitle(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.genre.trim().is_empty() {
            parts.push(self.genre.trim().to_string());
        }
        if let Some(bpm) = self.bpm {
            parts.push(format!("{bpm} BPM"));
        }
        if !self.key.trim().is_empty() {
            parts.push(self.key.trim().to_string());
        }
        parts.join(" • ")
    }
}
