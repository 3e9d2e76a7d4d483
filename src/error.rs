//! Error types shared across the player, catalog and cart.
//!
//! Playback failures are plain data: they are stored in the session and shown
//! to the user, never propagated as panics.

use std::path::PathBuf;

use thiserror::Error;

use crate::cart::LicenseTier;

/// A non-fatal playback failure reported by the media engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The source could not be opened (missing file, unreachable locator).
    #[error("could not load audio: {0}")]
    Load(String),
    /// The output refused to start playback.
    #[error("playback was rejected: {0}")]
    Rejected(String),
    /// The source was opened but its format could not be decoded.
    #[error("could not decode audio: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate beat id `{0}` in catalog manifest")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("`{beat}` is already in the cart with a {tier} license")]
    AlreadyInCart { beat: String, tier: LicenseTier },
    #[error("cart file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode cart: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to decode cart: {0}")]
    Decode(#[from] toml::de::Error),
}
