//! License tiers and the shopping cart.
//!
//! Checkout happens elsewhere; the cart only records what the user picked and
//! survives restarts as `cart.toml` in the state directory.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Prices, Track, TrackId};
use crate::error::CartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    #[default]
    Basic,
    Premium,
    Exclusive,
}

impl LicenseTier {
    pub const ALL: [LicenseTier; 3] = [
        LicenseTier::Basic,
        LicenseTier::Premium,
        LicenseTier::Exclusive,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LicenseTier::Basic => "basic",
            LicenseTier::Premium => "premium",
            LicenseTier::Exclusive => "exclusive",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LicenseTier::Basic => "Basic",
            LicenseTier::Premium => "Premium",
            LicenseTier::Exclusive => "Exclusive",
        }
    }

    /// Files delivered with this license.
    pub fn deliverables(self) -> &'static [&'static str] {
        match self {
            LicenseTier::Basic => &["MP3"],
            LicenseTier::Premium => &["MP3", "WAV"],
            LicenseTier::Exclusive => &["MP3", "WAV", "Stems"],
        }
    }

    pub fn price_for(self, prices: &Prices) -> f64 {
        match self {
            LicenseTier::Basic => prices.basic,
            LicenseTier::Premium => prices.premium,
            LicenseTier::Exclusive => prices.exclusive,
        }
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// `"{beat}-{tier}"`, unique within a cart.
    pub id: String,
    pub beat: TrackId,
    pub name: String,
    pub tier: LicenseTier,
    /// Price at the time the item was added.
    pub price: f64,
}

pub fn item_id(beat: &TrackId, tier: LicenseTier) -> String {
    format!("{beat}-{}", tier.key())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.price).sum()
    }

    pub fn contains(&self, beat: &TrackId, tier: LicenseTier) -> bool {
        self.items.iter().any(|i| &i.beat == beat && i.tier == tier)
    }

    pub fn add(&mut self, track: &Track, tier: LicenseTier) -> Result<&CartItem, CartError> {
        if self.contains(&track.id, tier) {
            return Err(CartError::AlreadyInCart {
                beat: track.name.clone(),
                tier,
            });
        }

        self.items.push(CartItem {
            id: item_id(&track.id, tier),
            beat: track.id.clone(),
            name: track.name.clone(),
            tier,
            price: tier.price_for(&track.prices),
        });
        let item = &self.items[self.items.len() - 1];
        debug!(item = %item.id, price = item.price, "added to cart");
        Ok(item)
    }

    pub fn remove(&mut self, item_id: &str) -> Option<CartItem> {
        let idx = self.items.iter().position(|i| i.id == item_id)?;
        Some(self.items.remove(idx))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Load a saved cart; a missing file is an empty cart.
    pub fn load(path: &Path) -> Result<Self, CartError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CartError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}
