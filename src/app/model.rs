//! Application model types: `App`, `View` and transient notices.
//!
//! `App` holds navigation state and the cart. It never holds playback truth:
//! "is this beat playing" is always answered from the store's session.

use std::time::{Duration, Instant};

use crate::cart::{Cart, CartItem, LicenseTier};
use crate::catalog::{Catalog, Track};
use crate::error::PlaybackError;
use crate::playback::PlaybackSession;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Catalog,
    Detail,
    Cart,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

pub struct App {
    pub catalog: Catalog,
    pub cart: Cart,
    pub view: View,
    /// Index into `catalog.tracks()`.
    pub selected: usize,
    /// Tier highlighted on the detail page and used by "add to cart".
    pub tier: LicenseTier,
    pub cart_selected: usize,

    notice: Option<Notice>,
    notice_ttl: Duration,
    last_error_seen: Option<PlaybackError>,
    /// Level to restore when unmuting.
    unmute_level: Option<f32>,
}

impl App {
    pub fn new(catalog: Catalog, cart: Cart, notice_ttl: Duration) -> Self {
        Self {
            catalog,
            cart,
            view: View::Catalog,
            selected: 0,
            tier: LicenseTier::default(),
            cart_selected: 0,
            notice: None,
            notice_ttl,
            last_error_seen: None,
            unmute_level: None,
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.catalog.tracks().get(self.selected)
    }

    /// Move selection down, wrapping to the top.
    pub fn next(&mut self) {
        match self.view {
            View::Cart => {
                let n = self.cart.count();
                if n > 0 {
                    self.cart_selected = (self.cart_selected + 1) % n;
                }
            }
            _ => {
                let n = self.catalog.len();
                if n > 0 {
                    self.selected = (self.selected + 1) % n;
                }
            }
        }
    }

    /// Move selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        match self.view {
            View::Cart => {
                let n = self.cart.count();
                if n > 0 {
                    self.cart_selected = (self.cart_selected + n - 1) % n;
                }
            }
            _ => {
                let n = self.catalog.len();
                if n > 0 {
                    self.selected = (self.selected + n - 1) % n;
                }
            }
        }
    }

    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.catalog.len() {
            self.selected = idx;
        }
    }

    pub fn open_detail(&mut self) {
        if self.selected_track().is_some() {
            self.view = View::Detail;
        }
    }

    pub fn back(&mut self) {
        self.view = View::Catalog;
    }

    pub fn toggle_cart_view(&mut self) {
        self.view = if self.view == View::Cart {
            View::Catalog
        } else {
            View::Cart
        };
        self.clamp_cart_selection();
    }

    pub fn set_tier(&mut self, tier: LicenseTier) {
        self.tier = tier;
    }

    pub fn selected_cart_item(&self) -> Option<&CartItem> {
        self.cart.items().get(self.cart_selected)
    }

    fn clamp_cart_selection(&mut self) {
        let n = self.cart.count();
        if self.cart_selected >= n {
            self.cart_selected = n.saturating_sub(1);
        }
    }

    /// Add the selected beat at the current tier, reporting the outcome.
    pub fn add_selected_to_cart(&mut self, now: Instant) {
        let Some(track) = self.catalog.tracks().get(self.selected).cloned() else {
            return;
        };
        let outcome = self
            .cart
            .add(&track, self.tier)
            .map(|item| format!("Added {} ({} license)", item.name, item.tier));
        match outcome {
            Ok(text) => self.notify(text, now),
            Err(e) => self.notify(e.to_string(), now),
        }
    }

    pub fn remove_selected_cart_item(&mut self, now: Instant) {
        let Some(id) = self.selected_cart_item().map(|i| i.id.clone()) else {
            return;
        };
        if let Some(item) = self.cart.remove(&id) {
            self.notify(format!("Removed {} from the cart", item.name), now);
        }
        self.clamp_cart_selection();
    }

    pub fn clear_cart(&mut self, now: Instant) {
        if self.cart.is_empty() {
            return;
        }
        self.cart.clear();
        self.cart_selected = 0;
        self.notify("Cart cleared".to_string(), now);
    }

    pub fn notify(&mut self, text: String, now: Instant) {
        self.push_notice(text, NoticeLevel::Info, now);
    }

    pub fn notify_error(&mut self, text: String, now: Instant) {
        self.push_notice(text, NoticeLevel::Error, now);
    }

    fn push_notice(&mut self, text: String, level: NoticeLevel, now: Instant) {
        self.notice = Some(Notice {
            text,
            level,
            expires_at: now + self.notice_ttl,
        });
    }

    /// The notice to show at `now`, if it has not expired.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| now < n.expires_at)
    }

    /// Surface a newly recorded playback error as a notice, once.
    pub fn observe_session(&mut self, session: &PlaybackSession, now: Instant) {
        if session.last_error == self.last_error_seen {
            return;
        }
        self.last_error_seen = session.last_error.clone();
        if let Some(e) = &session.last_error {
            self.notify_error(e.to_string(), now);
        }
    }

    /// The volume to apply for a mute toggle from `current`.
    pub fn toggle_mute(&mut self, current: f32) -> f32 {
        if current > 0.0 {
            self.unmute_level = Some(current);
            0.0
        } else {
            self.unmute_level.take().unwrap_or(1.0)
        }
    }
}
