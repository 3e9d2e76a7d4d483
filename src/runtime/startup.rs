use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AudioPlayer, EngineMessage};
use crate::cart::Cart;
use crate::catalog::{Catalog, PlayCounter, load_counts};
use crate::config;
use crate::error::CatalogError;
use crate::playback::PlaybackStore;

/// Everything the event loop drives, built once at startup.
pub struct Services {
    pub app: App,
    pub store: PlaybackStore<AudioPlayer>,
    pub engine_rx: Receiver<EngineMessage>,
    pub counter: Option<PlayCounter>,
}

/// Catalog root: CLI argument, then `catalog.dir`, then the working directory.
pub fn catalog_dir(arg: Option<String>, settings: &config::Settings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.catalog.dir.clone())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Restore the saved cart; an unreadable file starts an empty one.
pub fn restore_cart(path: &Path) -> Cart {
    match Cart::load(path) {
        Ok(cart) => cart,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable cart");
            Cart::new()
        }
    }
}

pub fn build(dir: &Path, settings: &config::Settings) -> Result<Services, CatalogError> {
    let mut catalog = Catalog::load(dir, &settings.catalog)?;

    let counter = if settings.reporting.enabled {
        let plays_file = settings.plays_file();
        catalog.merge_play_counts(&load_counts(&plays_file));
        Some(PlayCounter::spawn(plays_file))
    } else {
        None
    };

    let (engine_tx, engine_rx) = mpsc::channel::<EngineMessage>();
    let player = AudioPlayer::new(engine_tx, settings.audio.clone());
    if !player.output_available() {
        warn!("no audio output device; previews will be rejected");
    }

    let mut store = PlaybackStore::new(player, settings.audio.initial_volume);
    if let Some(counter) = &counter {
        store = store.with_reporter(Box::new(counter.reporter()));
    }

    let cart = restore_cart(&settings.cart_file());
    info!(beats = catalog.len(), cart_items = cart.count(), "startup complete");

    let app = App::new(catalog, cart, Duration::from_millis(settings.ui.notice_ms));

    Ok(Services {
        app,
        store,
        engine_rx,
        counter,
    })
}

/// Persist the cart, fade the engine out and flush play counts.
pub fn shutdown(services: Services, settings: &config::Settings) {
    let Services {
        app,
        store,
        engine_rx,
        counter,
    } = services;

    let cart_file = settings.cart_file();
    if let Err(e) = app.cart.save(&cart_file) {
        warn!(path = %cart_file.display(), error = %e, "failed to save cart");
    }

    store
        .engine()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    // The store holds a reporter; it has to go before the counter can drain.
    drop(store);
    drop(engine_rx);

    if let Some(counter) = counter {
        counter.shutdown();
    }
    info!("shutdown complete");
}
