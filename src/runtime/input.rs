//! Input dispatch: keys, mouse gestures and MPRIS commands become store and
//! view-model operations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, View};
use crate::audio::MediaEngine;
use crate::cart::LicenseTier;
use crate::catalog::TrackId;
use crate::config::ControlsSettings;
use crate::mpris::ControlCmd;
use crate::playback::{PlayState, PlaybackStore};
use crate::ui::{self, Areas, layout, player_bar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Resolve `id` through the catalog and hand it to the store.
fn play_track<E: MediaEngine>(app: &App, store: &mut PlaybackStore<E>, id: &TrackId) {
    if let Some((track, source)) = app.catalog.resolve(id) {
        store.play_beat(track, &source);
    }
}

fn play_selected<E: MediaEngine>(app: &App, store: &mut PlaybackStore<E>) {
    let id = match app.view {
        View::Cart => app.selected_cart_item().map(|item| item.beat.clone()),
        View::Catalog | View::Detail => app.selected_track().map(|t| t.id.clone()),
    };
    if let Some(id) = id {
        play_track(app, store, &id);
    }
}

fn scrub<E: MediaEngine>(store: &mut PlaybackStore<E>, delta: f64) {
    if store.session().current_track.is_none() {
        return;
    }
    let target = store.session().position_seconds + delta;
    store.seek(target);
}

pub fn handle_key<E: MediaEngine>(
    key: KeyEvent,
    controls: &ControlsSettings,
    app: &mut App,
    store: &mut PlaybackStore<E>,
    now: Instant,
) -> Action {
    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => play_selected(app, store),
        KeyCode::Char('l') | KeyCode::Right => {
            if app.view == View::Catalog {
                app.open_detail();
            }
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => app.back(),
        KeyCode::Char('c') => app.toggle_cart_view(),
        KeyCode::Char(c @ '1'..='3') => {
            let idx = (c as usize) - ('1' as usize);
            app.set_tier(LicenseTier::ALL[idx]);
        }
        KeyCode::Char('a') => {
            if app.view != View::Cart {
                app.add_selected_to_cart(now);
            }
        }
        KeyCode::Char('d') => {
            if app.view == View::Cart {
                app.remove_selected_cart_item(now);
            }
        }
        KeyCode::Char('C') => app.clear_cart(now),
        KeyCode::Char(' ') => store.toggle_play_pause(),
        KeyCode::Char('x') => store.stop_playback(),
        KeyCode::Char('H') => scrub(store, -(controls.scrub_seconds as f64)),
        KeyCode::Char('L') => scrub(store, controls.scrub_seconds as f64),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let level = store.session().volume + controls.volume_step;
            store.change_volume(level);
        }
        KeyCode::Char('-') => {
            let level = store.session().volume - controls.volume_step;
            store.change_volume(level);
        }
        KeyCode::Char('m') => {
            let level = app.toggle_mute(store.session().volume);
            store.change_volume(level);
        }
        _ => {}
    }
    Action::Continue
}

/// Mouse gestures over the player bar and catalog grid.
///
/// A press on the progress bar starts a scrub; the engine is only seeked when
/// the button is released.
pub fn handle_mouse<E: MediaEngine>(
    ev: MouseEvent,
    areas: &Areas,
    app: &mut App,
    store: &mut PlaybackStore<E>,
) {
    let (col, row) = (ev.column, ev.row);
    let duration = store.session().duration_seconds;

    match ev.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if layout::contains(areas.progress, col, row) {
                // Without a duration every column maps to 0.
                if duration <= 0.0 {
                    return;
                }
                store.on_drag_start();
                if store.is_dragging() {
                    store.on_drag_move(player_bar::position_at(areas.progress, col, duration));
                }
            } else if layout::contains(areas.volume, col, row) {
                store.change_volume(player_bar::volume_at(areas.volume, col));
            } else if app.view == View::Catalog && layout::contains(areas.main, col, row) {
                if let Some(idx) = ui::row_at(areas.main, row, app.catalog.len(), app.selected) {
                    app.set_selected(idx);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if store.is_dragging() => {
            store.on_drag_move(player_bar::position_at(areas.progress, col, duration));
        }
        MouseEventKind::Up(MouseButton::Left) if store.is_dragging() => {
            store.on_drag_end(player_bar::position_at(areas.progress, col, duration));
        }
        MouseEventKind::ScrollDown if layout::contains(areas.main, col, row) => app.next(),
        MouseEventKind::ScrollUp if layout::contains(areas.main, col, row) => app.prev(),
        _ => {}
    }
}

/// Apply a desktop media-key command.
pub fn handle_control<E: MediaEngine>(
    cmd: ControlCmd,
    app: &App,
    store: &mut PlaybackStore<E>,
) -> Action {
    let has_track = store.session().current_track.is_some();
    match cmd {
        ControlCmd::Quit => return Action::Quit,
        ControlCmd::Play => {
            if !has_track {
                play_selected(app, store);
            } else if store.session().play_state != PlayState::Playing {
                store.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if store.session().is_playing() {
                store.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => {
            if has_track {
                store.toggle_play_pause();
            } else {
                play_selected(app, store);
            }
        }
        ControlCmd::Stop => store.stop_playback(),
    }
    Action::Continue
}
