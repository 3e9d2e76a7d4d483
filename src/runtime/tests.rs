use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::input::{Action, handle_control, handle_key, handle_mouse};
use super::startup::{catalog_dir, restore_cart};
use crate::app::{App, View};
use crate::audio::{EngineEvent, EngineMessage, LoadTicket, MediaEngine};
use crate::cart::{Cart, LicenseTier};
use crate::catalog::{AudioSource, Catalog, Prices, Track, TrackId};
use crate::config::{ControlsSettings, Settings};
use crate::error::PlaybackError;
use crate::mpris::ControlCmd;
use crate::playback::{PlayState, PlaybackStore};
use crate::ui::{Areas, areas};

#[derive(Clone, Default)]
struct ScriptedEngine {
    tickets: Rc<RefCell<Vec<LoadTicket>>>,
    seeks: Rc<RefCell<Vec<f64>>>,
}

impl ScriptedEngine {
    fn last_ticket(&self) -> LoadTicket {
        self.tickets.borrow().last().cloned().unwrap()
    }

    fn seeks(&self) -> Vec<f64> {
        self.seeks.borrow().clone()
    }
}

impl MediaEngine for ScriptedEngine {
    fn load(&mut self, ticket: LoadTicket, _source: &AudioSource) {
        self.tickets.borrow_mut().push(ticket);
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn set_position(&mut self, seconds: f64) {
        self.seeks.borrow_mut().push(seconds);
    }

    fn set_volume(&mut self, _level: f32) {}
}

fn beat(id: &str) -> Track {
    Track {
        id: TrackId::from(id),
        name: format!("Beat {id}"),
        genre: "Drill".into(),
        bpm: Some(142),
        key: String::new(),
        mood: String::new(),
        cover: None,
        audio: format!("audio/{id}.mp3"),
        prices: Prices {
            basic: 30.0,
            premium: 80.0,
            exclusive: 300.0,
        },
        plays: 0,
    }
}

struct Harness {
    engine: ScriptedEngine,
    app: App,
    store: PlaybackStore<ScriptedEngine>,
    controls: ControlsSettings,
    areas: Areas,
}

impl Harness {
    fn new() -> Self {
        let engine = ScriptedEngine::default();
        let catalog = Catalog::from_tracks("/beats", vec![beat("a"), beat("b"), beat("c")]);
        Self {
            store: PlaybackStore::new(engine.clone(), 0.5),
            engine,
            app: App::new(catalog, Cart::new(), Duration::from_secs(3)),
            controls: ControlsSettings::default(),
            areas: areas(Rect::new(0, 0, 80, 24)),
        }
    }

    fn key(&mut self, code: KeyCode) -> Action {
        handle_key(
            KeyEvent::new(code, KeyModifiers::NONE),
            &self.controls,
            &mut self.app,
            &mut self.store,
            Instant::now(),
        )
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        let ev = MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(ev, &self.areas, &mut self.app, &mut self.store);
    }

    fn control(&mut self, cmd: ControlCmd) -> Action {
        handle_control(cmd, &self.app, &mut self.store)
    }

    fn metadata(&mut self, duration: f64) {
        let ticket = self.engine.last_ticket();
        self.store.handle_engine_event(EngineMessage {
            ticket,
            event: EngineEvent::MetadataLoaded(duration),
        });
    }

    fn current(&self) -> Option<&str> {
        self.store.session().current_id().map(|id| id.as_str())
    }
}

#[test]
fn enter_plays_the_selected_beat_then_toggles_it() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    assert_eq!(h.current(), Some("a"));
    assert_eq!(h.store.session().play_state, PlayState::Playing);

    h.key(KeyCode::Enter);
    assert_eq!(h.store.session().play_state, PlayState::Paused);
    assert_eq!(h.engine.tickets.borrow().len(), 1);
}

#[test]
fn enter_on_another_beat_replaces_the_selection() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    h.key(KeyCode::Char('j'));
    h.key(KeyCode::Enter);
    assert_eq!(h.current(), Some("b"));
    assert_eq!(h.store.session().play_state, PlayState::Playing);
    assert_eq!(h.engine.last_ticket().track, TrackId::from("b"));
}

#[test]
fn audio_is_resolved_through_the_catalog() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    let track = h.store.session().current_track.clone().unwrap();
    assert_eq!(
        h.app.catalog.audio_source(&track).path,
        std::path::PathBuf::from("/beats/audio/a.mp3")
    );
}

#[test]
fn enter_in_the_cart_plays_the_item_beat() {
    let mut h = Harness::new();
    h.key(KeyCode::Down);
    h.key(KeyCode::Char('a'));
    h.key(KeyCode::Char('c'));
    assert_eq!(h.app.view, View::Cart);

    h.key(KeyCode::Enter);
    assert_eq!(h.current(), Some("b"));
}

#[test]
fn detail_navigation() {
    let mut h = Harness::new();
    h.key(KeyCode::Char('l'));
    assert_eq!(h.app.view, View::Detail);
    h.key(KeyCode::Char('h'));
    assert_eq!(h.app.view, View::Catalog);
    h.key(KeyCode::Right);
    h.key(KeyCode::Esc);
    assert_eq!(h.app.view, View::Catalog);
}

#[test]
fn tier_keys_choose_the_license_added_to_the_cart() {
    let mut h = Harness::new();
    h.key(KeyCode::Char('3'));
    assert_eq!(h.app.tier, LicenseTier::Exclusive);
    h.key(KeyCode::Char('a'));
    assert!(h.app.cart.contains(&TrackId::from("a"), LicenseTier::Exclusive));

    h.key(KeyCode::Char('c'));
    h.key(KeyCode::Char('d'));
    assert!(h.app.cart.is_empty());
}

#[test]
fn scrub_keys_seek_relative_to_the_position() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    h.metadata(180.0);

    h.key(KeyCode::Char('L'));
    assert_eq!(h.store.session().position_seconds, 5.0);
    h.key(KeyCode::Char('H'));
    h.key(KeyCode::Char('H'));
    assert_eq!(h.store.session().position_seconds, 0.0);
    assert_eq!(h.engine.seeks(), vec![5.0, 0.0, 0.0]);
}

#[test]
fn scrub_without_a_track_does_nothing() {
    let mut h = Harness::new();
    h.key(KeyCode::Char('L'));
    assert!(h.engine.seeks().is_empty());
}

#[test]
fn volume_keys_step_and_mute() {
    let mut h = Harness::new();
    h.key(KeyCode::Char('+'));
    assert!((h.store.session().volume - 0.55).abs() < 1e-4);
    h.key(KeyCode::Char('-'));
    h.key(KeyCode::Char('-'));
    assert!((h.store.session().volume - 0.45).abs() < 1e-4);

    h.key(KeyCode::Char('m'));
    assert_eq!(h.store.session().volume, 0.0);
    h.key(KeyCode::Char('m'));
    assert!((h.store.session().volume - 0.45).abs() < 1e-4);
}

#[test]
fn stop_and_quit_keys() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    assert_eq!(h.key(KeyCode::Char('x')), Action::Continue);
    assert_eq!(h.current(), None);
    assert_eq!(h.store.session().play_state, PlayState::Stopped);
    assert_eq!(h.key(KeyCode::Char('q')), Action::Quit);
}

#[test]
fn drag_on_the_progress_bar_seeks_once_on_release() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    h.metadata(120.0);
    let progress = h.areas.progress;
    let (x0, y) = (progress.x, progress.y);

    h.mouse(MouseEventKind::Down(MouseButton::Left), x0 + 30, y);
    assert!(h.store.is_dragging());
    assert!(h.store.session().is_seeking);
    assert_eq!(h.store.displayed_position(), 60.0);

    h.mouse(MouseEventKind::Drag(MouseButton::Left), x0 + 60, y);
    assert_eq!(h.store.displayed_position(), 120.0);
    assert!(h.engine.seeks().is_empty());

    h.mouse(MouseEventKind::Up(MouseButton::Left), x0, y);
    assert!(!h.store.is_dragging());
    assert!(!h.store.session().is_seeking);
    assert_eq!(h.engine.seeks(), vec![0.0]);
    assert_eq!(h.store.session().position_seconds, 0.0);
}

#[test]
fn progress_press_without_a_track_starts_nothing() {
    let mut h = Harness::new();
    let progress = h.areas.progress;
    h.mouse(MouseEventKind::Down(MouseButton::Left), progress.x + 5, progress.y);
    assert!(!h.store.is_dragging());
    h.mouse(MouseEventKind::Up(MouseButton::Left), progress.x + 5, progress.y);
    assert!(h.engine.seeks().is_empty());
}

#[test]
fn progress_press_before_the_duration_is_known_keeps_the_position() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    let ticket = h.engine.last_ticket();
    h.store.handle_engine_event(EngineMessage {
        ticket,
        event: EngineEvent::TimeUpdate(12.0),
    });
    let progress = h.areas.progress;

    h.mouse(MouseEventKind::Down(MouseButton::Left), progress.x + 5, progress.y);
    assert!(!h.store.is_dragging());
    assert!(!h.store.session().is_seeking);
    h.mouse(MouseEventKind::Up(MouseButton::Left), progress.x + 5, progress.y);

    assert!(h.engine.seeks().is_empty());
    assert_eq!(h.store.session().position_seconds, 12.0);
}

#[test]
fn volume_bar_click_sets_the_level() {
    let mut h = Harness::new();
    let volume = h.areas.volume;
    h.mouse(
        MouseEventKind::Down(MouseButton::Left),
        volume.x + volume.width - 1,
        volume.y,
    );
    assert_eq!(h.store.session().volume, 1.0);
    h.mouse(MouseEventKind::Down(MouseButton::Left), volume.x, volume.y);
    assert_eq!(h.store.session().volume, 0.0);
}

#[test]
fn clicking_a_catalog_row_selects_it() {
    let mut h = Harness::new();
    let main = h.areas.main;
    h.mouse(MouseEventKind::Down(MouseButton::Left), 10, main.y + 3);
    assert_eq!(h.app.selected, 2);
    assert_eq!(h.current(), None);
}

#[test]
fn media_key_commands() {
    let mut h = Harness::new();
    h.control(ControlCmd::Pause);
    assert_eq!(h.current(), None);

    h.control(ControlCmd::PlayPause);
    assert_eq!(h.current(), Some("a"));
    assert!(h.store.session().is_playing());

    h.control(ControlCmd::Play);
    assert!(h.store.session().is_playing());
    h.control(ControlCmd::Pause);
    assert_eq!(h.store.session().play_state, PlayState::Paused);
    h.control(ControlCmd::Play);
    assert!(h.store.session().is_playing());

    h.control(ControlCmd::Stop);
    assert_eq!(h.current(), None);
    assert_eq!(h.control(ControlCmd::Quit), Action::Quit);
}

#[test]
fn cli_argument_wins_over_configured_catalog_dir() {
    let mut settings = Settings::default();
    settings.catalog.dir = Some("/srv/beats".into());
    assert_eq!(
        catalog_dir(Some("/tmp/other".into()), &settings),
        std::path::PathBuf::from("/tmp/other")
    );
    assert_eq!(
        catalog_dir(None, &settings),
        std::path::PathBuf::from("/srv/beats")
    );
}

#[test]
fn unreadable_cart_restores_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(restore_cart(&dir.path().join("missing.toml")).is_empty());

    let path = dir.path().join("cart.toml");
    std::fs::write(&path, "items = [oops").unwrap();
    assert!(restore_cart(&path).is_empty());
}
