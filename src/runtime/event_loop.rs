use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::PlaybackSession;
use crate::runtime::input::{self, Action};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::startup::Services;
use crate::ui::{self, Areas, NowPlaying};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Session snapshots published by the store, forwarded to MPRIS.
    mpris_rx: Receiver<PlaybackSession>,
    /// Geometry of the last drawn frame, for mouse hit-testing.
    areas: Option<Areas>,
}

impl EventLoopState {
    pub fn new(services: &mut Services) -> Self {
        Self {
            mpris_rx: services.store.subscribe(),
            areas: None,
        }
    }
}

/// Forward the newest published snapshot, if any, to MPRIS.
fn sync_mpris(state: &EventLoopState, services: &Services, mpris: &MprisHandle) {
    let mut latest = None;
    loop {
        match state.mpris_rx.try_recv() {
            Ok(session) => latest = Some(session),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                debug!("store dropped the MPRIS subscription");
                break;
            }
        }
    }
    if let Some(session) = latest {
        update_mpris(mpris, &session, &services.app.catalog);
    }
}

/// Main terminal event loop: engine events, MPRIS commands, drawing and
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    services: &mut Services,
    mpris: &MprisHandle,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Engine observations are applied in emission order; stale ones are
        // discarded by the store.
        while let Ok(msg) = services.engine_rx.try_recv() {
            services.store.handle_engine_event(msg);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if input::handle_control(cmd, &services.app, &mut services.store) == Action::Quit {
                return Ok(());
            }
        }

        let now = Instant::now();
        services.app.observe_session(services.store.session(), now);
        sync_mpris(state, services, mpris);

        let now_playing = NowPlaying {
            session: services.store.session(),
            displayed_position: services.store.displayed_position(),
        };
        let app = &services.app;
        let mut drawn = None;
        terminal.draw(|f| {
            drawn = Some(ui::areas(f.area()));
            ui::draw(f, app, &now_playing, &settings.ui, &settings.controls, now);
        })?;
        if drawn.is_some() {
            state.areas = drawn;
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = input::handle_key(
                    key,
                    &settings.controls,
                    &mut services.app,
                    &mut services.store,
                    Instant::now(),
                );
                if action == Action::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                if let Some(areas) = state.areas.as_ref() {
                    input::handle_mouse(mouse, areas, &mut services.app, &mut services.store);
                }
            }
            _ => {}
        }
    }
}
