use std::env;
use std::sync::mpsc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::logging;
use crate::mpris::ControlCmd;

mod event_loop;
mod input;
mod mpris_sync;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();

    logging::init(&settings.logging.level, &settings.log_file());
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    let dir = startup::catalog_dir(env::args().nth(1), &settings);
    info!(dir = %dir.display(), "loading catalog");
    let mut services = startup::build(&dir, &settings)?;

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, services.store.session(), &services.app.catalog);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&mut services);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut services,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    startup::shutdown(services, &settings);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
