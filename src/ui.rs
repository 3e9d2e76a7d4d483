//! UI rendering for the terminal user interface.
//!
//! Every view is a trigger site: it renders the shared playback session and
//! compares track ids against it, but keeps no playback state of its own.

mod cart;
mod catalog;
mod detail;
pub mod layout;
pub mod player_bar;

use std::time::Instant;

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, NoticeLevel, View};
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::PlaybackSession;

pub use catalog::{marker, row_at, visible_window};
pub use layout::{Areas, areas};

/// What the player bar shows: the session plus the position to draw, which
/// follows the pointer while a scrub is in progress.
pub struct NowPlaying<'a> {
    pub session: &'a PlaybackSession,
    pub displayed_position: f64,
}

/// Format seconds as `MM:SS`.
pub fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn format_price(currency: &str, amount: f64) -> String {
    format!("{currency}{amount:.2}")
}

/// Controls help for `view`, incorporating scrub seconds.
fn controls_text(view: View, scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = vec!["[j/k] up/down".to_string()];
    match view {
        View::Catalog => {
            parts.push("[enter] play/pause".to_string());
            parts.push("[l] details".to_string());
            parts.push("[a] add to cart".to_string());
        }
        View::Detail => {
            parts.push("[enter] play/pause".to_string());
            parts.push("[1/2/3] license".to_string());
            parts.push("[a] add to cart".to_string());
            parts.push("[h/esc] back".to_string());
        }
        View::Cart => {
            parts.push("[d] remove".to_string());
            parts.push("[C] clear".to_string());
            parts.push("[esc] back".to_string());
        }
    }
    parts.push("[space] toggle".to_string());
    parts.push("[x] stop".to_string());
    parts.push(format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.push("[+/-] volume".to_string());
    parts.push("[m] mute".to_string());
    parts.push("[c] cart".to_string());
    parts.push("[q] quit".to_string());
    parts.join(" | ")
}

/// Render the whole screen.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    now_playing: &NowPlaying<'_>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    now: Instant,
) {
    let areas = areas(frame.area());

    let header_line = match app.notice(now) {
        Some(n) => {
            let style = match n.level {
                NoticeLevel::Info => Style::default(),
                NoticeLevel::Error => Style::default().add_modifier(Modifier::BOLD),
            };
            Line::from(Span::styled(n.text.clone(), style))
        }
        None => Line::from(ui_settings.header_text.as_str()),
    };
    let cart_badge = format!(" cart: {} ", app.cart.count());
    let header = Paragraph::new(header_line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" beatstore ")
                .title_alignment(Alignment::Center)
                .title_bottom(Line::from(cart_badge).right_aligned()),
        );
    frame.render_widget(header, areas.header);

    let session = now_playing.session;
    match app.view {
        View::Catalog => catalog::render(frame, areas.main, app, session, &ui_settings.currency),
        View::Detail => detail::render(frame, areas.main, app, session, &ui_settings.currency),
        View::Cart => cart::render(frame, areas.main, app, &ui_settings.currency),
    }

    player_bar::render(frame, &areas, now_playing, ui_settings);

    let footer = Paragraph::new(controls_text(app.view, controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);
}
