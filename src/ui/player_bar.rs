//! The persistent bottom player bar.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::config::{TimeField, UiSettings};
use crate::playback::{PlayState, PlaybackSession};

use super::layout::Areas;
use super::{NowPlaying, format_mmss};

fn ratio_at(area: Rect, column: u16) -> f64 {
    if area.width <= 1 {
        return 0.0;
    }
    let rel = column.saturating_sub(area.x).min(area.width - 1);
    f64::from(rel) / f64::from(area.width - 1)
}

/// Seconds under `column` on a progress bar drawn in `area`.
pub fn position_at(area: Rect, column: u16, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    ratio_at(area, column) * duration
}

/// Volume level under `column` on a volume bar drawn in `area`.
pub fn volume_at(area: Rect, column: u16) -> f32 {
    ratio_at(area, column) as f32
}

/// Elapsed/total/remaining text per the configured fields.
pub fn time_text(position: f64, duration: f64, ui: &UiSettings) -> String {
    let known = duration > 0.0;
    let parts: Vec<String> = ui
        .time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_mmss(position),
            TimeField::Total if known => format_mmss(duration),
            TimeField::Remaining if known => format!("-{}", format_mmss(duration - position)),
            TimeField::Total | TimeField::Remaining => "--:--".to_string(),
        })
        .collect();
    parts.join(&ui.time_separator)
}

fn state_symbol(session: &PlaybackSession) -> &'static str {
    match session.play_state {
        PlayState::Playing => "▶",
        PlayState::Paused => "❚❚",
        PlayState::Stopped => "■",
    }
}

pub(super) fn render(frame: &mut Frame, areas: &Areas, now: &NowPlaying<'_>, ui: &UiSettings) {
    let session = now.session;
    frame.render_widget(
        Block::default().borders(Borders::ALL).title(" player "),
        areas.player,
    );

    let title = match &session.current_track {
        Some(track) => {
            let mut spans = vec![
                Span::raw(format!("{} ", state_symbol(session))),
                Span::styled(track.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ];
            let subtitle = track.subtitle();
            if !subtitle.is_empty() {
                spans.push(Span::raw(format!("  {subtitle}")));
            }
            spans.push(Span::raw(format!("  [{}]", session.play_state.label())));
            Line::from(spans)
        }
        None => Line::from("Nothing playing. Pick a beat and press Enter."),
    };
    frame.render_widget(Paragraph::new(title), areas.now_playing);

    let ratio = if session.duration_seconds > 0.0 {
        (now.displayed_position / session.duration_seconds).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut progress_style = Style::default();
    if session.is_seeking {
        progress_style = progress_style.add_modifier(Modifier::BOLD);
    }
    frame.render_widget(
        Gauge::default()
            .gauge_style(progress_style)
            .ratio(ratio)
            .label(""),
        areas.progress,
    );

    let time = if session.current_track.is_some() {
        time_text(now.displayed_position, session.duration_seconds, ui)
    } else {
        String::new()
    };
    frame.render_widget(
        Paragraph::new(time).alignment(Alignment::Right),
        areas.time,
    );

    let vol_label = Rect {
        x: areas.player.x + 1,
        width: areas.volume.x.saturating_sub(areas.player.x + 1),
        ..areas.volume
    };
    frame.render_widget(Paragraph::new("vol"), vol_label);
    let level = f64::from(session.volume).clamp(0.0, 1.0);
    frame.render_widget(
        Gauge::default()
            .ratio(level)
            .label(format!("{:>3}%", (level * 100.0).round() as u32)),
        areas.volume,
    );
}
