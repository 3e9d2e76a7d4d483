//! The catalog grid: one row per beat, with a play marker on the current one.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::App;
use crate::catalog::Track;
use crate::playback::{PlayState, PlaybackSession};

use super::format_price;

/// Visible `[start, end)` slice of a list of `total` rows in `height` lines,
/// keeping `selected` centred where possible, plus its offset in the slice.
pub fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected.min(total.saturating_sub(1)));
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Catalog index under terminal `row`, for a list rendered in `area`.
pub fn row_at(area: Rect, row: u16, total: usize, selected: usize) -> Option<usize> {
    let list_top = area.y + 1;
    let height = area.height.saturating_sub(2);
    if row < list_top || row >= list_top + height {
        return None;
    }
    let (start, end, _) = visible_window(total, height as usize, selected);
    let idx = start + (row - list_top) as usize;
    (idx < end).then_some(idx)
}

/// `▶` on the playing beat, `❚❚` on a paused one, `■` on one that ended.
pub fn marker(session: &PlaybackSession, track: &Track) -> &'static str {
    if !session.is_current(&track.id) {
        return "  ";
    }
    match session.play_state {
        PlayState::Playing => "▶ ",
        PlayState::Paused => "❚❚",
        PlayState::Stopped => "■ ",
    }
}

pub(super) fn render(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    session: &PlaybackSession,
    currency: &str,
) {
    let tracks = app.catalog.tracks();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_view) = visible_window(tracks.len(), height, app.selected);

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .map(|t| {
            let mut line = format!("{} {}", marker(session, t), t.name);
            let subtitle = t.subtitle();
            if !subtitle.is_empty() {
                line.push_str("  ");
                line.push_str(&subtitle);
            }
            if t.prices.basic > 0.0 {
                line.push_str(&format!("  from {}", format_price(currency, t.prices.basic)));
            }
            ListItem::new(line)
        })
        .collect();

    let title = format!(" beats ({}) ", tracks.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !tracks.is_empty() {
        state.select(Some(selected_in_view));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
