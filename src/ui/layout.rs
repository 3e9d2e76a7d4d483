//! Screen geometry shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Columns reserved right of the progress bar for the time text.
pub const TIME_WIDTH: u16 = 17;
const VOLUME_LABEL: u16 = 5;
const VOLUME_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub main: Rect,
    pub player: Rect,
    /// First line inside the player bar: title and state.
    pub now_playing: Rect,
    pub progress: Rect,
    pub time: Rect,
    pub volume: Rect,
    pub footer: Rect,
}

fn inner(r: Rect) -> Rect {
    Rect {
        x: r.x.saturating_add(1),
        y: r.y.saturating_add(1),
        width: r.width.saturating_sub(2),
        height: r.height.saturating_sub(2),
    }
}

fn row(r: Rect, n: u16) -> Rect {
    if n >= r.height {
        return Rect {
            height: 0,
            ..r
        };
    }
    Rect {
        y: r.y + n,
        height: 1,
        ..r
    }
}

pub fn areas(full: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(full);

    let player = chunks[2];
    let body = inner(player);

    let now_playing = row(body, 0);

    let progress_row = row(body, 1);
    let time_width = TIME_WIDTH.min(progress_row.width);
    let progress = Rect {
        width: progress_row.width - time_width,
        ..progress_row
    };
    let time = Rect {
        x: progress_row.x + progress.width,
        width: time_width,
        ..progress_row
    };

    let volume_row = row(body, 2);
    let label = VOLUME_LABEL.min(volume_row.width);
    let volume = Rect {
        x: volume_row.x + label,
        width: VOLUME_WIDTH.min(volume_row.width - label),
        ..volume_row
    };

    Areas {
        header: chunks[0],
        main: chunks[1],
        player,
        now_playing,
        progress,
        time,
        volume,
        footer: chunks[3],
    }
}

/// Whether the cell at (`column`, `row`) lies inside `area`.
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.width > 0
        && area.height > 0
        && column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}
