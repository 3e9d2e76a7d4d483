use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::cart::LicenseTier;
use crate::playback::{PlayState, PlaybackSession};

use super::format_price;

pub(super) fn render(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    session: &PlaybackSession,
    currency: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" beat ")
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });

    let Some(track) = app.selected_track() else {
        frame.render_widget(Paragraph::new("No beat selected").block(block), area);
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(track.name.clone(), bold)),
        Line::from(track.subtitle()),
    ];
    if !track.mood.trim().is_empty() {
        lines.push(Line::from(format!("Mood: {}", track.mood)));
    }
    lines.push(Line::from(format!("Plays: {}", track.plays)));
    if let Some(cover) = app.catalog.cover_path(track) {
        lines.push(Line::from(format!("Cover: {}", cover.display())));
    }

    lines.push(Line::from(""));
    let status = if !session.is_current(&track.id) {
        "Press Enter to preview"
    } else {
        match session.play_state {
            PlayState::Playing => "▶ Playing (Enter to pause)",
            PlayState::Paused => "❚❚ Paused (Enter to resume)",
            PlayState::Stopped => "■ Ended (Enter to replay)",
        }
    };
    lines.push(Line::from(status));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Licenses", bold)));
    for (n, tier) in LicenseTier::ALL.iter().enumerate() {
        let in_cart = if app.cart.contains(&track.id, *tier) {
            "  (in cart)"
        } else {
            ""
        };
        let text = format!(
            "[{}] {:<10} {:>10}  {}{}",
            n + 1,
            tier.name(),
            format_price(currency, tier.price_for(&track.prices)),
            tier.deliverables().join(" + "),
            in_cart
        );
        let style = if *tier == app.tier {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
