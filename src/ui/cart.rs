use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::App;

use super::format_price;

pub(super) fn render(frame: &mut Frame, area: Rect, app: &App, currency: &str) {
    let items: Vec<ListItem> = app
        .cart
        .items()
        .iter()
        .map(|item| {
            ListItem::new(format!(
                "{}  {} license  {}",
                item.name,
                item.tier,
                format_price(currency, item.price)
            ))
        })
        .collect();

    let title = format!(
        " cart: {} item(s), total {} ",
        app.cart.count(),
        format_price(currency, app.cart.total())
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.cart.is_empty() {
        state.select(Some(app.cart_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
