//! Text input bar.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use tabdeck_core::view::Panel;

use super::Palette;
use crate::app::{App, ProfileField};

fn title(app: &App) -> &'static str {
    match app.view.active() {
        Some(Panel::Profile) => match app.profile_field {
            ProfileField::Name => " Name (saved as you type, Tab: avatar path) ",
            ProfileField::AvatarPath => " Avatar image path (Enter to load, Tab: name) ",
        },
        Some(Panel::Weather) => " City (Enter to look up) ",
        Some(Panel::Cats) => " Enter to show a random fact ",
        Some(Panel::Assistant) => " Message (Enter to send, Ctrl+L to clear) ",
        None => " ",
    }
}

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let text = app.active_input();
    let border_color = if text.is_some() {
        palette.accent
    } else {
        palette.border
    };

    let block = Block::default()
        .title(title(app))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(text) = text else {
        return;
    };

    let input = Paragraph::new(text).style(Style::default().fg(palette.fg));
    frame.render_widget(input, inner);

    let width = text.chars().count() as u16;
    frame.set_cursor_position(Position::new(
        inner.x + width.min(inner.width.saturating_sub(1)),
        inner.y,
    ));
}
