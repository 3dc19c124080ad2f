//! TUI layout compositing — assembles all UI panels.

mod chat;
mod facts;
mod input;
mod profile;
mod status;
mod switcher;
mod weather;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use tabdeck_core::view::Panel;

use crate::app::App;

/// Colors for the current theme.
#[derive(Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_theme(dark: bool) -> Self {
        if dark {
            Palette {
                fg: Color::Rgb(220, 220, 220),
                bg: Color::Rgb(24, 24, 28),
                muted: Color::DarkGray,
                accent: Color::Cyan,
                error: Color::LightRed,
                border: Color::DarkGray,
            }
        } else {
            Palette {
                fg: Color::Rgb(30, 30, 30),
                bg: Color::Rgb(245, 245, 240),
                muted: Color::Gray,
                accent: Color::Blue,
                error: Color::Red,
                border: Color::Gray,
            }
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Render the full TUI layout.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = Palette::for_theme(app.view.dark_theme());

    // ┌──────────────────────────────────┐
    // │ Tabs (switcher)                  │
    // ├──────────────────────────────────┤
    // │ Active panel                     │
    // │                                  │
    // ├──────────────────────────────────┤
    // │ Status bar                       │
    // ├──────────────────────────────────┤
    // │ Input                            │
    // └──────────────────────────────────┘

    frame.render_widget(Block::default().style(palette.text()), area);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Min(8),    // panel
            Constraint::Length(1), // status
            Constraint::Length(3), // input
        ])
        .split(area);

    switcher::draw(frame, app, &palette, main_layout[0]);

    match app.view.active() {
        Some(Panel::Profile) => profile::draw(frame, app, &palette, main_layout[1]),
        Some(Panel::Weather) => weather::draw(frame, app, &palette, main_layout[1]),
        Some(Panel::Cats) => facts::draw(frame, app, &palette, main_layout[1]),
        Some(Panel::Assistant) => chat::draw(frame, app, &palette, main_layout[1]),
        None => {
            let empty = Paragraph::new("No panel selected (F1-F4)")
                .style(Style::default().fg(palette.muted));
            frame.render_widget(empty, main_layout[1]);
        }
    }

    status::draw(frame, app, &palette, main_layout[2]);
    input::draw(frame, app, &palette, main_layout[3]);
}

/// The recent-search list, shared by the profile and weather panels.
pub(crate) fn history_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    if app.history.is_empty() {
        return vec![Line::styled(
            "  No saved searches.",
            Style::default().fg(palette.muted),
        )];
    }
    app.history
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("  {}", entry.city),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(
                    format!(" ({})", entry.time),
                    Style::default().fg(palette.muted),
                ),
            ])
        })
        .collect()
}
