//! Panel tab switcher.

use ratatui::prelude::*;
use ratatui::widgets::Tabs;

use tabdeck_core::view::Panel;

use super::Palette;
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let titles: Vec<String> = Panel::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| format!(" F{} {} ", i + 1, p.title()))
        .collect();

    // An unknown panel id leaves no tab highlighted
    let selected = app
        .view
        .active()
        .and_then(|active| Panel::ALL.iter().position(|p| *p == active));
    let highlight = match selected {
        Some(_) => Style::default().fg(palette.accent).bold(),
        None => Style::default().fg(palette.muted),
    };

    let tabs = Tabs::new(titles)
        .select(selected.unwrap_or(0))
        .style(Style::default().fg(palette.muted))
        .highlight_style(highlight)
        .divider("|");

    frame.render_widget(tabs, area);
}
