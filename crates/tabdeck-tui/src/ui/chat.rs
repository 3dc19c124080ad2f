//! Scrolling chat transcript.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use tabdeck_core::types::Sender;

use super::Palette;
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .title(" Assistant ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = app.transcript.entries();
    if entries.is_empty() {
        let empty = Paragraph::new("Ask about your name, the weather, cats, or the theme.")
            .style(Style::default().fg(palette.muted));
        frame.render_widget(empty, inner);
        return;
    }

    // Keep the newest messages in view (overshoot for wrapping)
    let visible_height = inner.height as usize;
    let start = entries.len().saturating_sub(visible_height * 2);

    let mut lines: Vec<Line> = Vec::new();
    for entry in &entries[start..] {
        let (style, prefix) = match (entry.message.sender, entry.pending) {
            (_, true) => (Style::default().fg(palette.muted).italic(), "  "),
            (Sender::User, _) => (Style::default().fg(palette.accent), "you > "),
            (Sender::Assistant, _) => (Style::default().fg(palette.fg), "bot < "),
        };
        for line in entry.message.text.lines() {
            lines.push(Line::styled(format!("{}{}", prefix, line), style));
        }
    }

    // Bottom-align: skip lines that would overflow the area
    let overflow = lines.len().saturating_sub(visible_height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((overflow as u16, 0));
    frame.render_widget(paragraph, inner);
}
