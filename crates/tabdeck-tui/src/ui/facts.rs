//! Cat facts panel.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::Palette;
use crate::app::{App, FactPane};

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .title(" Cat Facts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let muted = Style::default().fg(palette.muted);
    let lines = match &app.fact {
        FactPane::Empty => vec![Line::styled("Press Enter for a random cat fact.", muted)],
        FactPane::Loading => vec![Line::styled("Loading...", Style::default().fg(palette.accent))],
        FactPane::Ready(fact) => vec![
            Line::styled(fact.title(), Style::default().fg(palette.accent).bold()),
            Line::styled(fact.text, Style::default().fg(palette.fg)),
            Line::raw(""),
            Line::styled("Source: local fact list.", muted.italic()),
        ],
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
