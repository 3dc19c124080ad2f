//! Status bar — theme, messages, and the clear-all prompt.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Palette;
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    if app.confirm_clear {
        let prompt = Paragraph::new(Line::from(vec![Span::styled(
            " Clear all saved data? (y/n) ",
            Style::default().fg(Color::Black).bg(palette.error),
        )]));
        frame.render_widget(prompt, area);
        return;
    }

    let (theme, theme_bg) = if app.view.dark_theme() {
        ("dark", Color::Magenta)
    } else {
        ("light", Color::Yellow)
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", theme),
            Style::default().fg(Color::Black).bg(theme_bg),
        ),
        Span::styled(
            " Ctrl+T theme  Ctrl+X clear data  Ctrl+C quit ",
            Style::default().fg(palette.muted),
        ),
    ];

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(palette.accent),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
