//! Weather panel — lookup result or error, plus recent searches.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use tabdeck_core::weather::LookupError;

use super::{history_lines, Palette};
use crate::app::{App, WeatherPane};

fn error_text(err: &LookupError) -> String {
    match err {
        LookupError::Validation => format!("! {}", err),
        LookupError::Network { .. } => format!("x Weather request failed: {}", err),
        // Already reads "Failed to load weather: ..."
        LookupError::NotFound { .. }
        | LookupError::DataUnavailable { .. }
        | LookupError::Transport(_) => format!("x {}", err),
    }
}

fn error_line(err: &LookupError, palette: &Palette) -> Line<'static> {
    Line::styled(error_text(err), Style::default().fg(palette.error))
}

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .title(" Weather ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(palette.muted);
    let value = Style::default().fg(palette.fg);

    let mut lines: Vec<Line> = match &app.weather {
        WeatherPane::Empty => vec![Line::styled("Type a city and press Enter.", label)],
        WeatherPane::Loading => vec![Line::styled("Loading...", Style::default().fg(palette.accent))],
        WeatherPane::Failed(err) => vec![error_line(err, palette)],
        WeatherPane::Ready(report) => vec![
            Line::styled(report.label(), Style::default().fg(palette.accent).bold()),
            Line::from(vec![
                Span::styled("Temperature: ", label),
                Span::styled(format!("{}°C", report.rounded_temperature()), value.bold()),
            ]),
            Line::from(vec![
                Span::styled("Conditions:  ", label),
                Span::styled(report.description(), value),
            ]),
            Line::from(vec![
                Span::styled("Wind:        ", label),
                Span::styled(format!("{} m/s", report.wind_speed), value),
            ]),
        ],
    };

    lines.push(Line::raw(""));
    lines.push(Line::styled("Recent searches", Style::default().fg(palette.accent).bold()));
    lines.extend(history_lines(app, palette));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
