//! Profile panel — name, theme, avatar, recent searches.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{history_lines, Palette};
use crate::app::{App, ProfileField};

fn field_marker(app: &App, field: ProfileField) -> &'static str {
    if app.profile_field == field {
        "> "
    } else {
        "  "
    }
}

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .title(" Profile ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(palette.muted);
    let value = Style::default().fg(palette.fg);

    let name = if app.profile.display_name.is_empty() {
        Span::styled("(not set)", label.italic())
    } else {
        Span::styled(app.profile.display_name.clone(), value.bold())
    };

    // Data URIs are long; show the media type and size instead
    let avatar = match &app.profile.avatar {
        Some(uri) => {
            let kind = uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .unwrap_or("image");
            format!("{} ({} KB inline)", kind, uri.len() / 1024)
        }
        None => app.profile.avatar_or_placeholder().to_string(),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(field_marker(app, ProfileField::Name), label),
            Span::styled("Name:   ", label),
            name,
        ]),
        Line::from(vec![
            Span::styled("  Theme:  ", label),
            Span::styled(
                if app.profile.dark_theme { "dark" } else { "light" },
                value,
            ),
            Span::styled("  (Ctrl+T)", label),
        ]),
        Line::from(vec![
            Span::styled(field_marker(app, ProfileField::AvatarPath), label),
            Span::styled("Avatar: ", label),
            Span::styled(avatar, value),
        ]),
        Line::raw(""),
        Line::styled("  Recent weather searches", Style::default().fg(palette.accent).bold()),
    ];
    lines.extend(history_lines(app, palette));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
