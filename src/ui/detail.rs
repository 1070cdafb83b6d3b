use super::grid::{genre_tags, truncate_str};
use super::layout::overlay_rect;
use crate::app::App;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    let detail = match app.overlay.detail() {
        Some(d) => d,
        None => return,
    };
    let area = overlay_rect(frame.area());
    let uri_width = area.width.saturating_sub(5) as usize;

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" ▣ {}", detail.cover.alt),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
        Line::from(Span::styled(
            format!("   {}", truncate_str(&detail.cover.uri, uri_width)),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", detail.description),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(genre_tags(&detail.genres)),
        Line::from(vec![
            Span::styled(" ◷ Last updated: ", Style::default().fg(Color::DarkGray)),
            Span::styled(detail.updated_label.as_str(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Seasons",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    for row in &detail.seasons {
        if row.is_placeholder() {
            lines.push(Line::from(Span::styled(
                format!("   {}", row.title),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("   {}", row.title), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(
                row.episodes_label.as_deref().unwrap_or_default(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.overlay.scroll(), 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    format!(" {} ", detail.title),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .title(
                    Line::from(Span::styled(" [x] ", Style::default().fg(Color::Red)))
                        .alignment(Alignment::Right),
                )
                .title_bottom(
                    Line::from(" Esc/x Close  n/p Next/Prev  ↑↓ Scroll ")
                        .style(Style::default().fg(Color::DarkGray)),
                ),
        );

    frame.render_widget(body, area);
}
