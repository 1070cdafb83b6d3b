use super::layout::{Grid, Screen};
use crate::app::App;
use crate::view::CardView;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(app: &App, frame: &mut Frame) {
    let screen = Screen::new(frame.area());

    // ── Header ──
    let header_text = format!(
        " Podcast Explorer   [{} of {} podcasts]",
        app.grid.cards().len(),
        app.catalog.podcasts.len()
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, screen.header);

    // ── Controls ──
    let (genre_area, sort_area) = screen.selectors();
    let genre = Paragraph::new(Line::from(vec![
        Span::styled(" ◂ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.grid.genre_filter().label(&app.catalog),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" ▸ ", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Genre [g] "),
    );
    frame.render_widget(genre, genre_area);

    let sort = Paragraph::new(Line::from(vec![
        Span::styled(" ◂ ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.grid.sort_key().label(), Style::default().fg(Color::Yellow)),
        Span::styled(" ▸ ", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Sort [s] "),
    );
    frame.render_widget(sort, sort_area);

    // ── Cards ──
    let grid = Grid::new(screen.grid);
    if app.grid.cards().is_empty() {
        let empty = Paragraph::new("No podcasts match this genre.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, screen.grid);
    }
    for (index, card) in app.grid.cards().iter().enumerate() {
        if let Some(rect) = grid.card_rect(index, app.grid.first_row()) {
            render_card(frame, rect, card, index == app.grid.focused());
        }
    }

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→/Tab", key_style),
        Span::raw(" Move  "),
        Span::styled("Enter", key_style),
        Span::raw(" Details  "),
        Span::styled("g", key_style),
        Span::raw(" Genre  "),
        Span::styled("s", key_style),
        Span::raw(" Sort  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), screen.status);
}

fn render_card(frame: &mut Frame, area: Rect, card: &CardView, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text_width = area.width.saturating_sub(2) as usize;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} ", truncate_str(&card.title, text_width.saturating_sub(2))),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::from(vec![
            Span::styled(" ≡ ", Style::default().fg(Color::DarkGray)),
            Span::raw(card.seasons_label.as_str()),
        ]),
        Line::from(vec![
            Span::styled(" ◷ ", Style::default().fg(Color::DarkGray)),
            Span::styled(card.updated_label.as_str(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(genre_tags(&card.genres)),
        Line::from(Span::styled(
            format!(" ▣ {}", truncate_str(&card.cover.alt, text_width.saturating_sub(3))),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Genre names as discrete tags.
pub fn genre_tags(genres: &[String]) -> Vec<Span<'_>> {
    let mut spans = vec![Span::raw(" ")];
    for name in genres {
        spans.push(Span::styled(
            format!(" {name} "),
            Style::default().fg(Color::Black).bg(Color::Magenta),
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}
