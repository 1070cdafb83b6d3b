use super::layout::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        format!("  {title}"),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )])
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {keys:<12}"), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("Global"),
        binding("?", "Toggle this help"),
        binding("q / Ctrl+C", "Quit application"),
        Line::from(""),
        section("Grid"),
        binding("Tab/S-Tab", "Next/previous card"),
        binding("←↑↓→ hjkl", "Move between cards"),
        binding("PgUp/PgDn", "Scroll a page of rows"),
        binding("Enter/Space", "Open podcast details"),
        binding("g / G", "Next/previous genre filter"),
        binding("s / S", "Next/previous sort order"),
        binding("click", "Open a card, or cycle a selector"),
        Line::from(""),
        section("Details"),
        binding("Esc / x", "Close"),
        binding("click [x]", "Close"),
        binding("click outside", "Close"),
        binding("↑/↓ wheel", "Scroll content"),
        binding("n / p", "Next/previous podcast"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help — Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
