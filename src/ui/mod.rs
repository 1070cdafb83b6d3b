mod detail;
mod grid;
mod help;
pub mod layout;

pub use grid::truncate_str;

use crate::app::App;
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    grid::render(app, frame);

    if !app.overlay.aria_hidden() {
        detail::render(app, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_grid_draws_cards_and_controls() {
        let app = test_app();
        let screen = draw(&app);
        assert!(screen.contains("Podcast Explorer"));
        assert!(screen.contains("All genres"));
        assert!(screen.contains("Recently updated"));
        assert!(screen.contains("Something Was Wrong"));
        assert!(screen.contains("14 seasons"));
    }

    #[test]
    fn test_overlay_draws_seasons() {
        let mut app = test_app();
        app.open_card(0);
        let screen = draw(&app);
        assert!(screen.contains("[x]"));
        assert!(screen.contains("Seasons"));
        assert!(screen.contains("Season 1"));
        assert!(screen.contains("10 episodes"));
    }

    #[test]
    fn test_closed_overlay_is_not_drawn() {
        let mut app = test_app();
        app.open_card(0);
        app.close_detail();
        let screen = draw(&app);
        assert!(!screen.contains("[x]"));
    }

    #[test]
    fn test_placeholder_row_drawn_for_missing_seasons() {
        let catalog = crate::catalog::Catalog::from_json(
            r#"{"podcasts": [{"id": "1", "title": "Lonely", "updated": "2024-11-01T00:00:00Z"}]}"#,
        )
        .unwrap();
        let mut app = App::with_clock(catalog, &crate::config::ExplorerConfig::default(), crate::app::tests::fixed_now);
        app.resize(80, 24);
        app.open_card(0);
        let screen = draw(&app);
        assert!(screen.contains(crate::overlay::NO_SEASONS));
    }

    #[test]
    fn test_help_draws_on_top() {
        let mut app = test_app();
        app.show_help = true;
        let screen = draw(&app);
        assert!(screen.contains("Keybindings"));
    }
}
