use crate::app::App;
use crate::ui::layout::{Screen, close_button_rect, overlay_rect};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

/// Lines moved per PageUp/PageDown inside the detail overlay.
const OVERLAY_PAGE: u16 = 10;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.overlay.is_open() {
        handle_overlay_key(app, key);
    } else {
        handle_grid_key(app, key);
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.move_focus(1),
        KeyCode::Left | KeyCode::Char('h') => app.move_focus(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_focus_rows(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_focus_rows(-1),
        KeyCode::PageDown => {
            let rows = app.grid_geometry().visible_rows as isize;
            app.move_focus_rows(rows);
        }
        KeyCode::PageUp => {
            let rows = app.grid_geometry().visible_rows as isize;
            app.move_focus_rows(-rows);
        }
        KeyCode::Home => app.move_focus(isize::MIN),
        KeyCode::End => app.move_focus(isize::MAX),
        KeyCode::Enter | KeyCode::Char(' ') => app.open_focused(),
        KeyCode::Char('g') => app.cycle_genre(true),
        KeyCode::Char('G') => app.cycle_genre(false),
        KeyCode::Char('s') => app.cycle_sort(true),
        KeyCode::Char('S') => app.cycle_sort(false),
        // Esc has nothing to dismiss here
        _ => {}
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('x') => {
            app.close_detail();
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Down | KeyCode::Char('j') => app.overlay.scroll_down(1),
        KeyCode::Up | KeyCode::Char('k') => app.overlay.scroll_up(1),
        KeyCode::PageDown => app.overlay.scroll_down(OVERLAY_PAGE),
        KeyCode::PageUp => app.overlay.scroll_up(OVERLAY_PAGE),
        KeyCode::Char('n') => app.open_neighbour(true),
        KeyCode::Char('p') => app.open_neighbour(false),
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let position = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => click(app, position),
        MouseEventKind::ScrollDown => app.wheel(true),
        MouseEventKind::ScrollUp => app.wheel(false),
        _ => {}
    }
}

fn click(app: &mut App, position: Position) {
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.overlay.is_open() {
        let content = overlay_rect(app.area);
        if close_button_rect(content).contains(position) || !content.contains(position) {
            app.close_detail();
        }
        return;
    }

    let (genre, sort) = Screen::new(app.area).selectors();
    let grid = app.grid_geometry();
    if genre.contains(position) {
        app.cycle_genre(true);
    } else if sort.contains(position) {
        app.cycle_sort(true);
    } else if let Some(index) = grid.hit(position, app.grid.first_row(), app.grid.cards().len()) {
        app.open_card(index);
    }
}
