use crate::catalog::Catalog;
use crate::config::ExplorerConfig;
use crate::overlay::DetailOverlay;
use crate::ui::layout::{Grid, Screen};
use crate::view::{CatalogView, GenreFilter};
use chrono::{DateTime, Utc};
use ratatui::layout::Rect;

/// Lines moved per overlay scroll step from the wheel.
pub const WHEEL_LINES: u16 = 3;

/// Main application state.
pub struct App {
    pub catalog: Catalog,
    pub grid: CatalogView,
    pub overlay: DetailOverlay,
    pub should_quit: bool,
    pub show_help: bool,
    pub status_msg: String,

    // Last known terminal size, used for grid geometry and hit testing
    pub area: Rect,

    clock: fn() -> DateTime<Utc>,
}

impl App {
    pub fn new(catalog: Catalog, config: &ExplorerConfig) -> Self {
        Self::with_clock(catalog, config, Utc::now)
    }

    /// Same as [`App::new`] with a fixed time source for relative dates.
    pub fn with_clock(catalog: Catalog, config: &ExplorerConfig, clock: fn() -> DateTime<Utc>) -> Self {
        let mut app = Self {
            grid: CatalogView::new(
                GenreFilter::from(config.default_genre),
                config.default_sort,
                config.date_format.clone(),
            ),
            overlay: DetailOverlay::new(config.date_format.clone()),
            catalog,
            should_quit: false,
            show_help: false,
            status_msg: String::new(),
            area: Rect::new(0, 0, 80, 24),
            clock,
        };
        app.grid.refresh(&app.catalog, clock());
        app.update_status();
        app
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        let grid = self.grid_geometry();
        self.grid.ensure_focus_visible(grid.columns, grid.visible_rows);
    }

    pub fn grid_geometry(&self) -> Grid {
        Grid::new(Screen::new(self.area).grid)
    }

    fn update_status(&mut self) {
        self.status_msg = format!(
            "{} of {} podcasts · {} · {}",
            self.grid.cards().len(),
            self.catalog.podcasts.len(),
            self.grid.genre_filter().label(&self.catalog),
            self.grid.sort_key().label(),
        );
    }

    pub fn cycle_genre(&mut self, forward: bool) {
        let now = self.now();
        self.grid.cycle_genre(forward, &self.catalog, now);
        self.update_status();
    }

    pub fn cycle_sort(&mut self, forward: bool) {
        let now = self.now();
        self.grid.cycle_sort(forward, &self.catalog, now);
        self.update_status();
    }

    /// Move card focus. Suppressed while the detail overlay is open.
    pub fn move_focus(&mut self, delta: isize) {
        if self.overlay.locks_background_scroll() {
            return;
        }
        self.grid.move_focus(delta);
        let grid = self.grid_geometry();
        self.grid.ensure_focus_visible(grid.columns, grid.visible_rows);
    }

    pub fn focus_next(&mut self) {
        if self.overlay.locks_background_scroll() {
            return;
        }
        self.grid.focus_next();
        let grid = self.grid_geometry();
        self.grid.ensure_focus_visible(grid.columns, grid.visible_rows);
    }

    pub fn focus_prev(&mut self) {
        if self.overlay.locks_background_scroll() {
            return;
        }
        self.grid.focus_prev();
        let grid = self.grid_geometry();
        self.grid.ensure_focus_visible(grid.columns, grid.visible_rows);
    }

    /// Move focus by whole grid rows.
    pub fn move_focus_rows(&mut self, rows: isize) {
        let columns = self.grid_geometry().columns as isize;
        self.move_focus(rows * columns);
    }

    /// Scroll the grid by rows. Suppressed while the detail overlay is open.
    pub fn scroll_grid(&mut self, rows: isize) {
        if self.overlay.locks_background_scroll() {
            return;
        }
        let grid = self.grid_geometry();
        self.grid.scroll_rows(rows, grid.columns, grid.visible_rows);
    }

    /// Wheel input goes to the overlay when it is open, the grid otherwise.
    pub fn wheel(&mut self, down: bool) {
        if self.overlay.is_open() {
            if down {
                self.overlay.scroll_down(WHEEL_LINES);
            } else {
                self.overlay.scroll_up(WHEEL_LINES);
            }
        } else {
            self.scroll_grid(if down { 1 } else { -1 });
        }
    }

    /// Open the detail overlay for the card at `index` of the visible set.
    pub fn open_card(&mut self, index: usize) {
        let Some(card) = self.grid.cards().get(index) else {
            return;
        };
        let id = card.id.clone();
        let now = self.now();
        match self.catalog.podcast(&id) {
            Some(podcast) => {
                self.overlay.open(podcast, &self.catalog, now);
                self.grid.focus(index);
                self.status_msg = format!("Viewing {}", podcast.title);
            }
            None => tracing::warn!(%id, "card refers to a podcast missing from the catalog"),
        }
    }

    pub fn open_focused(&mut self) {
        self.open_card(self.grid.focused());
    }

    /// Replace the displayed podcast with the next or previous visible one.
    pub fn open_neighbour(&mut self, forward: bool) {
        let Some(current) = self.overlay.detail().map(|d| d.id.clone()) else {
            return;
        };
        if let Some(index) = self.grid.neighbour_of(&current, forward) {
            self.open_card(index);
            let grid = self.grid_geometry();
            self.grid.ensure_focus_visible(grid.columns, grid.visible_rows);
        }
    }

    /// Dismiss the detail overlay. No-op when already closed.
    pub fn close_detail(&mut self) -> bool {
        let closed = self.overlay.close();
        if closed {
            self.update_status();
        }
        closed
    }
}
