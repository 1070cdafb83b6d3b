use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

pub const CARD_MIN_WIDTH: u16 = 34;
/// Two border rows plus four content lines.
pub const CARD_HEIGHT: u16 = 6;

const CLOSE_LABEL_WIDTH: u16 = 5;

/// Top-level screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub header: Rect,
    pub controls: Rect,
    pub grid: Rect,
    pub status: Rect,
}

impl Screen {
    pub fn new(area: Rect) -> Self {
        // Layout: header(3) + controls(3) + grid(min) + status(1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(CARD_HEIGHT),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: chunks[0],
            controls: chunks[1],
            grid: chunks[2],
            status: chunks[3],
        }
    }

    /// Genre selector on the left, sort selector on the right.
    pub fn selectors(&self) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(self.controls);
        (chunks[0], chunks[1])
    }
}

/// Card grid geometry for a given area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub area: Rect,
    pub columns: usize,
    pub visible_rows: usize,
}

impl Grid {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            columns: (area.width / CARD_MIN_WIDTH).max(1) as usize,
            visible_rows: (area.height / CARD_HEIGHT).max(1) as usize,
        }
    }

    fn card_width(&self) -> u16 {
        self.area.width / self.columns as u16
    }

    /// Where card `index` is drawn when the grid starts at `first_row`.
    pub fn card_rect(&self, index: usize, first_row: usize) -> Option<Rect> {
        let row = index / self.columns;
        if row < first_row || row >= first_row + self.visible_rows {
            return None;
        }
        let col = (index % self.columns) as u16;
        let width = self.card_width();
        let rect = Rect::new(
            self.area.x + col * width,
            self.area.y + (row - first_row) as u16 * CARD_HEIGHT,
            width,
            CARD_HEIGHT,
        );
        Some(rect.intersection(self.area))
    }

    /// Card under a pointer position, if any.
    pub fn hit(&self, position: Position, first_row: usize, count: usize) -> Option<usize> {
        if !self.area.contains(position) {
            return None;
        }
        let col = ((position.x - self.area.x) / self.card_width().max(1)) as usize;
        let row = ((position.y - self.area.y) / CARD_HEIGHT) as usize;
        if col >= self.columns || row >= self.visible_rows {
            return None;
        }
        let index = (first_row + row) * self.columns + col;
        (index < count).then_some(index)
    }
}

/// Create a centered rectangle using percentage of parent area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// The detail overlay's content region. Everything outside it is backdrop.
pub fn overlay_rect(area: Rect) -> Rect {
    centered_rect(80, 80, area)
}

/// The `[x]` close control drawn in the overlay's top border.
pub fn close_button_rect(overlay: Rect) -> Rect {
    Rect::new(
        overlay.right().saturating_sub(CLOSE_LABEL_WIDTH + 1),
        overlay.y,
        CLOSE_LABEL_WIDTH,
        1,
    )
    .intersection(overlay)
}
