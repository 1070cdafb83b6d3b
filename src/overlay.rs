use crate::catalog::{Catalog, Podcast, PodcastId};
use crate::format::{pluralize, relative_date_str};
use crate::view::Cover;
use chrono::{DateTime, Utc};

/// Row shown when a podcast has no season group.
pub const NO_SEASONS: &str = "No seasons available";

/// One row of the seasons list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRow {
    pub title: String,
    /// `None` only for the placeholder row.
    pub episodes_label: Option<String>,
}

impl SeasonRow {
    pub fn placeholder() -> Self {
        Self {
            title: NO_SEASONS.to_string(),
            episodes_label: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.episodes_label.is_none()
    }
}

/// Render tree for the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: PodcastId,
    pub title: String,
    pub description: String,
    pub cover: Cover,
    pub genres: Vec<String>,
    pub updated_label: String,
    pub seasons: Vec<SeasonRow>,
}

impl DetailView {
    pub fn build(podcast: &Podcast, catalog: &Catalog, now: DateTime<Utc>, date_format: &str) -> Self {
        let seasons = match catalog.seasons_for(&podcast.id) {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|s| SeasonRow {
                    title: s.title.clone(),
                    episodes_label: Some(pluralize(s.episodes, "episode")),
                })
                .collect(),
            _ => vec![SeasonRow::placeholder()],
        };

        Self {
            id: podcast.id.clone(),
            title: podcast.title.clone(),
            description: podcast.description.clone(),
            cover: Cover {
                uri: podcast.image.clone(),
                alt: format!("{} cover", podcast.title),
            },
            genres: catalog.genre_names(&podcast.genres),
            updated_label: relative_date_str(&podcast.updated, now, date_format),
            seasons,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(Box<DetailView>),
}

/// Modal detail panel. Lives for the whole session.
#[derive(Debug, Clone)]
pub struct DetailOverlay {
    state: OverlayState,
    date_format: String,
    scroll: u16,
}

impl DetailOverlay {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            state: OverlayState::Closed,
            date_format: date_format.into(),
            scroll: 0,
        }
    }

    /// Show `podcast`, replacing whatever is displayed.
    pub fn open(&mut self, podcast: &Podcast, catalog: &Catalog, now: DateTime<Utc>) {
        let detail = DetailView::build(podcast, catalog, now, &self.date_format);
        tracing::debug!(id = %detail.id, replaced = self.is_open(), "detail overlay opened");
        self.state = OverlayState::Open(Box::new(detail));
        self.scroll = 0;
    }

    /// Hide the overlay. Returns `false` when it was already closed.
    pub fn close(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            OverlayState::Closed => false,
            OverlayState::Open(detail) => {
                tracing::debug!(id = %detail.id, "detail overlay closed");
                self.scroll = 0;
                true
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, OverlayState::Open(_))
    }

    pub fn detail(&self) -> Option<&DetailView> {
        match &self.state {
            OverlayState::Open(detail) => Some(detail.as_ref()),
            OverlayState::Closed => None,
        }
    }

    /// Accessibility hidden flag, the inverse of visibility.
    pub fn aria_hidden(&self) -> bool {
        !self.is_open()
    }

    /// Background scrolling is suppressed exactly while open.
    pub fn locks_background_scroll(&self) -> bool {
        self.is_open()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self, lines: u16) {
        if self.is_open() {
            self.scroll = self.scroll.saturating_add(lines);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}
