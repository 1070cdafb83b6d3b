use crate::catalog::{Catalog, GenreId, Podcast, PodcastId, UNKNOWN_GENRE};
use crate::format::{pluralize, relative_date_str};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Which genre the grid is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Genre(GenreId),
}

impl GenreFilter {
    pub fn matches(self, podcast: &Podcast) -> bool {
        match self {
            Self::All => true,
            Self::Genre(id) => podcast.genres.contains(&id),
        }
    }

    pub fn genre_id(self) -> Option<GenreId> {
        match self {
            Self::All => None,
            Self::Genre(id) => Some(id),
        }
    }

    pub fn label(self, catalog: &Catalog) -> String {
        match self {
            Self::All => "All genres".to_string(),
            Self::Genre(id) => catalog.genre_title(id).unwrap_or(UNKNOWN_GENRE).to_string(),
        }
    }
}

impl From<Option<GenreId>> for GenreFilter {
    fn from(id: Option<GenreId>) -> Self {
        id.map_or(Self::All, Self::Genre)
    }
}

impl FromStr for GenreFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<GenreId>()
            .map(Self::Genre)
            .map_err(|_| format!("expected \"all\" or a genre id, got \"{s}\""))
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.pad("all"),
            Self::Genre(id) => f.pad(&id.to_string()),
        }
    }
}

/// "all" followed by every genre in data-set order.
pub fn filter_options(catalog: &Catalog) -> Vec<GenreFilter> {
    std::iter::once(GenreFilter::All)
        .chain(catalog.genres.iter().map(|g| GenreFilter::Genre(g.id)))
        .collect()
}

/// Grid ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    Updated,
    /// Title, A to Z
    Title,
    /// Most seasons first
    Seasons,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            Self::Updated => Self::Title,
            Self::Title => Self::Seasons,
            Self::Seasons => Self::Updated,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Updated => Self::Seasons,
            Self::Title => Self::Updated,
            Self::Seasons => Self::Title,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Updated => "Recently updated",
            Self::Title => "Title A-Z",
            Self::Seasons => "Most seasons",
        }
    }
}

/// Title ordering close to a root-locale collator.
///
/// Letters compare first with accents and case folded away, so "Écoute" sorts
/// among the e's. Remaining ties go to accents, then lowercase before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| a.nfd().flat_map(char::to_lowercase).cmp(b.nfd().flat_map(char::to_lowercase)))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Filter then sort, without touching `podcasts`.
///
/// All orderings are stable, so ties keep their relative input order.
/// Podcasts with a malformed `updated` value sort last under [`SortKey::Updated`].
pub fn compute_visible_set<'a>(
    podcasts: &'a [Podcast],
    filter: GenreFilter,
    sort: SortKey,
) -> Vec<&'a Podcast> {
    let mut list: Vec<&Podcast> = podcasts.iter().filter(|p| filter.matches(p)).collect();

    match sort {
        SortKey::Title => list.sort_by(|a, b| locale_compare(&a.title, &b.title)),
        SortKey::Seasons => list.sort_by(|a, b| b.seasons.cmp(&a.seasons)),
        SortKey::Updated => list.sort_by_cached_key(|p| std::cmp::Reverse(p.updated_at())),
    }

    list
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    pub uri: String,
    pub alt: String,
}

/// Render tree for one summary card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: PodcastId,
    pub title: String,
    pub cover: Cover,
    pub seasons_label: String,
    pub updated_label: String,
    pub genres: Vec<String>,
}

impl CardView {
    pub fn build(podcast: &Podcast, catalog: &Catalog, now: DateTime<Utc>, date_format: &str) -> Self {
        Self {
            id: podcast.id.clone(),
            title: podcast.title.clone(),
            cover: Cover {
                uri: podcast.image.clone(),
                alt: format!("{} cover image", podcast.title),
            },
            seasons_label: pluralize(podcast.seasons, "season"),
            updated_label: relative_date_str(&podcast.updated, now, date_format),
            genres: catalog.genre_names(&podcast.genres),
        }
    }
}

/// Grid state: selection controls, the rendered cards and keyboard focus.
#[derive(Debug, Clone)]
pub struct CatalogView {
    genre_filter: GenreFilter,
    sort_key: SortKey,
    date_format: String,
    cards: Vec<CardView>,
    focused: usize,
    first_row: usize,
}

impl CatalogView {
    pub fn new(genre_filter: GenreFilter, sort_key: SortKey, date_format: impl Into<String>) -> Self {
        Self {
            genre_filter,
            sort_key,
            date_format: date_format.into(),
            cards: Vec::new(),
            focused: 0,
            first_row: 0,
        }
    }

    pub fn genre_filter(&self) -> GenreFilter {
        self.genre_filter
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Recompute the visible set from the current controls and re-render.
    pub fn refresh(&mut self, catalog: &Catalog, now: DateTime<Utc>) {
        let visible = compute_visible_set(&catalog.podcasts, self.genre_filter, self.sort_key);
        tracing::debug!(
            filter = %self.genre_filter,
            sort = ?self.sort_key,
            visible = visible.len(),
            "visible set recomputed"
        );
        self.render(&visible, catalog, now);
    }

    /// Replace the rendered set with one card per podcast, in order.
    pub fn render(&mut self, ordered: &[&Podcast], catalog: &Catalog, now: DateTime<Utc>) {
        self.cards = ordered
            .iter()
            .map(|p| CardView::build(p, catalog, now, &self.date_format))
            .collect();
        self.focused = 0;
        self.first_row = 0;
    }

    pub fn set_genre_filter(&mut self, filter: GenreFilter, catalog: &Catalog, now: DateTime<Utc>) {
        self.genre_filter = filter;
        self.refresh(catalog, now);
    }

    pub fn set_sort_key(&mut self, sort: SortKey, catalog: &Catalog, now: DateTime<Utc>) {
        self.sort_key = sort;
        self.refresh(catalog, now);
    }

    /// Step through "all" and each genre, wrapping around.
    pub fn cycle_genre(&mut self, forward: bool, catalog: &Catalog, now: DateTime<Utc>) {
        let options = filter_options(catalog);
        let current = options
            .iter()
            .position(|&f| f == self.genre_filter)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        self.set_genre_filter(options[next], catalog, now);
    }

    pub fn cycle_sort(&mut self, forward: bool, catalog: &Catalog, now: DateTime<Utc>) {
        let sort = if forward {
            self.sort_key.next()
        } else {
            self.sort_key.prev()
        };
        self.set_sort_key(sort, catalog, now);
    }

    /// Move focus by `delta` cards, clamped to the grid.
    pub fn move_focus(&mut self, delta: isize) {
        if self.cards.is_empty() {
            return;
        }
        let last = self.cards.len() - 1;
        self.focused = self.focused.saturating_add_signed(delta).min(last);
    }

    /// Sequential navigation: wraps past either end.
    pub fn focus_next(&mut self) {
        if !self.cards.is_empty() {
            self.focused = (self.focused + 1) % self.cards.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.cards.is_empty() {
            self.focused = (self.focused + self.cards.len() - 1) % self.cards.len();
        }
    }

    pub fn focus(&mut self, index: usize) {
        if index < self.cards.len() {
            self.focused = index;
        }
    }

    /// Scroll so the focused card's row is within the visible rows.
    pub fn ensure_focus_visible(&mut self, columns: usize, visible_rows: usize) {
        let columns = columns.max(1);
        let visible_rows = visible_rows.max(1);
        let row = self.focused / columns;
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row + visible_rows {
            self.first_row = row + 1 - visible_rows;
        }
    }

    /// Scroll by whole rows without moving focus off screen.
    pub fn scroll_rows(&mut self, delta: isize, columns: usize, visible_rows: usize) {
        let columns = columns.max(1);
        let total_rows = self.cards.len().div_ceil(columns);
        let max_first = total_rows.saturating_sub(visible_rows.max(1));
        self.first_row = self.first_row.saturating_add_signed(delta).min(max_first);

        let first_visible = self.first_row * columns;
        let last_visible = ((self.first_row + visible_rows.max(1)) * columns).min(self.cards.len());
        if self.focused < first_visible {
            self.focused = first_visible;
        } else if last_visible > 0 && self.focused >= last_visible {
            self.focused = last_visible - 1;
        }
    }

    /// Visible card index following `id`, wrapping.
    pub fn neighbour_of(&self, id: &PodcastId, forward: bool) -> Option<usize> {
        let pos = self.cards.iter().position(|c| &c.id == id)?;
        let len = self.cards.len();
        Some(if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn podcast(id: &str, title: &str, seasons: u32, genres: &[GenreId], updated: &str) -> Podcast {
        Podcast {
            id: PodcastId::new(id),
            title: title.to_string(),
            description: String::new(),
            seasons,
            image: String::new(),
            genres: genres.to_vec(),
            updated: updated.to_string(),
        }
    }

    fn ids(list: &[&Podcast]) -> Vec<String> {
        list.iter().map(|p| p.id.to_string()).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seasons_sort_is_stable() {
        let items = vec![
            podcast("a", "A", 3, &[], "2024-01-01T00:00:00Z"),
            podcast("b", "B", 3, &[], "2024-01-01T00:00:00Z"),
            podcast("c", "C", 7, &[], "2024-01-01T00:00:00Z"),
        ];
        let sorted = compute_visible_set(&items, GenreFilter::All, SortKey::Seasons);
        assert_eq!(ids(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_title_sort() {
        let items = vec![
            podcast("1", "Scamfluencers", 3, &[], "2024-01-01T00:00:00Z"),
            podcast("2", "American History Tellers", 51, &[], "2024-01-01T00:00:00Z"),
        ];
        let sorted = compute_visible_set(&items, GenreFilter::All, SortKey::Title);
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["American History Tellers", "Scamfluencers"]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let items = vec![
            podcast("1", "zebra", 0, &[], "2024-01-01T00:00:00Z"),
            podcast("2", "Apple", 0, &[], "2024-01-01T00:00:00Z"),
            podcast("3", "apple", 0, &[], "2024-01-01T00:00:00Z"),
        ];
        let sorted = compute_visible_set(&items, GenreFilter::All, SortKey::Title);
        assert_eq!(ids(&sorted), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_title_sort_folds_accents() {
        let items = vec![
            podcast("1", "Zebra Talk", 0, &[], "2024-01-01T00:00:00Z"),
            podcast("2", "Écoute", 0, &[], "2024-01-01T00:00:00Z"),
            podcast("3", "Ecology Now", 0, &[], "2024-01-01T00:00:00Z"),
            podcast("4", "ecoute", 0, &[], "2024-01-01T00:00:00Z"),
        ];
        let sorted = compute_visible_set(&items, GenreFilter::All, SortKey::Title);
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Ecology Now", "ecoute", "Écoute", "Zebra Talk"]);
    }

    #[test]
    fn test_locale_compare_tie_breaks() {
        assert_eq!(locale_compare("cafe", "café"), Ordering::Less);
        assert_eq!(locale_compare("café", "Café"), Ordering::Less);
        assert_eq!(locale_compare("Café", "cafes"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_updated_sort_descending_malformed_last() {
        let items = vec![
            podcast("old", "Old", 1, &[], "2024-01-01T00:00:00Z"),
            podcast("bad", "Bad", 1, &[], "yesterday-ish"),
            podcast("new", "New", 1, &[], "2024-06-01T00:00:00Z"),
        ];
        let sorted = compute_visible_set(&items, GenreFilter::All, SortKey::Updated);
        assert_eq!(ids(&sorted), vec!["new", "old", "bad"]);
    }

    #[test]
    fn test_updated_sort_ties_keep_order() {
        let items = vec![
            podcast("x", "X", 1, &[], "2024-06-01T00:00:00Z"),
            podcast("y", "Y", 1, &[], "2024-06-01T00:00:00.000Z"),
        ];
        let sorted = compute_visible_set(&items, GenreFilter::All, SortKey::Updated);
        assert_eq!(ids(&sorted), vec!["x", "y"]);
    }

    #[test]
    fn test_source_is_not_mutated() {
        let items = vec![
            podcast("a", "B title", 1, &[1], "2024-01-01T00:00:00Z"),
            podcast("b", "A title", 2, &[2], "2024-02-01T00:00:00Z"),
        ];
        let _ = compute_visible_set(&items, GenreFilter::Genre(2), SortKey::Title);
        assert_eq!(items[0].id, PodcastId::new("a"));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_investigative_journalism_by_updated() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.genre_title(2), Some("Investigative Journalism"));
        let sorted = compute_visible_set(&catalog.podcasts, GenreFilter::Genre(2), SortKey::Updated);
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Something Was Wrong",
                "This Is Actually Happening",
                "Killer Psyche",
                "Scamfluencers",
            ]
        );
    }

    #[test]
    fn test_genre_filter_parse() {
        assert_eq!("all".parse::<GenreFilter>(), Ok(GenreFilter::All));
        assert_eq!("ALL".parse::<GenreFilter>(), Ok(GenreFilter::All));
        assert_eq!("3".parse::<GenreFilter>(), Ok(GenreFilter::Genre(3)));
        assert!("comedy".parse::<GenreFilter>().is_err());
    }

    #[test]
    fn test_genre_filter_display_pads() {
        assert_eq!(format!("{:>4}", GenreFilter::Genre(2)), "   2");
        assert_eq!(format!("{:>4}", GenreFilter::All), " all");
        assert_eq!(GenreFilter::from(GenreFilter::Genre(5).genre_id()), GenreFilter::Genre(5));
    }

    #[test]
    fn test_filter_options_order() {
        let catalog = Catalog::builtin().unwrap();
        let options = filter_options(&catalog);
        assert_eq!(options.len(), 6);
        assert_eq!(options[0], GenreFilter::All);
        assert_eq!(options[1], GenreFilter::Genre(1));
        assert_eq!(options[1].label(&catalog), "Personal Growth");
    }

    #[test]
    fn test_card_view_labels() {
        let catalog = Catalog::builtin().unwrap();
        let mut p = podcast("x", "Solo", 1, &[4, 42], "2024-11-09T12:00:00Z");
        p.image = "https://example.com/x.png".to_string();
        let card = CardView::build(&p, &catalog, now(), crate::format::DEFAULT_DATE_FORMAT);
        assert_eq!(card.seasons_label, "1 season");
        assert_eq!(card.updated_label, "Yesterday");
        assert_eq!(card.genres, vec!["Comedy", "Unknown"]);
        assert_eq!(card.cover.alt, "Solo cover image");
        assert_eq!(card.cover.uri, "https://example.com/x.png");
    }

    #[test]
    fn test_card_view_bad_date_does_not_blank_grid() {
        let catalog = Catalog::from_json(
            r#"{"podcasts": [
                {"id": "1", "title": "Good", "updated": "2024-11-09T12:00:00Z"},
                {"id": "2", "title": "Bad", "updated": "??"}
            ]}"#,
        )
        .unwrap();
        let mut view = CatalogView::new(GenreFilter::All, SortKey::Title, crate::format::DEFAULT_DATE_FORMAT);
        view.refresh(&catalog, now());
        assert_eq!(view.cards().len(), 2);
        assert_eq!(view.cards()[0].updated_label, crate::format::UNKNOWN_DATE);
    }

    #[test]
    fn test_catalog_view_cycles_controls() {
        let catalog = Catalog::builtin().unwrap();
        let mut view = CatalogView::new(GenreFilter::All, SortKey::Updated, crate::format::DEFAULT_DATE_FORMAT);
        view.refresh(&catalog, now());
        assert_eq!(view.cards().len(), 8);

        view.cycle_genre(true, &catalog, now());
        assert_eq!(view.genre_filter(), GenreFilter::Genre(1));
        assert_eq!(view.cards().len(), 2);

        view.cycle_genre(false, &catalog, now());
        view.cycle_genre(false, &catalog, now());
        assert_eq!(view.genre_filter(), GenreFilter::Genre(5));

        view.cycle_sort(true, &catalog, now());
        assert_eq!(view.sort_key(), SortKey::Title);
        view.cycle_sort(false, &catalog, now());
        view.cycle_sort(false, &catalog, now());
        assert_eq!(view.sort_key(), SortKey::Seasons);
    }

    #[test]
    fn test_refresh_resets_focus() {
        let catalog = Catalog::builtin().unwrap();
        let mut view = CatalogView::new(GenreFilter::All, SortKey::Updated, crate::format::DEFAULT_DATE_FORMAT);
        view.refresh(&catalog, now());
        view.focus(5);
        assert_eq!(view.focused(), 5);
        view.set_sort_key(SortKey::Title, &catalog, now());
        assert_eq!(view.focused(), 0);
        assert_eq!(view.first_row(), 0);
    }

    #[test]
    fn test_focus_navigation() {
        let catalog = Catalog::builtin().unwrap();
        let mut view = CatalogView::new(GenreFilter::All, SortKey::Updated, crate::format::DEFAULT_DATE_FORMAT);
        view.refresh(&catalog, now());

        view.focus_prev();
        assert_eq!(view.focused(), 7);
        view.focus_next();
        assert_eq!(view.focused(), 0);
        view.move_focus(3);
        assert_eq!(view.focused(), 3);
        view.move_focus(10);
        assert_eq!(view.focused(), 7);
        view.move_focus(-20);
        assert_eq!(view.focused(), 0);
    }

    #[test]
    fn test_ensure_focus_visible_and_scroll() {
        let catalog = Catalog::builtin().unwrap();
        let mut view = CatalogView::new(GenreFilter::All, SortKey::Updated, crate::format::DEFAULT_DATE_FORMAT);
        view.refresh(&catalog, now());

        // 2 columns, 2 visible rows, 4 rows total.
        view.focus(7);
        view.ensure_focus_visible(2, 2);
        assert_eq!(view.first_row(), 2);

        view.scroll_rows(-1, 2, 2);
        assert_eq!(view.first_row(), 1);
        assert_eq!(view.focused(), 5);

        view.scroll_rows(10, 2, 2);
        assert_eq!(view.first_row(), 2);
    }

    #[test]
    fn test_neighbour_of_wraps() {
        let catalog = Catalog::builtin().unwrap();
        let mut view = CatalogView::new(GenreFilter::Genre(2), SortKey::Updated, crate::format::DEFAULT_DATE_FORMAT);
        view.refresh(&catalog, now());
        let last = view.cards()[3].id.clone();
        assert_eq!(view.neighbour_of(&last, true), Some(0));
        assert_eq!(view.neighbour_of(&view.cards()[0].id.clone(), false), Some(3));
        assert_eq!(view.neighbour_of(&PodcastId::new("nope"), true), None);
    }

    fn arb_podcasts() -> impl Strategy<Value = Vec<Podcast>> {
        prop::collection::vec(
            (
                "[a-zA-Z ]{0,12}",
                0u32..20,
                prop::collection::vec(1u32..6, 0..4),
                0i64..2_000_000_000,
            ),
            0..24,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (title, seasons, genres, secs))| {
                    let updated = DateTime::<Utc>::from_timestamp(secs, 0)
                        .unwrap_or_default()
                        .to_rfc3339();
                    podcast(&i.to_string(), &title, seasons, &genres, &updated)
                })
                .collect()
        })
    }

    fn arb_sort() -> impl Strategy<Value = SortKey> {
        prop::sample::select(vec![SortKey::Updated, SortKey::Title, SortKey::Seasons])
    }

    proptest! {
        #[test]
        fn prop_filter_keeps_only_matching(items in arb_podcasts(), genre in 1u32..6, sort in arb_sort()) {
            let visible = compute_visible_set(&items, GenreFilter::Genre(genre), sort);
            prop_assert!(visible.iter().all(|p| p.genres.contains(&genre)));
            let expected = items.iter().filter(|p| p.genres.contains(&genre)).count();
            prop_assert_eq!(visible.len(), expected);
        }

        #[test]
        fn prop_all_is_permutation(items in arb_podcasts(), sort in arb_sort()) {
            let visible = compute_visible_set(&items, GenreFilter::All, sort);
            let mut got: Vec<String> = ids(&visible);
            let mut want: Vec<String> = items.iter().map(|p| p.id.to_string()).collect();
            got.sort();
            want.sort();
            prop_assert_eq!(got, want);
        }

        #[test]
        fn prop_deterministic(items in arb_podcasts(), sort in arb_sort()) {
            let a = ids(&compute_visible_set(&items, GenreFilter::All, sort));
            let b = ids(&compute_visible_set(&items, GenreFilter::All, sort));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_seasons_descending(items in arb_podcasts()) {
            let visible = compute_visible_set(&items, GenreFilter::All, SortKey::Seasons);
            prop_assert!(visible.windows(2).all(|w| w[0].seasons >= w[1].seasons));
        }

        #[test]
        fn prop_updated_descending(items in arb_podcasts()) {
            let visible = compute_visible_set(&items, GenreFilter::All, SortKey::Updated);
            prop_assert!(visible.windows(2).all(|w| w[0].updated_at() >= w[1].updated_at()));
        }
    }
}
