use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Label substituted for genre ids that do not resolve.
pub const UNKNOWN_GENRE: &str = "Unknown";

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Genre identity as it appears in the data set.
pub type GenreId = u32;

/// Opaque podcast identity. The data set uses both strings and numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId")]
pub struct PodcastId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for PodcastId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        }
    }
}

impl PodcastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub seasons: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub genres: Vec<GenreId>,
    /// ISO-8601 instant, kept raw so one bad record cannot fail the load.
    pub updated: String,
}

impl Podcast {
    /// Parsed last-updated instant, `None` when the raw value is malformed.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        crate::format::parse_timestamp(&self.updated)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub title: String,
    #[serde(default)]
    pub episodes: u32,
}

/// The ordered seasons of one podcast, keyed by podcast id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonGroup {
    pub id: PodcastId,
    #[serde(rename = "seasonDetails", default)]
    pub season_details: Vec<Season>,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Immutable snapshot of the three collections, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub podcasts: Vec<Podcast>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub seasons: Vec<SeasonGroup>,
}

impl Catalog {
    /// The reference data set shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            podcasts = catalog.podcasts.len(),
            genres = catalog.genres.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Podcast by identity. First match wins.
    pub fn podcast(&self, id: &PodcastId) -> Option<&Podcast> {
        self.podcasts.iter().find(|p| &p.id == id)
    }

    pub fn genre_title(&self, id: GenreId) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.title.as_str())
    }

    /// Display names for `ids`, position for position.
    pub fn genre_names(&self, ids: &[GenreId]) -> Vec<String> {
        ids.iter()
            .map(|&id| self.genre_title(id).unwrap_or(UNKNOWN_GENRE).to_string())
            .collect()
    }

    /// Seasons of a podcast, `None` when the data set has no group for it.
    pub fn seasons_for(&self, id: &PodcastId) -> Option<&[Season]> {
        self.seasons
            .iter()
            .find(|s| &s.id == id)
            .map(|s| s.season_details.as_slice())
    }
}
