use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Poster shown when TMDB has no image for a movie
pub const NO_POSTER_URL: &str = "https://via.placeholder.com/500x750.png?text=No+Poster";

/// Poster shown when the metadata lookup failed
pub const API_ERROR_POSTER_URL: &str = "https://via.placeholder.com/500x750.png?text=API+Error";

/// Display metadata for a recommended movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub overview: String,
    /// Average vote out of 10, absent when unknown
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub poster_url: String,
    /// When the details were fetched from the source; `None` for placeholders
    pub fetched_at: Option<DateTime<Utc>>,
}

impl MovieDetails {
    /// Stand-in used whenever the lookup fails
    pub fn placeholder() -> Self {
        Self {
            title: "Error".to_string(),
            overview: "Could not fetch details".to_string(),
            rating: None,
            genres: Vec::new(),
            poster_url: API_ERROR_POSTER_URL.to_string(),
            fetched_at: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.fetched_at.is_none()
    }
}
