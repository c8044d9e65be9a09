/// TMDB (The Movie Database) metadata provider
///
/// API Flow:
/// 1. Details: /movie/{movie_id}?api_key=..&language=.. → title, overview,
///    vote average, genres and a poster path
/// 2. Poster: the poster path is joined onto the image base URL
///
/// Successful lookups are cached in Redis when a cache is configured.
use std::time::Duration;

use chrono::Utc;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetails, MovieId, NO_POSTER_URL},
    services::providers::MetadataProvider,
};

const DEFAULT_TITLE: &str = "Unknown Title";
const DEFAULT_OVERVIEW: &str = "No overview available.";

/// Raw API response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

impl TmdbMovie {
    fn into_details(self, image_url: &str) -> MovieDetails {
        let poster_url = match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!(
                "{}/{}",
                image_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            _ => NO_POSTER_URL.to_string(),
        };

        MovieDetails {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            overview: self.overview.unwrap_or_else(|| DEFAULT_OVERVIEW.to_string()),
            rating: self.vote_average,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            poster_url,
            fetched_at: Some(Utc::now()),
        }
    }
}

/// Connection settings for the TMDB provider
#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub api_key: String,
    pub api_url: String,
    pub image_url: String,
    pub language: String,
    pub timeout: Duration,
    pub cache_ttl: u64,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    settings: TmdbSettings,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(settings: TmdbSettings, cache: Option<Cache>) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            http_client,
            settings,
            cache,
        })
    }

    /// The API key travels in the query string, so reqwest errors are
    /// stripped of their URL before they can reach a log line.
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn call_api(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        let url = format!(
            "{}/movie/{}",
            self.settings.api_url.trim_end_matches('/'),
            movie_id
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.settings.api_key.as_str()),
                ("language", self.settings.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;
        let movie: TmdbMovie = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(response = %response_text, "Raw TMDB API response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        let details = movie.into_details(&self.settings.image_url);

        tracing::info!(title = %details.title, "Movie details fetched");

        Ok(details)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        cached!(
            self.cache.as_ref(),
            CacheKey::MovieDetails(movie_id),
            self.settings.cache_ttl,
            self.call_api(movie_id)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
