use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::services::providers::tmdb::TmdbSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file with the movie catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// JSON file with the precomputed similarity matrix
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// TMDB API key; metadata enrichment is disabled without one
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-request timeout for metadata lookups
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// How long fetched metadata stays in Redis
    #[serde(default = "default_metadata_cache_ttl_secs")]
    pub metadata_cache_ttl_secs: u64,

    /// Redis connection URL; metadata is not cached without one
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Recommendations returned when a request does not ask for a count
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Largest count a request may ask for
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/movie_list.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("data/similarity.json")
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_metadata_timeout_secs() -> u64 {
    10
}

fn default_metadata_cache_ttl_secs() -> u64 {
    86400 // 1 day
}

fn default_recommendations() -> usize {
    6
}

fn default_max_recommendations() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_recommendations == 0
            || self.default_recommendations > self.max_recommendations
        {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS must be between 1 and MAX_RECOMMENDATIONS ({}), got {}",
                self.max_recommendations,
                self.default_recommendations
            );
        }
        Ok(())
    }

    /// TMDB settings, or `None` when no API key is configured
    pub fn tmdb_settings(&self) -> Option<TmdbSettings> {
        let api_key = self.tmdb_api_key.clone().filter(|key| !key.trim().is_empty())?;

        Some(TmdbSettings {
            api_key,
            api_url: self.tmdb_api_url.clone(),
            image_url: self.tmdb_image_url.clone(),
            language: self.tmdb_language.clone(),
            timeout: Duration::from_secs(self.metadata_timeout_secs),
            cache_ttl: self.metadata_cache_ttl_secs,
        })
    }
}
