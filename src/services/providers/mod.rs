/// Movie metadata provider abstraction
///
/// Providers turn a catalog movie id into display metadata (poster, overview,
/// rating, genres). Failures are reported as errors here; substituting a
/// placeholder is the caller's job, see `services::metadata`.
use crate::{
    error::AppResult,
    models::{MovieDetails, MovieId},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch display metadata for one movie
    ///
    /// Makes a single attempt; there is no retry.
    async fn fetch_details(&self, movie_id: MovieId) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
