mod catalog;
mod details;
mod similarity;

pub use catalog::{Catalog, Movie, MovieId};
pub use details::{MovieDetails, API_ERROR_POSTER_URL, NO_POSTER_URL};
pub use similarity::SimilarityMatrix;

use serde::Serialize;

/// A single ranked result of a similarity lookup
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    /// Position of the movie in the catalog
    pub index: usize,
    pub movie: Movie,
    /// Similarity between the query movie and this one
    pub score: f64,
}
