use serde::{Deserialize, Serialize};

/// TMDB identifier of a movie
pub type MovieId = u64;

/// A recommendable movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
}

impl Movie {
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

/// Ordered list of movies
///
/// A movie's position is its row and column in the similarity matrix, so the
/// order is fixed once the catalog is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Position of the first movie whose title matches exactly
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|movie| movie.title == title)
    }
}

impl FromIterator<Movie> for Catalog {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
