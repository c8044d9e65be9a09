//! Loading of the prebuilt catalog and similarity artifacts.
//!
//! Both files are read once at startup. Any problem here is fatal: the
//! service cannot answer a single request without them.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::models::{Catalog, Movie, MovieId, SimilarityMatrix};
use crate::services::recommender::Recommender;

/// Accepted layouts of the catalog file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    /// `[{"movie_id": 19995, "title": "Avatar"}, ...]`
    Records(Vec<Movie>),
    /// `{"movie_id": [19995, ...], "title": ["Avatar", ...]}`
    Columns {
        movie_id: Vec<MovieId>,
        title: Vec<String>,
    },
}

impl CatalogFile {
    fn into_catalog(self) -> anyhow::Result<Catalog> {
        let movies = match self {
            CatalogFile::Records(movies) => movies,
            CatalogFile::Columns { movie_id, title } => {
                if movie_id.len() != title.len() {
                    bail!(
                        "catalog columns differ in length: {} movie ids, {} titles",
                        movie_id.len(),
                        title.len()
                    );
                }
                movie_id
                    .into_iter()
                    .zip(title)
                    .map(|(movie_id, title)| Movie { movie_id, title })
                    .collect()
            }
        };

        let mut seen = HashSet::with_capacity(movies.len());
        for movie in &movies {
            if !seen.insert(movie.movie_id) {
                bail!("duplicate movie_id {} in catalog", movie.movie_id);
            }
        }

        Ok(Catalog::new(movies))
    }
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Reads the catalog from a JSON file
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let file: CatalogFile = serde_json::from_reader(open(path)?)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    let catalog = file
        .into_catalog()
        .with_context(|| format!("Invalid catalog {}", path.display()))?;

    tracing::info!(path = %path.display(), movies = catalog.len(), "Loaded movie catalog");
    Ok(catalog)
}

/// Reads the similarity matrix from a JSON array of rows
pub fn load_similarity(path: &Path) -> anyhow::Result<SimilarityMatrix> {
    let rows: Vec<Vec<f64>> = serde_json::from_reader(open(path)?)
        .with_context(|| format!("Failed to parse similarity matrix {}", path.display()))?;
    let matrix = SimilarityMatrix::from_rows(rows)
        .with_context(|| format!("Invalid similarity matrix {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        dimension = matrix.dimension(),
        "Loaded similarity matrix"
    );
    Ok(matrix)
}

/// Loads both artifacts and checks they describe the same movies
pub fn load_recommender(catalog_path: &Path, similarity_path: &Path) -> anyhow::Result<Recommender> {
    let catalog = load_catalog(catalog_path)?;
    let similarity = load_similarity(similarity_path)?;

    Recommender::new(Arc::new(catalog), Arc::new(similarity)).with_context(|| {
        format!(
            "{} does not match {}",
            similarity_path.display(),
            catalog_path.display()
        )
    })
}
