use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;

use crate::models::{Catalog, Movie, Recommendation, SimilarityMatrix};

/// Malformed inputs handed to the engine
///
/// These indicate an integration defect upstream rather than bad user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("query index {index} is out of range for a catalog of {len} movies")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("catalog has {catalog_len} movies but the similarity matrix is {matrix_dim}x{matrix_dim}")]
    DimensionMismatch { catalog_len: usize, matrix_dim: usize },
    #[error("similarity matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("similarity matrix entry ({row}, {col}) is not a finite number")]
    NonFiniteScore { row: usize, col: usize },
    #[error("number of recommendations must be at least 1")]
    ZeroCount,
}

/// Error types for the recommendation engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("Movie not found in the dataset: {title}")]
    NotFound { title: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// Position of the first movie titled exactly `title`
pub fn find_index(catalog: &Catalog, title: &str) -> Result<usize, RecommendError> {
    catalog
        .position_of(title)
        .ok_or_else(|| RecommendError::NotFound {
            title: title.to_string(),
        })
}

/// Ranks every other movie by its similarity to the one at `query_index`
///
/// Returns at most `k` results in descending score order. Equal scores keep
/// catalog order, and the query movie is never part of the result.
pub fn recommend(
    catalog: &Catalog,
    matrix: &SimilarityMatrix,
    query_index: usize,
    k: usize,
) -> Result<Vec<Recommendation>, RecommendError> {
    if k == 0 {
        return Err(InvalidArgument::ZeroCount.into());
    }
    check_dimensions(catalog, matrix)?;
    if catalog.is_empty() {
        return Ok(Vec::new());
    }

    let row = matrix
        .row(query_index)
        .ok_or(InvalidArgument::IndexOutOfRange {
            index: query_index,
            len: catalog.len(),
        })?;

    let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
    // sort_by is stable: ties stay in ascending index order
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let recommendations = ranked
        .into_iter()
        .filter(|(index, _)| *index != query_index)
        .take(k)
        .filter_map(|(index, score)| {
            catalog.get(index).map(|movie| Recommendation {
                index,
                movie: movie.clone(),
                score,
            })
        })
        .collect();

    Ok(recommendations)
}

fn check_dimensions(catalog: &Catalog, matrix: &SimilarityMatrix) -> Result<(), InvalidArgument> {
    if catalog.len() != matrix.dimension() {
        return Err(InvalidArgument::DimensionMismatch {
            catalog_len: catalog.len(),
            matrix_dim: matrix.dimension(),
        });
    }
    Ok(())
}

/// Shared handle over a loaded catalog and its similarity matrix
///
/// Cloning is cheap; every clone reads the same data.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityMatrix>,
}

impl Recommender {
    /// Creates a recommender, rejecting a matrix that does not match the catalog
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityMatrix>,
    ) -> Result<Self, RecommendError> {
        check_dimensions(&catalog, &similarity)?;
        Ok(Self {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn find_index(&self, title: &str) -> Result<usize, RecommendError> {
        find_index(&self.catalog, title)
    }

    pub fn recommend(
        &self,
        query_index: usize,
        k: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        recommend(&self.catalog, &self.similarity, query_index, k)
    }

    /// Resolves `title` and returns the matched movie with its recommendations
    pub fn recommend_for_title(
        &self,
        title: &str,
        k: usize,
    ) -> Result<(Movie, Vec<Recommendation>), RecommendError> {
        let index = self.find_index(title)?;
        let recommendations = self.recommend(index, k)?;
        let query = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(InvalidArgument::IndexOutOfRange {
                index,
                len: self.catalog.len(),
            })?;
        Ok((query, recommendations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(titles: &[&str]) -> Catalog {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| Movie::new(i as u64 + 1, *title))
            .collect()
    }

    fn matrix(rows: &[&[f64]]) -> SimilarityMatrix {
        SimilarityMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    /// Deterministic pseudo-random scores with plenty of ties
    fn synthetic(n: usize) -> (Catalog, SimilarityMatrix) {
        let titles: Vec<String> = (0..n).map(|i| format!("Movie {}", i)).collect();
        let catalog: Catalog = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Movie::new(i as u64 + 100, t.as_str()))
            .collect();
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            1.0
                        } else {
                            ((i * 7 + j * 13) % 5) as f64 / 10.0
                        }
                    })
                    .collect::<Vec<f64>>()
            })
            .collect();
        (catalog, SimilarityMatrix::from_rows(rows).unwrap())
    }

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.movie.title.as_str()).collect()
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = catalog(&["A", "B", "C", "D"]);
        let matrix = matrix(&[
            &[1.0, 0.9, 0.9, 0.1],
            &[0.9, 1.0, 0.5, 0.2],
            &[0.9, 0.5, 1.0, 0.3],
            &[0.1, 0.2, 0.3, 1.0],
        ]);

        let recs = recommend(&catalog, &matrix, 0, 2).unwrap();

        assert_eq!(titles(&recs), vec!["B", "C"]);
        assert_eq!(recs[0].score, 0.9);
        assert_eq!(recs[1].score, 0.9);
        assert_eq!(recs[0].movie.movie_id, 2);
        assert_eq!(recs[1].index, 2);
    }

    #[test]
    fn test_k_larger_than_catalog_returns_all_others() {
        let catalog = catalog(&["A", "B", "C"]);
        let matrix = matrix(&[&[1.0, 0.2, 0.7], &[0.2, 1.0, 0.4], &[0.7, 0.4, 1.0]]);

        let recs = recommend(&catalog, &matrix, 1, 10).unwrap();

        assert_eq!(titles(&recs), vec!["C", "A"]);
    }

    #[test]
    fn test_query_excluded_even_when_not_highest() {
        let catalog = catalog(&["A", "B", "C"]);
        let matrix = matrix(&[&[0.1, 0.5, 0.3], &[0.5, 1.0, 0.4], &[0.3, 0.4, 1.0]]);

        let recs = recommend(&catalog, &matrix, 0, 2).unwrap();

        assert_eq!(titles(&recs), vec!["B", "C"]);
    }

    #[test]
    fn test_query_excluded_when_tied_with_others() {
        let catalog = catalog(&["A", "B", "C"]);
        let matrix = matrix(&[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]]);

        let recs = recommend(&catalog, &matrix, 1, 5).unwrap();

        assert_eq!(titles(&recs), vec!["A", "C"]);
    }

    #[test]
    fn test_negative_scores_rank_last() {
        let catalog = catalog(&["A", "B", "C", "D"]);
        let matrix = matrix(&[
            &[1.0, -0.5, 0.0, 0.25],
            &[-0.5, 1.0, 0.0, 0.0],
            &[0.0, 0.0, 1.0, 0.0],
            &[0.25, 0.0, 0.0, 1.0],
        ]);

        let recs = recommend(&catalog, &matrix, 0, 3).unwrap();

        assert_eq!(titles(&recs), vec!["D", "C", "B"]);
    }

    #[test]
    fn test_single_movie_catalog_is_empty() {
        let catalog = catalog(&["A"]);
        let matrix = matrix(&[&[1.0]]);

        assert!(recommend(&catalog, &matrix, 0, 3).unwrap().is_empty());
    }

    #[test]
    fn test_empty_catalog_is_empty() {
        let catalog = Catalog::default();
        let matrix = SimilarityMatrix::default();

        assert!(recommend(&catalog, &matrix, 0, 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_count_rejected() {
        let catalog = catalog(&["A", "B"]);
        let matrix = matrix(&[&[1.0, 0.5], &[0.5, 1.0]]);

        let err = recommend(&catalog, &matrix, 0, 0).unwrap_err();
        assert_eq!(err, RecommendError::InvalidArgument(InvalidArgument::ZeroCount));
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let catalog = catalog(&["A", "B"]);
        let matrix = matrix(&[&[1.0, 0.5], &[0.5, 1.0]]);

        let err = recommend(&catalog, &matrix, 2, 1).unwrap_err();
        assert_eq!(
            err,
            RecommendError::InvalidArgument(InvalidArgument::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let catalog = catalog(&["A", "B", "C"]);
        let matrix = matrix(&[&[1.0, 0.5], &[0.5, 1.0]]);

        let err = recommend(&catalog, &matrix, 0, 1).unwrap_err();
        assert_eq!(
            err,
            RecommendError::InvalidArgument(InvalidArgument::DimensionMismatch {
                catalog_len: 3,
                matrix_dim: 2
            })
        );
    }

    #[test]
    fn test_find_index_not_found() {
        let catalog = catalog(&["Avatar", "Titanic"]);

        let err = find_index(&catalog, "Nonexistent").unwrap_err();
        assert_eq!(
            err,
            RecommendError::NotFound {
                title: "Nonexistent".to_string()
            }
        );
        assert_eq!(err.to_string(), "Movie not found in the dataset: Nonexistent");
    }

    #[test]
    fn test_find_index_exact_match_only() {
        let catalog = catalog(&["Avatar", "Titanic"]);

        assert_eq!(find_index(&catalog, "Titanic"), Ok(1));
        assert!(find_index(&catalog, "titanic").is_err());
        assert!(find_index(&catalog, "Titan").is_err());
    }

    #[test]
    fn test_find_index_duplicate_titles_resolve_to_first() {
        let catalog = catalog(&["Hamlet", "Heat", "Hamlet"]);
        assert_eq!(find_index(&catalog, "Hamlet"), Ok(0));
    }

    #[test]
    fn test_properties_hold_for_every_query() {
        let (catalog, matrix) = synthetic(12);
        let n = catalog.len();

        for query in 0..n {
            for k in 1..=n + 2 {
                let recs = recommend(&catalog, &matrix, query, k).unwrap();

                assert_eq!(recs.len(), k.min(n - 1));
                assert!(recs.iter().all(|r| r.index != query));
                for pair in recs.windows(2) {
                    assert!(pair[0].score >= pair[1].score);
                    if pair[0].score == pair[1].score {
                        assert!(pair[0].index < pair[1].index);
                    }
                }
                for rec in &recs {
                    assert_eq!(matrix.score(query, rec.index), Some(rec.score));
                    assert_eq!(catalog.get(rec.index), Some(&rec.movie));
                }
            }
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let (catalog, matrix) = synthetic(9);

        let first = recommend(&catalog, &matrix, 4, 5).unwrap();
        for _ in 0..10 {
            assert_eq!(recommend(&catalog, &matrix, 4, 5).unwrap(), first);
        }
    }

    #[test]
    fn test_recommender_rejects_mismatched_inputs() {
        let catalog = Arc::new(catalog(&["A"]));
        let similarity = Arc::new(matrix(&[&[1.0, 0.5], &[0.5, 1.0]]));

        let err = Recommender::new(catalog, similarity).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::InvalidArgument(InvalidArgument::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_recommend_for_title() {
        let recommender = Recommender::new(
            Arc::new(catalog(&["A", "B", "C", "D"])),
            Arc::new(matrix(&[
                &[1.0, 0.9, 0.9, 0.1],
                &[0.9, 1.0, 0.5, 0.2],
                &[0.9, 0.5, 1.0, 0.3],
                &[0.1, 0.2, 0.3, 1.0],
            ])),
        )
        .unwrap();

        let (query, recs) = recommender.recommend_for_title("D", 2).unwrap();
        assert_eq!(query.title, "D");
        assert_eq!(titles(&recs), vec!["C", "B"]);

        let err = recommender.recommend_for_title("E", 2).unwrap_err();
        assert!(matches!(err, RecommendError::NotFound { .. }));
    }

    #[test]
    fn test_recommender_shared_across_threads() {
        let (catalog, matrix) = synthetic(20);
        let recommender = Recommender::new(Arc::new(catalog), Arc::new(matrix)).unwrap();
        let expected: Vec<Vec<Recommendation>> = (0..20)
            .map(|q| recommender.recommend(q, 5).unwrap())
            .collect();

        std::thread::scope(|scope| {
            for (query, want) in expected.iter().enumerate() {
                let recommender = recommender.clone();
                scope.spawn(move || {
                    assert_eq!(&recommender.recommend(query, 5).unwrap(), want);
                });
            }
        });
    }
}
