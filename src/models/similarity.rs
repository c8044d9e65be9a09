use crate::services::recommender::InvalidArgument;

/// Dense N×N table of precomputed similarity scores, stored row-major
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Builds a matrix from its rows
    ///
    /// Every row must have as many entries as there are rows, and every score
    /// must be finite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, InvalidArgument> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(InvalidArgument::NotSquare {
                    row: row_index,
                    len: row.len(),
                    expected: dimension,
                });
            }
            if let Some(col) = row.iter().position(|score| !score.is_finite()) {
                return Err(InvalidArgument::NonFiniteScore { row: row_index, col });
            }
            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }

    pub fn score(&self, row: usize, col: usize) -> Option<f64> {
        self.row(row).and_then(|r| r.get(col).copied())
    }
}
