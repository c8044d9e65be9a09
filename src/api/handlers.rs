use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Movie, MovieDetails, MovieId, Recommendation},
    services::metadata,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub count: Option<usize>,
    pub details: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
    pub details: Option<MovieDetails>,
}

impl RecommendedMovie {
    fn new(recommendation: Recommendation, details: Option<MovieDetails>) -> Self {
        Self {
            movie_id: recommendation.movie.movie_id,
            title: recommendation.movie.title,
            score: recommendation.score,
            details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: Movie,
    pub recommendations: Vec<RecommendedMovie>,
    pub generated_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists the catalog in its canonical order
pub async fn list_movies(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(state.recommender.catalog().movies().to_vec())
}

/// Top-K similar movies for an exact title
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(params) = query.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let count = params.count.unwrap_or(state.limits.default_count);
    if count == 0 || count > state.limits.max_count {
        return Err(AppError::InvalidInput(format!(
            "count must be between 1 and {}",
            state.limits.max_count
        )));
    }
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title cannot be empty".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        count = count,
        "Processing recommendation request"
    );

    let (query, recommendations) = state
        .recommender
        .recommend_for_title(&params.title, count)?;

    let details: Vec<Option<MovieDetails>> = match &state.metadata {
        Some(provider) if params.details.unwrap_or(true) => {
            let movie_ids = recommendations.iter().map(|r| r.movie.movie_id).collect();
            metadata::fetch_details_batch(Arc::clone(provider), movie_ids)
                .await
                .into_iter()
                .map(Some)
                .collect()
        }
        _ => vec![None; recommendations.len()],
    };

    let recommendations: Vec<RecommendedMovie> = recommendations
        .into_iter()
        .zip(details)
        .map(|(recommendation, details)| RecommendedMovie::new(recommendation, details))
        .collect();

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse {
        query,
        recommendations,
        generated_at: Utc::now(),
    }))
}
