use std::sync::Arc;

use crate::{
    models::{MovieDetails, MovieId},
    services::providers::MetadataProvider,
};

/// Fetches details for one movie, substituting the placeholder on any failure
///
/// A missing poster must never keep a recommendation list from rendering, so
/// this never fails.
pub async fn fetch_details_or_placeholder(
    provider: &dyn MetadataProvider,
    movie_id: MovieId,
) -> MovieDetails {
    match provider.fetch_details(movie_id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(
                error = %e,
                movie_id = movie_id,
                provider = provider.name(),
                "Metadata fetch failed, using placeholder"
            );
            MovieDetails::placeholder()
        }
    }
}

/// Fetches details for several movies in parallel
///
/// The result has one entry per input id, in input order.
pub async fn fetch_details_batch(
    provider: Arc<dyn MetadataProvider>,
    movie_ids: Vec<MovieId>,
) -> Vec<MovieDetails> {
    let mut tasks = Vec::with_capacity(movie_ids.len());

    for movie_id in movie_ids {
        let provider = Arc::clone(&provider);
        let task = tokio::spawn(async move {
            fetch_details_or_placeholder(provider.as_ref(), movie_id).await
        });
        tasks.push(task);
    }

    let mut results = Vec::with_capacity(tasks.len());
    let mut failures = 0;

    for task in tasks {
        let details = match task.await {
            Ok(details) => details,
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                MovieDetails::placeholder()
            }
        };
        if details.is_placeholder() {
            failures += 1;
        }
        results.push(details);
    }

    if failures > 0 {
        tracing::warn!(
            success_count = results.len() - failures,
            error_count = failures,
            "Partial metadata fetch failure"
        );
    }

    results
}
