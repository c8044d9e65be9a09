use std::sync::Arc;

use crate::services::{providers::MetadataProvider, Recommender};

/// Bounds on how many recommendations a request may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    pub default_count: usize,
    pub max_count: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            default_count: 6,
            max_count: 20,
        }
    }
}

/// Shared application state
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    /// `None` when metadata enrichment is disabled
    pub metadata: Option<Arc<dyn MetadataProvider>>,
    pub limits: RecommendationLimits,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender,
            metadata: None,
            limits: RecommendationLimits::default(),
        }
    }

    pub fn with_metadata(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }

    pub fn with_limits(mut self, limits: RecommendationLimits) -> Self {
        self.limits = limits;
        self
    }
}
