pub mod metadata;
pub mod providers;
pub mod recommender;

pub use recommender::{RecommendError, Recommender};
