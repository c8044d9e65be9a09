pub mod artifacts;
pub mod redis;

pub use self::artifacts::{load_catalog, load_recommender, load_similarity};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
