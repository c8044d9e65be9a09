/// Read-through caching around a fallible async lookup.
///
/// Looks the key up in the cache first. On a miss, awaits `$block`, queues a
/// successful value for a background write and returns it. Errors from
/// `$block` are propagated and never cached. The cache is optional, and a
/// cache read fault is logged and treated as a miss.
///
/// # Arguments
/// * `$cache`: an `Option<&Cache>`.
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live in seconds for a newly written value.
/// * `$block`: the future to await on a miss.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache.as_ref(), CacheKey::MovieDetails(id), 3600, self.call_api(id))
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let key = $key;

        let hit = match cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                    None
                }
            },
            None => None,
        };

        match hit {
            Some(cached) => Ok(cached),
            None => {
                let value = $block.await?;
                if let Some(cache) = cache {
                    cache.set_in_background(&key, &value, $ttl);
                }
                Ok(value)
            }
        }
    }};
}
