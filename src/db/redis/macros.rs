/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value on a hit. On a miss, or when Redis cannot be
/// read, awaits `$block`, queues the result for a background write with
/// `$ttl` seconds, and returns it. Errors from `$block` propagate with `?`.
///
/// # Example
/// ```rust,ignore
/// let places: Vec<PlaceWithReviews> = cached!(cache, key, 300, async move {
///     inner.places_with_reviews(city, categories, limit).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, using store");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
