use std::future::Future;

use metrics::counter;
use time::OffsetDateTime;
use tracing::{debug, trace};

use super::keys::QueryKey;
use super::policy::QueryCachePolicy;
use super::store::ResultStore;

pub const METRIC_CACHE_HIT: &str = "quire_query_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "quire_query_cache_miss_total";
pub const METRIC_CACHE_EVICT: &str = "quire_query_cache_evict_total";

/// Serves `key` from `store` when the policy allows it, otherwise runs `fetch`
/// and stores the result until `now + policy.ttl`.
///
/// Errors from `fetch` are returned as-is and never cached. Two concurrent
/// misses for the same key both run `fetch`; the later store wins.
pub async fn read_through<T, E, F, Fut>(
    store: &ResultStore<T>,
    key: QueryKey,
    policy: QueryCachePolicy,
    now: OffsetDateTime,
    fetch: F,
) -> Result<T, E>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    read_through_until(store, key, policy, now, move || async move {
        fetch().await.map(|value| (value, None))
    })
    .await
}

/// Like [`read_through`], but `fetch` also reports the instant after which its
/// result may be wrong (for example the next scheduled publication). The entry
/// expires at that instant when it comes before `now + policy.ttl`.
pub async fn read_through_until<T, E, F, Fut>(
    store: &ResultStore<T>,
    key: QueryKey,
    policy: QueryCachePolicy,
    now: OffsetDateTime,
    fetch: F,
) -> Result<T, E>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(T, Option<OffsetDateTime>), E>>,
{
    let operation = key.operation();

    if !policy.enabled {
        trace!(operation, "result cache bypassed");
        return fetch().await.map(|(value, _)| value);
    }

    if let Some(value) = store.get(&key, now) {
        counter!(METRIC_CACHE_HIT, "operation" => operation).increment(1);
        trace!(operation, ?key, "result cache hit");
        return Ok(value);
    }

    counter!(METRIC_CACHE_MISS, "operation" => operation).increment(1);
    trace!(operation, ?key, "result cache miss");

    let (value, valid_until) = fetch().await?;

    let expires_at = time::Duration::try_from(policy.ttl)
        .ok()
        .and_then(|ttl| now.checked_add(ttl))
        .map(|expires_at| match valid_until {
            Some(limit) => expires_at.min(limit),
            None => expires_at,
        });
    match expires_at {
        Some(expires_at) if expires_at > now => {
            if let Some(evicted) = store.put(key, value.clone(), expires_at) {
                counter!(METRIC_CACHE_EVICT, "operation" => evicted.operation()).increment(1);
                debug!(operation, evicted = ?evicted, "result cache evicted entry");
            }
        }
        _ => debug!(operation, ttl = ?policy.ttl, "result not cached: expiry out of range"),
    }

    Ok(value)
}
