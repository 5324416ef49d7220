use std::time::Duration;

/// Whether an operation consults the result cache, and for how long results live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCachePolicy {
    pub enabled: bool,
    pub ttl: Duration,
}

impl QueryCachePolicy {
    pub const fn cached(ttl: Duration) -> Self {
        Self { enabled: true, ttl }
    }

    pub const fn uncached() -> Self {
        Self {
            enabled: false,
            ttl: Duration::ZERO,
        }
    }
}

/// One policy per cacheable post operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicies {
    pub post_by_slug: QueryCachePolicy,
    pub latest_verified: QueryCachePolicy,
    pub recent_excluding: QueryCachePolicy,
    pub recent: QueryCachePolicy,
    pub by_category: QueryCachePolicy,
    pub by_month: QueryCachePolicy,
    pub search: QueryCachePolicy,
    pub by_tag: QueryCachePolicy,
}

impl CachePolicies {
    /// Same policy for every operation.
    pub const fn uniform(policy: QueryCachePolicy) -> Self {
        Self {
            post_by_slug: policy,
            latest_verified: policy,
            recent_excluding: policy,
            recent: policy,
            by_category: policy,
            by_month: policy,
            search: policy,
            by_tag: policy,
        }
    }
}
