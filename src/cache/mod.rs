//! Read-through result cache for the query services.
//!
//! Every cacheable operation carries a [`QueryCachePolicy`] (enabled flag and
//! TTL). Results are stored in an LRU keyed by [`QueryKey`], which captures the
//! operation and its bound parameters. Expiry is lazy and driven by the same
//! clock the query uses, so one invocation sees a single notion of "now".
//! Listings also expire at the next scheduled publication, so a post never
//! stays hidden from a cached listing after it becomes visible.
//!
//! ```toml
//! [cache]
//! enabled = true
//! max_entries = 256
//! listing_ttl_seconds = 600
//! search_ttl_seconds = 3600
//! ```

mod config;
mod keys;
mod lock;
mod policy;
mod read_through;
mod store;

pub use config::CacheConfig;
pub use keys::QueryKey;
pub use policy::{CachePolicies, QueryCachePolicy};
pub use read_through::{
    METRIC_CACHE_EVICT, METRIC_CACHE_HIT, METRIC_CACHE_MISS, read_through, read_through_until,
};
pub use store::{QueryCache, ResultStore};
