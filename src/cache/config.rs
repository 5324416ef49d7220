//! Cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use super::policy::{CachePolicies, QueryCachePolicy};

const DEFAULT_MAX_ENTRIES: usize = 256;
const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(600);
const DEFAULT_SEARCH_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Master switch; when off every query goes to the store.
    pub enabled: bool,
    /// Maximum entries per result store before LRU eviction.
    pub max_entries: usize,
    /// TTL for slug lookups and listings.
    pub listing_ttl: Duration,
    /// TTL for full-text searches.
    pub search_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
            listing_ttl: DEFAULT_LISTING_TTL,
            search_ttl: DEFAULT_SEARCH_TTL,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            max_entries: settings.max_entries.get(),
            listing_ttl: settings.listing_ttl,
            search_ttl: settings.search_ttl,
        }
    }
}

impl CacheConfig {
    /// Returns the entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn max_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn policies(&self) -> CachePolicies {
        if !self.enabled {
            return CachePolicies::uniform(QueryCachePolicy::uncached());
        }

        CachePolicies {
            search: QueryCachePolicy::cached(self.search_ttl),
            ..CachePolicies::uniform(QueryCachePolicy::cached(self.listing_ttl))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_entries, 256);
        assert_eq!(config.listing_ttl, Duration::from_secs(600));
        assert_eq!(config.search_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn policies_follow_operation_ttls() {
        let policies = CacheConfig::default().policies();
        assert_eq!(policies.post_by_slug.ttl, Duration::from_secs(600));
        assert_eq!(policies.by_tag.ttl, Duration::from_secs(600));
        assert_eq!(policies.search.ttl, Duration::from_secs(3600));
        assert!(policies.recent.enabled);
    }

    #[test]
    fn disabled_config_disables_every_policy() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        let policies = config.policies();
        assert!(!policies.post_by_slug.enabled);
        assert!(!policies.search.enabled);
        assert!(!policies.by_month.enabled);
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            max_entries: 0,
            ..Default::default()
        };
        assert_eq!(config.max_entries_non_zero().get(), 1);
    }
}
