//! Cache key definitions.

/// Identifies a cached result by operation and bound parameters.
///
/// The visibility timestamp is not part of the key, so a cached listing is
/// reused until its TTL elapses even though "now" moves on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    PostBySlug(String),
    LatestVerified { limit: u32 },
    RecentExcluding { slug: String, limit: u32 },
    Recent { limit: u32, offset: u32 },
    ByCategory(String),
    ByMonth { year: i32, month: u8 },
    Search(String),
    ByTag(String),
}

impl QueryKey {
    /// Stable operation label used for logs and metrics.
    pub fn operation(&self) -> &'static str {
        match self {
            QueryKey::PostBySlug(_) => "post_by_slug",
            QueryKey::LatestVerified { .. } => "latest_verified",
            QueryKey::RecentExcluding { .. } => "recent_excluding",
            QueryKey::Recent { .. } => "recent",
            QueryKey::ByCategory(_) => "by_category",
            QueryKey::ByMonth { .. } => "by_month",
            QueryKey::Search(_) => "search",
            QueryKey::ByTag(_) => "by_tag",
        }
    }
}
