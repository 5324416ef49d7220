//! Public blog queries: slug lookup, listings, archives and search.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::application::clock::Clock;
use crate::application::repos::{PostQueryFilter, PostsRepo, RepoError, VisiblePostsQuery};
use crate::cache::{
    CachePolicies, QueryCache, QueryCachePolicy, QueryKey, read_through, read_through_until,
};
use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;
use crate::domain::posts::MonthRange;

pub const DEFAULT_LATEST_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error(transparent)]
    InvalidInput(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Read-only facade over [`PostsRepo`] with a per-operation result cache.
///
/// Every listing only returns posts that are reviewed and whose publication
/// time is not after the clock reading taken at the start of the call. Cached
/// listings expire no later than the next scheduled publication.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostsRepo>,
    clock: Arc<dyn Clock>,
    cache: Arc<QueryCache>,
    policies: CachePolicies,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        clock: Arc<dyn Clock>,
        cache: Arc<QueryCache>,
        policies: CachePolicies,
    ) -> Self {
        Self {
            posts,
            clock,
            cache,
            policies,
        }
    }

    /// Single post by slug, visible or not. Several matches are an error.
    #[instrument(skip(self))]
    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, BlogError> {
        let now = self.clock.now();
        let posts = Arc::clone(&self.posts);
        let lookup = slug.to_string();

        read_through(
            &self.cache.posts,
            QueryKey::PostBySlug(slug.to_string()),
            self.policies.post_by_slug,
            now,
            move || async move { posts.find_by_slug(&lookup).await },
        )
        .await
        .map_err(BlogError::from)
    }

    /// Newest visible posts, at most `limit` of them.
    #[instrument(skip(self))]
    pub async fn latest_verified(&self, limit: u32) -> Result<Vec<PostRecord>, BlogError> {
        self.list(
            QueryKey::LatestVerified { limit },
            self.policies.latest_verified,
            PostQueryFilter::default(),
            Some(limit),
            0,
        )
        .await
    }

    /// Newest visible posts other than `slug`, e.g. "more posts" below an article.
    #[instrument(skip(self))]
    pub async fn recent_excluding(
        &self,
        slug: &str,
        limit: u32,
    ) -> Result<Vec<PostRecord>, BlogError> {
        let filter = PostQueryFilter {
            exclude_slug: Some(slug.to_string()),
            ..Default::default()
        };
        self.list(
            QueryKey::RecentExcluding {
                slug: slug.to_string(),
                limit,
            },
            self.policies.recent_excluding,
            filter,
            Some(limit),
            0,
        )
        .await
    }

    /// One page of visible posts.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: u32, offset: u32) -> Result<Vec<PostRecord>, BlogError> {
        self.list(
            QueryKey::Recent { limit, offset },
            self.policies.recent,
            PostQueryFilter::default(),
            Some(limit),
            offset,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn by_category(&self, category_slug: &str) -> Result<Vec<PostRecord>, BlogError> {
        let filter = PostQueryFilter {
            category: Some(category_slug.to_string()),
            ..Default::default()
        };
        self.list(
            QueryKey::ByCategory(category_slug.to_string()),
            self.policies.by_category,
            filter,
            None,
            0,
        )
        .await
    }

    /// Visible posts published within the given calendar month (UTC).
    ///
    /// Fails with [`BlogError::InvalidInput`] for a month outside 1-12 before
    /// touching the cache or the store.
    #[instrument(skip(self))]
    pub async fn by_month(&self, year: i32, month: u8) -> Result<Vec<PostRecord>, BlogError> {
        let range = MonthRange::new(year, month)?;
        let filter = PostQueryFilter {
            published_within: Some(range),
            ..Default::default()
        };
        self.list(
            QueryKey::ByMonth {
                year: range.year(),
                month: range.month(),
            },
            self.policies.by_month,
            filter,
            None,
            0,
        )
        .await
    }

    /// Visible posts whose title, summary or body contains `needle`, ignoring case.
    ///
    /// The needle is a literal: `%` and `_` carry no wildcard meaning. An empty
    /// needle matches every visible post.
    #[instrument(skip(self))]
    pub async fn search(&self, needle: &str) -> Result<Vec<PostRecord>, BlogError> {
        let filter = PostQueryFilter {
            search: Some(needle.to_string()),
            ..Default::default()
        };
        self.list(
            QueryKey::Search(needle.to_string()),
            self.policies.search,
            filter,
            None,
            0,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn by_tag(&self, tag_slug: &str) -> Result<Vec<PostRecord>, BlogError> {
        let filter = PostQueryFilter {
            tag: Some(tag_slug.to_string()),
            ..Default::default()
        };
        self.list(
            QueryKey::ByTag(tag_slug.to_string()),
            self.policies.by_tag,
            filter,
            None,
            0,
        )
        .await
    }

    /// Drops every cached result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn list(
        &self,
        key: QueryKey,
        policy: QueryCachePolicy,
        filter: PostQueryFilter,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<PostRecord>, BlogError> {
        let now = self.clock.now();
        let mut query = VisiblePostsQuery::new(now, filter).with_offset(offset);
        if let Some(limit) = limit {
            query = query.with_limit(limit);
        }

        let posts = Arc::clone(&self.posts);
        let cached = policy.enabled;
        read_through_until(&self.cache.lists, key, policy, now, move || async move {
            let rows = posts.list_visible(&query).await?;
            // A scheduled post turning visible invalidates the listing.
            let valid_until = if cached {
                posts.next_publication_after(now).await?
            } else {
                None
            };
            Ok::<_, RepoError>((rows, valid_until))
        })
        .await
        .map_err(BlogError::from)
    }
}
