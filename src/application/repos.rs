//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{PostRecord, RaffleParticipationRecord};
use crate::domain::posts::MonthRange;
use crate::domain::raffle::MediumIds;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("expected at most one {entity} for `{key}`, found several")]
    NonUnique { entity: &'static str, key: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Optional restrictions layered on top of the visibility rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQueryFilter {
    pub exclude_slug: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub published_within: Option<MonthRange>,
    /// Literal substring matched case-insensitively against title, summary and body.
    pub search: Option<String>,
}

/// Listing of publicly visible posts, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisiblePostsQuery {
    pub now: OffsetDateTime,
    pub filter: PostQueryFilter,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl VisiblePostsQuery {
    pub fn new(now: OffsetDateTime, filter: PostQueryFilter) -> Self {
        Self {
            now,
            filter,
            limit: None,
            offset: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Looks a post up by slug regardless of visibility.
    ///
    /// Implementations return [`RepoError::NonUnique`] when several rows share the slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    /// Posts that are reviewed and published at or before `query.now`, ordered by
    /// publication time descending with ties broken by id descending.
    async fn list_visible(
        &self,
        query: &VisiblePostsQuery,
    ) -> Result<Vec<PostRecord>, RepoError>;

    /// Earliest publication time of a reviewed post that is still in the future at `now`.
    async fn next_publication_after(
        &self,
        now: OffsetDateTime,
    ) -> Result<Option<OffsetDateTime>, RepoError>;
}

#[async_trait]
pub trait RaffleReportRepo: Send + Sync {
    async fn participation(
        &self,
        media: &MediumIds,
    ) -> Result<Vec<RaffleParticipationRecord>, RepoError>;
}

/// Collapses a result set that should hold zero or one row.
pub fn at_most_one<T>(
    rows: Vec<T>,
    entity: &'static str,
    key: &str,
) -> Result<Option<T>, RepoError> {
    if rows.len() > 1 {
        return Err(RepoError::NonUnique {
            entity,
            key: key.to_string(),
        });
    }
    Ok(rows.into_iter().next())
}
