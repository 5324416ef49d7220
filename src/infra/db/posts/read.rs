use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use tracing::debug;

use crate::application::repos::{PostsRepo, RepoError, VisiblePostsQuery, at_most_one};
use crate::domain::entities::PostRecord;

use super::types::{POST_SELECT, PostRow};
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let mut qb = QueryBuilder::new(POST_SELECT);
        qb.push(" WHERE p.slug = ");
        qb.push_bind(slug);
        qb.push(" LIMIT 2");

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(at_most_one(rows, "post", slug)?.map(PostRecord::from))
    }

    async fn list_visible(
        &self,
        query: &VisiblePostsQuery,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut qb = QueryBuilder::new(POST_SELECT);
        qb.push(" WHERE p.reviewed = TRUE AND p.published_at <= ");
        qb.push_bind(query.now);

        Self::apply_post_filter(&mut qb, &query.filter);

        qb.push(" ORDER BY p.published_at DESC, p.id DESC");

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }
        if query.offset > 0 {
            qb.push(" OFFSET ");
            qb.push_bind(i64::from(query.offset));
        }

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        debug!(rows = rows.len(), "visible posts loaded");
        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn next_publication_after(
        &self,
        now: OffsetDateTime,
    ) -> Result<Option<OffsetDateTime>, RepoError> {
        sqlx::query_scalar::<_, Option<OffsetDateTime>>(
            "SELECT MIN(published_at) FROM posts WHERE reviewed = TRUE AND published_at > $1",
        )
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}
