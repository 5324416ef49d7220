use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{CategoryRef, PostRecord};

/// Column list shared by every post query; `p` is `posts`, `c` is the left-joined category.
pub(crate) const POST_SELECT: &str = "SELECT p.id, p.slug, p.title, p.summary, p.body, \
     p.published_at, p.reviewed, c.slug AS category_slug, c.name AS category_name, \
     ARRAY(SELECT t.slug FROM post_tags pt INNER JOIN tags t ON t.id = pt.tag_id \
           WHERE pt.post_id = p.id ORDER BY t.slug) AS tags \
     FROM posts p LEFT JOIN categories c ON c.id = p.category_id";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) summary: String,
    pub(crate) body: String,
    pub(crate) published_at: OffsetDateTime,
    pub(crate) reviewed: bool,
    pub(crate) category_slug: Option<String>,
    pub(crate) category_name: Option<String>,
    pub(crate) tags: Vec<String>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        let category = match (row.category_slug, row.category_name) {
            (Some(slug), Some(name)) => Some(CategoryRef { slug, name }),
            _ => None,
        };

        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            summary: row.summary,
            body: row.body,
            published_at: row.published_at,
            reviewed: row.reviewed,
            category,
            tags: row.tags,
        }
    }
}
