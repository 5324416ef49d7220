//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub reviewed: bool,
    pub category: Option<CategoryRef>,
    pub tags: Vec<String>,
}

impl PostRecord {
    /// A post is publicly visible once reviewed and its publication time has passed.
    pub fn is_visible_at(&self, now: OffsetDateTime) -> bool {
        self.reviewed && self.published_at <= now
    }
}

/// One row of the raffle participation report, aggregated per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaffleParticipationRecord {
    pub user_id: i64,
    pub medium: String,
    pub email: String,
    pub entered_raffles: Vec<i64>,
    pub entered_count: u64,
    pub won_raffles: Vec<i64>,
    pub won_count: u64,
}
