use async_trait::async_trait;
use tracing::debug;

use crate::application::repos::{RaffleReportRepo, RepoError};
use crate::domain::entities::RaffleParticipationRecord;
use crate::domain::raffle::MediumIds;

use super::{PostgresRepositories, map_sqlx_error};

/// One row per (user, medium, email). Raffle id lists are distinct and ascending;
/// counts include every entry row. Medium ids arrive as one bound array.
const PARTICIPATION_SQL: &str = r#"
SELECT DISTINCT
    u.id AS user_id,
    m.name AS medium,
    e.email,
    ARRAY(
        SELECT DISTINCT r.raffle_id FROM raffle_entries r
        WHERE r.user_id = u.id
        ORDER BY r.raffle_id
    ) AS entered_raffles,
    (SELECT COUNT(r.raffle_id) FROM raffle_entries r WHERE r.user_id = u.id) AS entered_count,
    ARRAY(
        SELECT DISTINCT r.raffle_id FROM raffle_entries r
        WHERE r.user_id = u.id AND r.winner = TRUE
        ORDER BY r.raffle_id
    ) AS won_raffles,
    (SELECT COUNT(r.raffle_id) FROM raffle_entries r WHERE r.user_id = u.id AND r.winner = TRUE) AS won_count
FROM raffle_entries e
INNER JOIN users u ON e.user_id = u.id
INNER JOIN media m ON m.id = u.medium_id
WHERE m.id = ANY($1)
ORDER BY user_id, e.email
"#;

#[derive(sqlx::FromRow)]
struct ParticipationRow {
    user_id: i64,
    medium: String,
    email: String,
    entered_raffles: Vec<i64>,
    entered_count: i64,
    won_raffles: Vec<i64>,
    won_count: i64,
}

impl ParticipationRow {
    fn into_record(self) -> Result<RaffleParticipationRecord, RepoError> {
        Ok(RaffleParticipationRecord {
            user_id: self.user_id,
            medium: self.medium,
            email: self.email,
            entered_raffles: self.entered_raffles,
            entered_count: PostgresRepositories::convert_count(self.entered_count)?,
            won_raffles: self.won_raffles,
            won_count: PostgresRepositories::convert_count(self.won_count)?,
        })
    }
}

#[async_trait]
impl RaffleReportRepo for PostgresRepositories {
    async fn participation(
        &self,
        media: &MediumIds,
    ) -> Result<Vec<RaffleParticipationRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ParticipationRow>(PARTICIPATION_SQL)
            .bind(media.as_slice())
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        debug!(rows = rows.len(), media = ?media.as_slice(), "raffle participation rows loaded");
        rows.into_iter().map(ParticipationRow::into_record).collect()
    }
}
