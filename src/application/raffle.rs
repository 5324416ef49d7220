//! Raffle participation report.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::application::repos::{RaffleReportRepo, RepoError};
use crate::domain::entities::RaffleParticipationRecord;
use crate::domain::error::DomainError;
use crate::domain::raffle::MediumIds;

const LIST_SEPARATOR: &str = "|";

#[derive(Debug, Error)]
pub enum RaffleReportError {
    #[error(transparent)]
    InvalidInput(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Per-user raffle participation for a set of media. Results are never cached.
#[derive(Clone)]
pub struct RaffleReportService {
    repo: Arc<dyn RaffleReportRepo>,
}

impl RaffleReportService {
    pub fn new(repo: Arc<dyn RaffleReportRepo>) -> Self {
        Self { repo }
    }

    /// Fails with [`RaffleReportError::InvalidInput`] for an empty
    /// id list or a negative id; the store is not queried in that case.
    #[instrument(skip(self))]
    pub async fn participation(
        &self,
        media_ids: &[i64],
    ) -> Result<Vec<RaffleParticipationRecord>, RaffleReportError> {
        let media = MediumIds::new(media_ids.iter().copied())?;
        let rows = self.repo.participation(&media).await?;
        debug!(rows = rows.len(), "raffle participation report loaded");
        Ok(rows)
    }
}

/// Writes the report as CSV with raffle id lists joined by `|`.
pub fn write_csv<W: io::Write>(
    records: &[RaffleParticipationRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "user_id",
        "medium",
        "email",
        "entered",
        "entered_count",
        "won",
        "won_count",
    ])?;

    for record in records {
        out.write_record([
            record.user_id.to_string(),
            record.medium.clone(),
            record.email.clone(),
            join_ids(&record.entered_raffles),
            record.entered_count.to_string(),
            join_ids(&record.won_raffles),
            record.won_count.to_string(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
