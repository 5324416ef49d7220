use thiserror::Error;

use crate::{
    application::{blog::BlogError, raffle::RaffleReportError},
    infra::error::InfraError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Blog(#[from] BlogError),
    #[error(transparent)]
    RaffleReport(#[from] RaffleReportError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit status for this error: 2 for caller mistakes, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Infra(InfraError::Configuration { .. })
            | AppError::Blog(BlogError::InvalidInput(_))
            | AppError::RaffleReport(RaffleReportError::InvalidInput(_)) => 2,
            AppError::Infra(_)
            | AppError::Blog(BlogError::Repo(_))
            | AppError::RaffleReport(RaffleReportError::Repo(_))
            | AppError::Unexpected(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::RepoError;
    use crate::config::LoadError;
    use crate::domain::error::DomainError;

    #[test]
    fn invalid_input_maps_to_usage_exit_code() {
        let err = AppError::from(BlogError::from(DomainError::validation("month 13")));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn configuration_failures_map_to_usage_exit_code() {
        let load = LoadError::Invalid {
            key: "cache.search_ttl_seconds",
            reason: "must be greater than zero".to_string(),
        };
        let err = AppError::from(InfraError::from(load));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "configuration error: invalid configuration for `cache.search_ttl_seconds`: \
             must be greater than zero"
        );

        let missing = AppError::from(InfraError::configuration("database url is required"));
        assert_eq!(missing.exit_code(), 2);
    }

    #[test]
    fn store_failures_map_to_generic_exit_code() {
        let err = AppError::from(RaffleReportError::from(RepoError::Timeout));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "database timeout");

        let io = AppError::from(InfraError::output("broken pipe"));
        assert_eq!(io.exit_code(), 1);
    }
}
