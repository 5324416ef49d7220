//! Raffle report value types.

use std::collections::BTreeSet;

use super::error::DomainError;

/// Validated, non-empty set of non-negative medium identifiers used to scope the raffle report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumIds(Vec<i64>);

impl MediumIds {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Result<Self, DomainError> {
        let mut unique = BTreeSet::new();
        for id in ids {
            if id < 0 {
                return Err(DomainError::validation(format!(
                    "medium id must not be negative, got {id}"
                )));
            }
            unique.insert(id);
        }

        if unique.is_empty() {
            return Err(DomainError::validation(
                "at least one medium id is required",
            ));
        }

        Ok(Self(unique.into_iter().collect()))
    }

    /// Sorted, deduplicated identifiers.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.binary_search(&id).is_ok()
    }
}
