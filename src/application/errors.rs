use super::cache::QueryKey;
use super::mutations::MutationKind;
use crate::domain::ApiError;
use thiserror::Error;

/// A cached list could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {key}: {cause}")]
pub struct FetchFailure {
    pub key: QueryKey,
    #[source]
    pub cause: ApiError,
}

/// The backend rejected a create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {kind} teacher: {cause}")]
pub struct MutationFailure {
    pub kind: MutationKind,
    #[source]
    pub cause: ApiError,
}

impl MutationFailure {
    pub fn user_message(&self) -> String {
        format!("Could not {} teacher: {}", self.kind, self.cause.user_message())
    }
}
