use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{ServicePatch, ServiceRecord, UserRecord};

/// Errors raised by storage adapters
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence of service listings.
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Inserts a new listing.
    async fn insert(&self, service: &ServiceRecord) -> Result<(), StoreError>;

    /// Fetches a listing by identifier.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ServiceRecord>, StoreError>;

    /// Applies a patch and returns the updated listing, or `None` if it no longer exists.
    async fn update(
        &self,
        id: &Uuid,
        patch: &ServicePatch,
    ) -> Result<Option<ServiceRecord>, StoreError>;

    /// Deletes a listing, returning whether a record was removed.
    async fn delete(&self, id: &Uuid) -> Result<bool, StoreError>;

    /// Counts listings with the given status.
    async fn count_by_status(&self, status: &str) -> Result<u64, StoreError>;

    /// Fetches a page of listings with the given status, newest first.
    async fn find_by_status(
        &self,
        status: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ServiceRecord>, StoreError>;
}

/// Read access to user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches a user by identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;
}
