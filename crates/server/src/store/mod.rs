//! Token store.
//!
//! Persists one [`TokenRecord`] per completed delegated login and looks records
//! up again by the access token handed to the client. Records are inserted
//! once and never updated or deleted here; expiry is checked by the reader.

mod db;

pub use db::DbTokenStore;

use crate::error::StoreError;
use time::OffsetDateTime;

/// Row written by the callback leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTokenRecord {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: OffsetDateTime,
}

pub type TokenRecord = crate::entity::token_record::Model;

#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert a single record. A failure means nothing was stored.
    async fn insert(&self, record: &NewTokenRecord) -> Result<(), StoreError>;

    /// Look up the record whose access token equals `access_token`.
    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, StoreError>;
}
