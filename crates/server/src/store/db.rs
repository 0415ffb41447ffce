use super::{NewTokenRecord, TokenRecord, TokenStore};
use crate::entity::token_record;
use crate::error::StoreError;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use std::sync::Arc;
use time::OffsetDateTime;

/// [`TokenStore`] backed by the `token_record` table.
#[derive(Clone, Debug)]
pub struct DbTokenStore {
    db: Arc<DatabaseConnection>,
}

impl DbTokenStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl TokenStore for DbTokenStore {
    #[tracing::instrument(skip(self, record), fields(user_id = %record.user_id))]
    async fn insert(&self, record: &NewTokenRecord) -> Result<(), StoreError> {
        let row = token_record::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(record.user_id.clone()),
            access_token: Set(record.access_token.clone()),
            refresh_token: Set(record.refresh_token.clone()),
            expires_at: Set(record.expires_at),
            created_at: Set(OffsetDateTime::now_utc()),
        };

        row.insert(self.db.as_ref()).await?;
        tracing::debug!(expires_at = %record.expires_at, "Stored token record");
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, StoreError> {
        let found = token_record::Entity::find()
            .filter(token_record::Column::AccessToken.eq(access_token))
            .one(self.db.as_ref())
            .await?;
        Ok(found)
    }
}
