//! Token record entity - one row per completed delegated login.

use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "token_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    #[sea_orm(unique)]
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Check if the access token has expired
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now
    }

    /// Whole seconds left before expiry, floored. Negative once expired.
    pub fn remaining_secs(&self, now: OffsetDateTime) -> i64 {
        let remaining_ms = (self.expires_at - now).whole_milliseconds();
        // A Duration's whole seconds are an i64, so the floored value fits
        remaining_ms.div_euclid(1000) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn record(expires_at: OffsetDateTime) -> Model {
        Model {
            id: "id".into(),
            user_id: "u1".into(),
            access_token: "tok1".into(),
            refresh_token: None,
            expires_at,
            created_at: expires_at - Duration::hours(1),
        }
    }

    #[test]
    fn remaining_secs_is_floored() {
        let now = OffsetDateTime::now_utc();
        let r = record(now + Duration::milliseconds(3_599_600));
        assert_eq!(r.remaining_secs(now), 3599);
    }

    #[test]
    fn remaining_secs_floors_negative_lifetimes() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(record(now - Duration::milliseconds(400)).remaining_secs(now), -1);
        assert_eq!(record(now - Duration::seconds(2)).remaining_secs(now), -2);
        assert_eq!(record(now).remaining_secs(now), 0);
    }

    #[test]
    fn remaining_secs_is_exact_for_long_lifetimes() {
        let now = OffsetDateTime::now_utc();
        let r = record(now + Duration::seconds(315_569_520) - Duration::milliseconds(1));
        assert_eq!(r.remaining_secs(now), 315_569_519);
    }

    #[test]
    fn expiry_is_strict() {
        let now = OffsetDateTime::now_utc();
        assert!(!record(now).is_expired_at(now));
        assert!(record(now - Duration::seconds(1)).is_expired_at(now));
    }
}
