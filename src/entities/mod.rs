pub mod analytics;
pub mod buyer_profile;
pub mod car;
pub mod car_listing;
pub mod document;
pub mod favorite;
pub mod message;
pub mod report;
pub mod search_log;
pub mod seller_profile;
pub mod user;

use sea_orm::{ActiveValue, Value};

/// The value an active model currently holds for a column, whether freshly set or loaded.
pub(crate) const fn current<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}
