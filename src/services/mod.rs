//! Business operations over the entities.
//!
//! Each service is a unit struct with associated async functions taking the
//! connection explicitly, so handlers, the seed loader and tests share one path.

pub mod accounts;
pub mod analytics;
pub mod catalog;
pub mod favorites;
pub mod lookup;
pub mod messaging;
pub mod moderation;

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect, Select};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest offset the database driver can bind.
pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// `offset` / `limit` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// The requested limit, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn effective_limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// The requested offset, capped at `MAX_OFFSET`.
    #[must_use]
    pub fn effective_offset(&self) -> u64 {
        self.offset.min(MAX_OFFSET)
    }
}

/// One page of results plus the total row count for the filter.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    /// Replace every item while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Run `select` for one page, counting the full result set first.
///
/// # Errors
///
/// Returns an error if either query fails.
pub async fn paginate<E, C>(
    db: &C,
    select: Select<E>,
    pagination: Pagination,
) -> Result<Page<E::Model>, AppError>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let limit = pagination.effective_limit();
    let offset = pagination.effective_offset();
    let total = select.clone().count(db).await?;
    let items = select
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    Ok(Page {
        items,
        total,
        offset,
        limit,
    })
}

/// Result of a named bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub updated: u64,
    pub message: String,
}

impl BulkOutcome {
    /// `"{updated} {noun}(s) marked as {state}."`
    #[must_use]
    pub fn new(updated: u64, noun: &str, state: &str) -> Self {
        Self {
            updated,
            message: format!("{updated} {noun}(s) marked as {state}."),
        }
    }
}

/// Body of every bulk action request.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub ids: Vec<uuid::Uuid>,
}

/// Distinguish an absent field from an explicit `null` in partial updates.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an `Option<Option<T>>`.
///
/// # Errors
///
/// Propagates the inner deserialisation error.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim a free-text search term, treating blank input as no search.
#[must_use]
pub fn search_term(q: Option<&str>) -> Option<&str> {
    q.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit_is_clamped() {
        assert_eq!(Pagination::default().effective_limit(), 20);
        assert_eq!(Pagination { offset: 0, limit: 0 }.effective_limit(), 1);
        assert_eq!(Pagination { offset: 0, limit: 1000 }.effective_limit(), 100);
    }

    #[test]
    fn test_effective_offset_fits_driver_range() {
        assert_eq!(Pagination { offset: 40, limit: 20 }.effective_offset(), 40);
        assert_eq!(
            Pagination { offset: u64::MAX, limit: 20 }.effective_offset(),
            u64::try_from(i64::MAX).unwrap_or_default()
        );
    }

    #[test]
    fn test_bulk_outcome_message() {
        assert_eq!(
            BulkOutcome::new(3, "listing", "sold").message,
            "3 listing(s) marked as sold."
        );
        assert_eq!(
            BulkOutcome::new(0, "report", "reviewed").message,
            "0 report(s) marked as reviewed."
        );
    }

    #[test]
    fn test_nullable_distinguishes_null_from_absent() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "nullable")]
            phone: Option<Option<String>>,
        }

        let absent: Patch = serde_json::from_str("{}").unwrap_or(Patch { phone: None });
        assert_eq!(absent.phone, None);
        let cleared: Patch = serde_json::from_str(r#"{"phone":null}"#).unwrap_or(Patch { phone: None });
        assert_eq!(cleared.phone, Some(None));
        let set: Patch = serde_json::from_str(r#"{"phone":"+1234567890"}"#).unwrap_or(Patch { phone: None });
        assert_eq!(set.phone, Some(Some("+1234567890".to_string())));
    }

    #[test]
    fn test_search_term_ignores_blank() {
        assert_eq!(search_term(Some("  toyota ")), Some("toyota"));
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(search_term(None), None);
    }
}
