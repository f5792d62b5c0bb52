use sqlx::SqlitePool;
use tracing::warn;

use crate::error::StoreError;

/// One repository per entity: same generic surface everywhere, concrete
/// row types per implementation.
#[allow(async_fn_in_trait)]
pub trait Repository {
    type Entity;
    type Draft;

    /// Inserts a new record and returns the generated primary key.
    async fn add(&self, draft: &Self::Draft) -> Result<i64, StoreError>;

    /// Missing records are an absence value, not an error.
    async fn get_by_id(&self, id: i64) -> Result<Option<Self::Entity>, StoreError>;

    async fn get_all(&self) -> Result<Vec<Self::Entity>, StoreError>;

    /// Full-replace semantics: every column is overwritten from `entity`.
    /// Fails with a validation error when the primary key is unset.
    async fn update(&self, entity: &Self::Entity) -> Result<(), StoreError>;

    /// Deleting a missing key completes as a no-op.
    async fn remove(&self, id: i64) -> Result<(), StoreError>;

    /// 1-based pages over the full collection; an out-of-range page is an
    /// empty slice.
    async fn paginate(&self, page: u32, page_size: u32) -> Result<Vec<Self::Entity>, StoreError> {
        Ok(page_slice(self.get_all().await?, page, page_size))
    }
}

pub(crate) fn page_slice<T>(items: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }
    let start = (page as usize - 1) * page_size as usize;
    items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect()
}

pub(crate) fn ensure_connected(pool: &SqlitePool) -> Result<(), StoreError> {
    if pool.is_closed() {
        warn!("Storage operation attempted on a closed database handle");
        return Err(StoreError::NotConnected);
    }
    Ok(())
}

pub(crate) fn require_key(id: i64, what: &str) -> Result<(), StoreError> {
    if id <= 0 {
        return Err(StoreError::Validation(format!(
            "{what} id is required for update"
        )));
    }
    Ok(())
}

pub(crate) fn validate_draft<T: validator::Validate>(draft: &T) -> Result<(), StoreError> {
    draft
        .validate()
        .map_err(|e| StoreError::Validation(e.to_string()))
}
