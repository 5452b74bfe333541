use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::pagination::{Page, PageRequest, Sort};

/// A persisted record with a numeric identity.
///
/// The serialized field names double as storage column names.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const TABLE: &'static str;

    /// Column holding the soft-delete flag, if the entity has one.
    const ACTIVE_COLUMN: Option<&'static str> = None;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Maps a sort key from the query string to a storage column.
    fn sort_column(property: &str) -> Option<&'static str>;
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Request to backing store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backing store returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Failed to decode stored record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Cannot sort by '{0}'")]
    InvalidSort(String),

    #[error("No {table} row with id {id}")]
    RowNotFound { table: &'static str, id: i64 },
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidSort(_) => AppError::BadRequest(err.to_string()),
            RepositoryError::RowNotFound { .. } => AppError::NotFound(err.to_string()),
            RepositoryError::Backend { status, .. } if status == 409 => {
                AppError::Conflict(err.to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

pub fn sort_column<E: Entity>(sort: &Sort) -> Result<&'static str, RepositoryError> {
    E::sort_column(&sort.property).ok_or_else(|| RepositoryError::InvalidSort(sort.property.clone()))
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Inserts when the entity has no id yet, replaces the stored row otherwise.
    async fn save(&self, entity: E) -> Result<E, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, RepositoryError>;

    async fn find_all(&self, request: &PageRequest) -> Result<Page<E>, RepositoryError>;

    /// Same as `find_all` restricted to rows whose active column is true.
    async fn find_all_active(&self, request: &PageRequest) -> Result<Page<E>, RepositoryError>;

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<E>, RepositoryError>;

    /// Physically removes the row. Returns false when nothing was deleted.
    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError>;
}
