use thiserror::Error;

use crate::commit::CommitStage;

pub type PantryResult<T> = Result<T, PantryError>;

/// Locally detected staging conflicts. These never cross the component
/// boundary as failures: the staging operation is a no-op and the conflict is
/// returned for the caller to surface, typically as a toast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageConflict {
    #[error("category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    #[error("\"{displayed_name}\" is already in {category}")]
    DuplicateIngredient {
        category: String,
        displayed_name: String,
    },

    #[error("category \"{0}\" does not exist in this collection")]
    UnknownCategory(String),
}

/// Failures reported by a collection store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt ingredient row: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum PantryError {
    /// A remote call failed partway through a commit. Earlier stages are NOT
    /// rolled back (the store offers no cross-document transactions); the
    /// caller must refetch and reconcile, or retry with a fresh session.
    #[error("store operation failed during {stage}: {source}")]
    StoreOperationFailed {
        stage: CommitStage,
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
