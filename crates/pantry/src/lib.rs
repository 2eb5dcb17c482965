pub mod commit;
pub mod error;
pub mod matching;
pub mod normalize;
pub mod session;
pub mod sqlite;
pub mod store;

// Re-export commonly used types
pub use commit::{commit, CommitStage};
pub use error::{PantryError, PantryResult, StageConflict, StoreError};
pub use matching::{check_recipe_ingredients, exists_in_category, find_existing};
pub use normalize::normalize;
pub use session::EditSession;
pub use sqlite::SqliteCollectionStore;
pub use store::{CollectionStore, IngredientMatch};
