use async_trait::async_trait;
use serde::Serialize;

use foodiebuddy_shared::{Collection, CollectionKind, OwnedIngredient};

use crate::error::StoreError;

/// One cross-collection match for a standard name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientMatch {
    pub in_fridge: bool,
    pub category: String,
    pub displayed_name: String,
}

/// The remote document store, reduced to the flat async CRUD contract the
/// core assumes of it: keyed ingredient records tagged with an owning user,
/// a collection kind, and a category string. Calls succeed or fail
/// individually; nothing here is atomic across multiple items, and reads are
/// expected to see a session's own completed writes.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Persist a new ingredient (its `id` field is ignored) and return the
    /// generated id.
    async fn create(
        &self,
        user_id: &str,
        kind: CollectionKind,
        item: &OwnedIngredient,
    ) -> Result<String, StoreError>;

    /// Delete one ingredient by id. Deleting an id that no longer exists is a
    /// successful no-op.
    async fn delete(&self, user_id: &str, kind: CollectionKind, id: &str)
        -> Result<(), StoreError>;

    /// Retag every ingredient in `from` with the category `to`, returning how
    /// many rows moved. Moving zero rows is a successful no-op.
    async fn update_category(
        &self,
        user_id: &str,
        kind: CollectionKind,
        from: &str,
        to: &str,
    ) -> Result<u64, StoreError>;

    /// Fetch the whole collection, grouped by category.
    async fn fetch_all(
        &self,
        user_id: &str,
        kind: CollectionKind,
    ) -> Result<Collection, StoreError>;

    /// Find every ingredient of this user, in either collection, whose stored
    /// standard name equals `standard_name`.
    async fn query_by_standard_name(
        &self,
        user_id: &str,
        standard_name: &str,
    ) -> Result<Vec<IngredientMatch>, StoreError>;
}
