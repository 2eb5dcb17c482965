use futures::future;

use foodiebuddy_shared::{Collection, OwnedIngredient};

use crate::error::{PantryError, PantryResult, StoreError};
use crate::session::EditSession;
use crate::store::CollectionStore;

/// The ordered stages of a commit, named in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CommitStage {
    DeleteItems,
    AddItems,
    RenameCategories,
    DeleteCategories,
    Refresh,
}

/// Make a staged session durable and return the refreshed collection.
///
/// The session is consumed: it has a single logical owner and is spent once
/// commit begins. Remote calls inside a stage run concurrently; a stage only
/// starts after the previous one has fully completed. The order is
/// deliberate: removals before additions avoids transient duplicate-name
/// collisions, renames run after additions so new ingredients are retagged
/// with everything else, and category deletion comes last when the category
/// is already empty in the common case.
///
/// The first stage containing a failure short-circuits the rest with
/// [`PantryError::StoreOperationFailed`]. Earlier stages stay applied, since
/// the store has no cross-document transactions; the caller refetches and
/// reconciles, or retries with a freshly built session. There is no internal
/// retry and no mid-commit cancellation.
pub async fn commit<S>(store: &S, user_id: &str, session: EditSession) -> PantryResult<Collection>
where
    S: CollectionStore + ?Sized,
{
    let kind = session.kind();

    // Stage 1: delete staged-removed ingredients.
    let removed_ids: Vec<&String> = session.removed_ids.values().flatten().collect();
    if !removed_ids.is_empty() {
        tracing::info!(user_id, %kind, count = removed_ids.len(), "deleting staged removals");
        let results =
            future::join_all(removed_ids.iter().map(|id| store.delete(user_id, kind, id))).await;
        first_failure(results, CommitStage::DeleteItems)?;
    }

    // Stage 2: create staged additions. A brand-new category comes into
    // existence here, through its first ingredient; the store has no
    // category entity of its own.
    let additions: Vec<&OwnedIngredient> = session
        .new_items
        .values()
        .chain(session.new_categories.values())
        .flatten()
        .collect();
    if !additions.is_empty() {
        tracing::info!(user_id, %kind, count = additions.len(), "creating staged additions");
        let results = future::join_all(
            additions
                .iter()
                .map(|item| store.create(user_id, kind, item)),
        )
        .await;
        first_failure(results, CommitStage::AddItems)?;
    }

    // Stage 3: rename categories by retagging their remaining rows. Renaming
    // onto a live category merges the two; that is intended.
    if !session.renamed.is_empty() {
        tracing::info!(user_id, %kind, count = session.renamed.len(), "renaming categories");
        let results = future::join_all(
            session
                .renamed
                .iter()
                .map(|(old, new)| store.update_category(user_id, kind, old, new)),
        )
        .await;
        first_failure(results, CommitStage::RenameCategories)?;
    }

    // Stage 4: delete categories. Stages 1 and 3 normally leave them empty,
    // but a concurrent writer may have slipped rows in, and the store has no
    // delete-by-category call, so refetch and sweep whatever remains. An
    // empty sweep is a successful no-op.
    if !session.deleted.is_empty() {
        let current = store.fetch_all(user_id, kind).await.map_err(|source| {
            stage_failed(CommitStage::DeleteCategories, source)
        })?;
        let leftover: Vec<&String> = session
            .deleted
            .iter()
            .flat_map(|name| current.items(name).iter())
            .map(|item| &item.id)
            .collect();
        tracing::info!(
            user_id,
            %kind,
            categories = session.deleted.len(),
            leftover = leftover.len(),
            "deleting staged categories"
        );
        if !leftover.is_empty() {
            let results =
                future::join_all(leftover.iter().map(|id| store.delete(user_id, kind, id))).await;
            first_failure(results, CommitStage::DeleteCategories)?;
        }
    }

    // Stage 5: refetch; the refreshed collection is the new source of truth
    // and the session is gone.
    let refreshed = store
        .fetch_all(user_id, kind)
        .await
        .map_err(|source| stage_failed(CommitStage::Refresh, source))?;

    tracing::info!(
        user_id,
        %kind,
        categories = refreshed.category_count(),
        items = refreshed.item_count(),
        "commit complete"
    );

    Ok(refreshed)
}

/// Surface the first failure of a stage batch, after the whole batch has
/// completed.
fn first_failure<T>(results: Vec<Result<T, StoreError>>, stage: CommitStage) -> PantryResult<()> {
    for result in results {
        if let Err(source) = result {
            return Err(stage_failed(stage, source));
        }
    }
    Ok(())
}

fn stage_failed(stage: CommitStage, source: StoreError) -> PantryError {
    tracing::warn!(%stage, error = %source, "commit stage failed, remaining stages skipped");
    PantryError::StoreOperationFailed { stage, source }
}
