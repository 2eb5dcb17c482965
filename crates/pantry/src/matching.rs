//! Read-only matching of ingredient names against both personal collections.
//!
//! Used by the "shop this recipe" flow to skip or pre-uncheck items the user
//! already owns. Duplicate *prevention* stays per-collection and per-category
//! ([`exists_in_category`]); a match in the other collection only informs.

use futures::future;

use foodiebuddy_shared::CollectionKind;

use crate::error::PantryResult;
use crate::normalize::normalize;
use crate::store::{CollectionStore, IngredientMatch};

/// Every ingredient of this user, in either collection, stored under this
/// standard name. An empty result means no match; an ingredient can
/// legitimately show up in both collections.
///
/// An empty standard name short-circuits to no matches: empty keys never
/// meaningfully match.
pub async fn find_existing<S>(
    store: &S,
    user_id: &str,
    standard_name: &str,
) -> PantryResult<Vec<IngredientMatch>>
where
    S: CollectionStore + ?Sized,
{
    if standard_name.is_empty() {
        return Ok(Vec::new());
    }

    Ok(store.query_by_standard_name(user_id, standard_name).await?)
}

/// Narrow duplicate check used when adding a single ingredient: does this
/// display name, once normalized, already live under `category` of the given
/// collection?
pub async fn exists_in_category<S>(
    store: &S,
    user_id: &str,
    kind: CollectionKind,
    category: &str,
    display_name: &str,
) -> PantryResult<bool>
where
    S: CollectionStore + ?Sized,
{
    let standard_name = normalize(display_name);
    if standard_name.is_empty() {
        return Ok(false);
    }

    let collection = store.fetch_all(user_id, kind).await?;
    Ok(collection.contains_standard_name(category, &standard_name))
}

/// Check a recipe's ingredient display names against both collections in one
/// go, preserving input order. Lookups run concurrently; each entry pairs the
/// original display name with whatever the user already owns under its
/// normalized key.
pub async fn check_recipe_ingredients<S>(
    store: &S,
    user_id: &str,
    display_names: &[String],
) -> PantryResult<Vec<(String, Vec<IngredientMatch>)>>
where
    S: CollectionStore + ?Sized,
{
    let keys: Vec<String> = display_names.iter().map(|name| normalize(name)).collect();
    let lookups = future::join_all(
        keys.iter()
            .map(|key| find_existing(store, user_id, key)),
    )
    .await;

    let mut checked = Vec::with_capacity(display_names.len());
    for (name, matches) in display_names.iter().zip(lookups) {
        checked.push((name.clone(), matches?));
    }

    Ok(checked)
}
