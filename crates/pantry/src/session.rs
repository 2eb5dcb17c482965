use std::collections::{BTreeMap, BTreeSet};

use foodiebuddy_shared::{Collection, CollectionKind, OwnedIngredient};

use crate::error::StageConflict;
use crate::normalize::normalize;

/// In-memory staging area for one edit episode on one collection.
///
/// A session is created from a snapshot when the user enters edit mode,
/// mutated only by that screen's interaction sequence, and either discarded
/// or handed to [`crate::commit::commit`], which consumes it. Nothing here
/// touches the store.
///
/// A category name lives in at most one of: the unmodified snapshot, the
/// rename sources, the deleted set, or the new categories. Staging
/// operations that would break that return a [`StageConflict`] and leave the
/// session untouched.
#[derive(Debug, Clone)]
pub struct EditSession {
    kind: CollectionKind,
    snapshot: Collection,
    /// Additions under categories that already exist remotely.
    pub(crate) new_items: BTreeMap<String, Vec<OwnedIngredient>>,
    /// Ids of persisted ingredients slated for deletion, per category.
    pub(crate) removed_ids: BTreeMap<String, Vec<String>>,
    /// Pending category renames, old name to new name. Last write wins.
    pub(crate) renamed: BTreeMap<String, String>,
    /// Brand-new categories and the additions staged under them.
    pub(crate) new_categories: BTreeMap<String, Vec<OwnedIngredient>>,
    /// Persisted categories slated for deletion, ingredients included.
    pub(crate) deleted: BTreeSet<String>,
    /// Category names currently in use: existing plus staged, minus deleted.
    reserved: BTreeSet<String>,
}

impl EditSession {
    pub fn new(kind: CollectionKind, snapshot: Collection) -> Self {
        let reserved = snapshot
            .category_names()
            .map(str::to_string)
            .collect::<BTreeSet<_>>();

        Self {
            kind,
            snapshot,
            new_items: BTreeMap::new(),
            removed_ids: BTreeMap::new(),
            renamed: BTreeMap::new(),
            new_categories: BTreeMap::new(),
            deleted: BTreeSet::new(),
            reserved,
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn snapshot(&self) -> &Collection {
        &self.snapshot
    }

    pub fn reserved_categories(&self) -> &BTreeSet<String> {
        &self.reserved
    }

    pub fn removed_ids(&self) -> &BTreeMap<String, Vec<String>> {
        &self.removed_ids
    }

    pub fn new_items(&self) -> &BTreeMap<String, Vec<OwnedIngredient>> {
        &self.new_items
    }

    pub fn new_categories(&self) -> &BTreeMap<String, Vec<OwnedIngredient>> {
        &self.new_categories
    }

    pub fn renamed_categories(&self) -> &BTreeMap<String, String> {
        &self.renamed
    }

    pub fn deleted_categories(&self) -> &BTreeSet<String> {
        &self.deleted
    }

    /// True when committing would be a plain refetch.
    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty()
            && self.removed_ids.is_empty()
            && self.renamed.is_empty()
            && self.new_categories.is_empty()
            && self.deleted.is_empty()
    }

    /// Stage one ingredient addition under a reserved category.
    ///
    /// The display name is normalized here; a collision on the normalized
    /// name against the category's persisted ingredients (minus those staged
    /// for removal) or its staged additions is reported and nothing is
    /// staged. When the category is the target of a pending rename, the
    /// rename source's ingredients, persisted and staged alike, count too,
    /// since everything ends up in the same category after commit.
    pub fn stage_addition(
        &mut self,
        category: &str,
        display_name: &str,
    ) -> Result<(), StageConflict> {
        if !self.reserved.contains(category) {
            return Err(StageConflict::UnknownCategory(category.to_string()));
        }

        let standard_name = normalize(display_name);
        if self.is_duplicate_in(category, &standard_name) {
            tracing::debug!(category, display_name, "rejected duplicate addition");
            return Err(StageConflict::DuplicateIngredient {
                category: category.to_string(),
                displayed_name: display_name.to_string(),
            });
        }

        let item = OwnedIngredient::staged(display_name, standard_name, category);
        if let Some(staged) = self.new_categories.get_mut(category) {
            staged.push(item);
        } else {
            self.new_items
                .entry(category.to_string())
                .or_default()
                .push(item);
        }

        Ok(())
    }

    /// Stage the removal of an ingredient.
    ///
    /// A persisted ingredient is recorded for remote deletion; a staged-only
    /// one is simply dropped from its staged list and never reaches the
    /// removal map. A staged item shown under a rename target is still keyed
    /// under the rename source, so the source lists are searched too.
    /// Removing something that is not there is a no-op.
    pub fn stage_removal(&mut self, category: &str, ingredient: &OwnedIngredient) {
        if ingredient.is_persisted() {
            // Key by the ingredient's own snapshot category: the caller may
            // name a rename target, but the row still lives under the source.
            self.removed_ids
                .entry(ingredient.category.clone())
                .or_default()
                .push(ingredient.id.clone());
            return;
        }

        let unstage = |staged: &mut Vec<OwnedIngredient>| {
            match staged
                .iter()
                .position(|item| item.standard_name == ingredient.standard_name)
            {
                Some(pos) => {
                    staged.remove(pos);
                    true
                }
                None => false,
            }
        };

        if let Some(staged) = self.new_categories.get_mut(category) {
            // The category itself stays staged even when it empties out.
            if unstage(staged) {
                return;
            }
        }

        let sources: Vec<String> = self
            .renamed
            .iter()
            .filter(|(_, target)| target.as_str() == category)
            .map(|(old, _)| old.clone())
            .collect();
        for key in std::iter::once(category.to_string()).chain(sources) {
            if let Some(staged) = self.new_items.get_mut(&key) {
                let found = unstage(staged);
                if staged.is_empty() {
                    self.new_items.remove(&key);
                }
                if found {
                    return;
                }
            }
        }
    }

    /// Reserve a brand-new category name.
    ///
    /// A name already reserved, or deleted earlier in this session, is
    /// rejected: commit order creates items before it deletes categories, so
    /// re-creating a deleted name in the same session would destroy the new
    /// items.
    pub fn stage_category_create(&mut self, name: &str) -> Result<(), StageConflict> {
        if self.reserved.contains(name) || self.deleted.contains(name) {
            return Err(StageConflict::DuplicateCategoryName(name.to_string()));
        }

        self.new_categories.insert(name.to_string(), Vec::new());
        self.reserved.insert(name.to_string());

        Ok(())
    }

    /// Stage the deletion of a category and, transitively, its ingredients.
    ///
    /// Staged additions under the name are discarded since the category will
    /// not exist; a pending rename of the name is dropped with it. Deleting a
    /// staged-only category just un-stages it, there is nothing remote to
    /// touch. Unknown names are a no-op.
    pub fn stage_category_delete(&mut self, name: &str) {
        if self.new_categories.remove(name).is_some() {
            self.reserved.remove(name);
            return;
        }

        if self.snapshot.contains_category(name) && !self.deleted.contains(name) {
            self.deleted.insert(name.to_string());
            self.reserved.remove(name);
            self.new_items.remove(name);
            self.renamed.remove(name);
        }
    }

    /// Stage a category rename.
    ///
    /// Only records the mapping; the new name is not validated against other
    /// categories or other renames. Renaming onto a live category merges at
    /// commit time, and two renames to the same target are last-write-wins.
    /// A staged-only category is rekeyed in place instead.
    pub fn stage_category_rename(&mut self, old: &str, new: &str) -> Result<(), StageConflict> {
        if let Some(staged) = self.new_categories.remove(old) {
            let staged = staged
                .into_iter()
                .map(|mut item| {
                    item.category = new.to_string();
                    item
                })
                .collect();
            self.new_categories.insert(new.to_string(), staged);
            self.reserved.remove(old);
            self.reserved.insert(new.to_string());
            return Ok(());
        }

        if !self.snapshot.contains_category(old) || self.deleted.contains(old) {
            return Err(StageConflict::UnknownCategory(old.to_string()));
        }

        if let Some(previous_target) = self.renamed.insert(old.to_string(), new.to_string()) {
            self.release_reserved(&previous_target);
        }
        self.release_reserved(old);
        self.reserved.insert(new.to_string());

        Ok(())
    }

    /// Drop `name` from the reserved set unless something still claims it: a
    /// live snapshot category, a staged new category, or another rename
    /// pointing at it.
    fn release_reserved(&mut self, name: &str) {
        let claimed = (self.snapshot.contains_category(name)
            && !self.deleted.contains(name)
            && !self.renamed.contains_key(name))
            || self.new_categories.contains_key(name)
            || self.renamed.values().any(|target| target == name);
        if !claimed {
            self.reserved.remove(name);
        }
    }

    /// Throw away everything staged; the reserved set reloads from the
    /// snapshot.
    pub fn discard(&mut self) {
        self.new_items.clear();
        self.removed_ids.clear();
        self.renamed.clear();
        self.new_categories.clear();
        self.deleted.clear();
        self.reserved = self
            .snapshot
            .category_names()
            .map(str::to_string)
            .collect();
    }

    /// Apply the staged edits to the snapshot, without touching the store.
    ///
    /// This is what the UI renders while editing. The application order
    /// mirrors the commit stages: removals, additions, renames (merging),
    /// category deletions. One divergence: a created-but-still-empty category
    /// shows up here, while after a real commit it only exists once an
    /// ingredient lands under it.
    pub fn preview(&self) -> Collection {
        let mut preview = self.snapshot.clone();

        for (category, ids) in &self.removed_ids {
            for id in ids {
                preview.remove_item(category, id);
            }
        }

        for items in self.new_items.values() {
            for item in items {
                preview.insert(item.clone());
            }
        }

        for (name, items) in &self.new_categories {
            preview.ensure_category(name);
            for item in items {
                preview.insert(item.clone());
            }
        }

        for (old, new) in &self.renamed {
            preview.rename_category(old, new);
        }

        for name in &self.deleted {
            preview.remove_category(name);
        }

        preview
    }

    /// Duplicate check for an addition under `category`: persisted
    /// ingredients not staged for removal, staged additions, and both of
    /// those again for any rename source pointing at `category`, since a
    /// source's items (persisted and staged alike) land in the target at
    /// commit time.
    fn is_duplicate_in(&self, category: &str, standard_name: &str) -> bool {
        if standard_name.is_empty() {
            // Empty keys never match anything.
            return false;
        }

        let persisted_conflict = |cat: &str| {
            let removed: &[String] = self.removed_ids.get(cat).map_or(&[], Vec::as_slice);
            self.snapshot
                .items(cat)
                .iter()
                .any(|item| item.standard_name == standard_name && !removed.contains(&item.id))
        };
        let staged_conflict = |cat: &str| {
            self.new_items
                .get(cat)
                .into_iter()
                .chain(self.new_categories.get(cat))
                .flatten()
                .any(|item| item.standard_name == standard_name)
        };

        if persisted_conflict(category) || staged_conflict(category) {
            return true;
        }

        self.renamed
            .iter()
            .any(|(old, new)| new == category && (persisted_conflict(old) || staged_conflict(old)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(id: &str, name: &str, category: &str) -> OwnedIngredient {
        OwnedIngredient {
            id: id.to_string(),
            displayed_name: name.to_string(),
            standard_name: normalize(name),
            category: category.to_string(),
            is_checked: false,
        }
    }

    fn session_with(items: Vec<OwnedIngredient>) -> EditSession {
        EditSession::new(CollectionKind::Fridge, Collection::from_items(items))
    }

    #[test]
    fn test_stage_addition_under_existing_category() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_addition("Dairy", "Cheese").unwrap();

        assert_eq!(session.new_items()["Dairy"].len(), 1);
        assert_eq!(session.new_items()["Dairy"][0].standard_name, "cheese");
        assert!(!session.new_items()["Dairy"][0].is_persisted());
    }

    #[test]
    fn test_stage_addition_unknown_category_conflicts() {
        let mut session = session_with(vec![]);

        let err = session.stage_addition("Dairy", "Milk").unwrap_err();
        assert_eq!(err, StageConflict::UnknownCategory("Dairy".to_string()));
        assert!(session.is_empty());
    }

    #[test]
    fn test_stage_addition_duplicate_by_normalized_name() {
        let mut session = session_with(vec![persisted("1", "Tomates", "Produce")]);

        // "Tomate" normalizes to the persisted "tomate" key.
        let err = session.stage_addition("Produce", "Tomate").unwrap_err();
        assert!(matches!(err, StageConflict::DuplicateIngredient { .. }));
        assert!(session.is_empty());
    }

    #[test]
    fn test_stage_addition_duplicate_against_staged() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_addition("Dairy", "Cheese").unwrap();
        let err = session.stage_addition("Dairy", "cheeses").unwrap_err();
        assert!(matches!(err, StageConflict::DuplicateIngredient { .. }));
    }

    #[test]
    fn test_removed_ingredient_can_be_re_added() {
        let milk = persisted("1", "Milk", "Dairy");
        let mut session = session_with(vec![milk.clone()]);

        session.stage_removal("Dairy", &milk);
        session.stage_addition("Dairy", "Milk").unwrap();

        assert_eq!(session.removed_ids()["Dairy"], vec!["1".to_string()]);
        assert_eq!(session.new_items()["Dairy"].len(), 1);
    }

    #[test]
    fn test_stage_removal_of_staged_only_item_never_reaches_removal_map() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_addition("Dairy", "Cheese").unwrap();
        let staged = session.new_items()["Dairy"][0].clone();
        session.stage_removal("Dairy", &staged);

        assert!(session.removed_ids().is_empty());
        assert!(session.is_empty());
    }

    #[test]
    fn test_stage_category_create_rejects_reserved_name() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        let err = session.stage_category_create("Dairy").unwrap_err();
        assert_eq!(err, StageConflict::DuplicateCategoryName("Dairy".to_string()));

        session.stage_category_create("Snacks").unwrap();
        let err = session.stage_category_create("Snacks").unwrap_err();
        assert_eq!(
            err,
            StageConflict::DuplicateCategoryName("Snacks".to_string())
        );
    }

    #[test]
    fn test_stage_category_create_rejects_deleted_name() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_category_delete("Dairy");
        let err = session.stage_category_create("Dairy").unwrap_err();
        assert_eq!(err, StageConflict::DuplicateCategoryName("Dairy".to_string()));
    }

    #[test]
    fn test_stage_category_delete_discards_staged_additions() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_addition("Dairy", "Cheese").unwrap();
        session.stage_category_delete("Dairy");

        assert!(session.new_items().is_empty());
        assert!(session.deleted_categories().contains("Dairy"));
        assert!(!session.reserved_categories().contains("Dairy"));
    }

    #[test]
    fn test_stage_category_delete_of_staged_only_category_unstages_it() {
        let mut session = session_with(vec![]);

        session.stage_category_create("Snacks").unwrap();
        session.stage_addition("Snacks", "Chips").unwrap();
        session.stage_category_delete("Snacks");

        assert!(session.is_empty());
        assert!(!session.reserved_categories().contains("Snacks"));
    }

    #[test]
    fn test_stage_category_rename_updates_reserved() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_category_rename("Dairy", "Chilled").unwrap();

        assert!(!session.reserved_categories().contains("Dairy"));
        assert!(session.reserved_categories().contains("Chilled"));
        assert_eq!(session.renamed_categories()["Dairy"], "Chilled");
    }

    #[test]
    fn test_stage_category_rename_last_write_wins() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_category_rename("Dairy", "Chilled").unwrap();
        session.stage_category_rename("Dairy", "Cold").unwrap();

        assert_eq!(session.renamed_categories()["Dairy"], "Cold");
        assert!(!session.reserved_categories().contains("Chilled"));
        assert!(session.reserved_categories().contains("Cold"));
    }

    #[test]
    fn test_discard_restores_reserved_to_snapshot() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_category_create("Snacks").unwrap();
        session.stage_category_rename("Dairy", "Chilled").unwrap();
        session.stage_category_delete("Chilled");
        session.discard();

        assert!(session.is_empty());
        let reserved: Vec<&String> = session.reserved_categories().iter().collect();
        assert_eq!(reserved, vec!["Dairy"]);
    }

    #[test]
    fn test_preview_applies_merge_rename() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_category_create("Dairy2").unwrap();
        session.stage_addition("Dairy2", "Cheese").unwrap();
        session.stage_category_rename("Dairy", "Dairy2").unwrap();

        let preview = session.preview();
        assert!(!preview.contains_category("Dairy"));
        let merged = preview.items("Dairy2");
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|item| item.category == "Dairy2"));
    }

    #[test]
    fn test_preview_applies_removals_and_deletions() {
        let milk = persisted("1", "Milk", "Dairy");
        let mut session = session_with(vec![
            milk.clone(),
            persisted("2", "Tomato", "Produce"),
        ]);

        session.stage_removal("Dairy", &milk);
        session.stage_category_delete("Produce");

        let preview = session.preview();
        assert!(preview.items("Dairy").is_empty());
        assert!(!preview.contains_category("Produce"));
    }

    #[test]
    fn test_addition_into_rename_target_checks_source_items() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_category_create("Dairy2").unwrap();
        session.stage_category_rename("Dairy", "Dairy2").unwrap();

        // Milk will land in Dairy2 through the rename, so staging it again
        // under Dairy2 would duplicate after commit.
        let err = session.stage_addition("Dairy2", "Milk").unwrap_err();
        assert!(matches!(err, StageConflict::DuplicateIngredient { .. }));
    }

    #[test]
    fn test_addition_into_rename_target_checks_source_staged_additions() {
        let mut session = session_with(vec![
            persisted("1", "Milk", "Dairy"),
            persisted("2", "Tomato", "Produce"),
        ]);

        session.stage_addition("Dairy", "Cheese").unwrap();
        session.stage_category_rename("Dairy", "Produce").unwrap();

        // The staged cheese is already bound for Produce through the rename.
        let err = session.stage_addition("Produce", "Cheese").unwrap_err();
        assert!(matches!(err, StageConflict::DuplicateIngredient { .. }));
    }

    #[test]
    fn test_stage_removal_reaches_staged_item_under_rename_source() {
        let mut session = session_with(vec![persisted("1", "Milk", "Dairy")]);

        session.stage_addition("Dairy", "Cheese").unwrap();
        let staged = session.new_items()["Dairy"][0].clone();
        session.stage_category_rename("Dairy", "Chilled").unwrap();

        // After the rename the staged cheese is shown under Chilled; removing
        // it there must drop it from the session entirely.
        session.stage_removal("Chilled", &staged);

        assert!(session.new_items().is_empty());
        assert!(session.removed_ids().is_empty());
    }

    #[test]
    fn test_stage_removal_of_persisted_item_via_rename_target_keys_source() {
        let milk = persisted("1", "Milk", "Dairy");
        let mut session = session_with(vec![milk.clone()]);

        session.stage_category_rename("Dairy", "Chilled").unwrap();
        session.stage_removal("Chilled", &milk);

        assert_eq!(session.removed_ids()["Dairy"], vec!["1".to_string()]);
        assert!(session.preview().items("Chilled").is_empty());
    }
}
