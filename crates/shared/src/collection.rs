use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ingredient::OwnedIngredient;

/// One user collection (fridge or groceries): category name to the ordered
/// list of ingredients under it.
///
/// Categories are unordered in storage but always presented sorted, which the
/// `BTreeMap` gives for free; within a category the insertion order of the
/// backing rows is preserved. Every ingredient under key `K` has
/// `category == K`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    categories: BTreeMap<String, Vec<OwnedIngredient>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a flat row list into a collection. Each item lands under its own
    /// `category` field, preserving the input order within a category.
    pub fn from_items(items: impl IntoIterator<Item = OwnedIngredient>) -> Self {
        let mut collection = Self::new();
        for item in items {
            collection.insert(item);
        }
        collection
    }

    /// Category names in sorted order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Ingredients under a category, empty when the category is absent.
    pub fn items(&self, category: &str) -> &[OwnedIngredient] {
        self.categories.get(category).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<OwnedIngredient>)> {
        self.categories.iter()
    }

    pub fn all_items(&self) -> impl Iterator<Item = &OwnedIngredient> {
        self.categories.values().flatten()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn item_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// True when any ingredient under `category` carries this standard name.
    pub fn contains_standard_name(&self, category: &str, standard_name: &str) -> bool {
        self.items(category)
            .iter()
            .any(|item| item.standard_name == standard_name)
    }

    /// Append an ingredient under its own category, creating the category
    /// entry on first use.
    pub fn insert(&mut self, item: OwnedIngredient) {
        self.categories
            .entry(item.category.clone())
            .or_default()
            .push(item);
    }

    /// Make a category visible even before it holds any ingredient. Used for
    /// previewing staged-but-empty categories.
    pub fn ensure_category(&mut self, name: &str) {
        self.categories.entry(name.to_string()).or_default();
    }

    /// Remove one ingredient by id; the category entry stays even when it
    /// empties out (mirrors the backing rows, where emptiness is transient).
    pub fn remove_item(&mut self, category: &str, id: &str) {
        if let Some(items) = self.categories.get_mut(category) {
            items.retain(|item| item.id != id);
        }
    }

    /// Move every ingredient from `old` under `new`, retagging each item's
    /// `category` field. Merging into an existing live category appends.
    pub fn rename_category(&mut self, old: &str, new: &str) {
        if let Some(items) = self.categories.remove(old) {
            let target = self.categories.entry(new.to_string()).or_default();
            for mut item in items {
                item.category = new.to_string();
                target.push(item);
            }
        }
    }

    /// Drop a category and everything under it.
    pub fn remove_category(&mut self, name: &str) {
        self.categories.remove(name);
    }
}
