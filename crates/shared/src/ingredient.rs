use serde::{Deserialize, Serialize};

/// The two personal ingredient collections every user owns.
///
/// Stored as a text discriminator column on ingredient rows; there is no
/// separate collection entity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Fridge,
    Groceries,
}

impl CollectionKind {
    pub fn is_fridge(&self) -> bool {
        matches!(self, CollectionKind::Fridge)
    }
}

/// One ingredient owned by a user, inside one collection.
///
/// `id` is empty until the row is persisted; a staged ingredient is identified
/// by `(displayed_name, category)` within its edit session. `standard_name`
/// always holds the normalized matching key for `displayed_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedIngredient {
    #[serde(default)]
    pub id: String,
    pub displayed_name: String,
    pub standard_name: String,
    pub category: String,
    #[serde(default)]
    pub is_checked: bool,
}

impl OwnedIngredient {
    /// Build a not-yet-persisted ingredient. The caller provides the already
    /// normalized standard name so this crate stays free of the normalizer.
    pub fn staged(
        displayed_name: impl Into<String>,
        standard_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            displayed_name: displayed_name.into(),
            standard_name: standard_name.into(),
            category: category.into(),
            is_checked: false,
        }
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}
