mod collection;
mod ingredient;

pub use collection::Collection;
pub use ingredient::{CollectionKind, OwnedIngredient};
