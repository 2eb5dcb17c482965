use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx_migrator::{Migrate, Plan};

use foodiebuddy_pantry::{
    CollectionStore, SqliteCollectionStore, check_recipe_ingredients, exists_in_category,
    find_existing, normalize,
};
use foodiebuddy_shared::{CollectionKind, OwnedIngredient};

/// Helper to create a migrated in-memory database and store
async fn setup_store() -> SqliteCollectionStore {
    let pool: SqlitePool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();

    let migrator = foodiebuddy_db::migrator().unwrap();
    let mut conn = pool.acquire().await.unwrap();
    migrator.run(&mut *conn, &Plan::apply_all()).await.unwrap();
    drop(conn);

    SqliteCollectionStore::new(pool)
}

async fn seed(
    store: &SqliteCollectionStore,
    user_id: &str,
    kind: CollectionKind,
    name: &str,
    category: &str,
) {
    let item = OwnedIngredient::staged(name, normalize(name), category);
    store.create(user_id, kind, &item).await.unwrap();
}

#[tokio::test]
async fn test_find_existing_reports_fridge_match() {
    let store = setup_store().await;
    seed(&store, "user-1", CollectionKind::Fridge, "Tomates", "Produce").await;

    let matches = find_existing(&store, "user-1", "tomate").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert!(matches[0].in_fridge);
    assert_eq!(matches[0].category, "Produce");
    assert_eq!(matches[0].displayed_name, "Tomates");
}

#[tokio::test]
async fn test_find_existing_reports_both_collections() {
    let store = setup_store().await;
    seed(&store, "user-1", CollectionKind::Fridge, "Tomates", "Produce").await;
    seed(&store, "user-1", CollectionKind::Groceries, "Tomate", "Veg").await;

    let matches = find_existing(&store, "user-1", "tomate").await.unwrap();

    assert_eq!(matches.len(), 2);
    // Kinds sort fridge first.
    assert!(matches[0].in_fridge);
    assert!(!matches[1].in_fridge);
    assert_eq!(matches[1].category, "Veg");
}

#[tokio::test]
async fn test_find_existing_scoped_to_user() {
    let store = setup_store().await;
    seed(&store, "user-2", CollectionKind::Fridge, "Tomates", "Produce").await;

    let matches = find_existing(&store, "user-1", "tomate").await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_find_existing_empty_key_never_matches() {
    let store = setup_store().await;
    seed(&store, "user-1", CollectionKind::Fridge, "Tomates", "Produce").await;

    let matches = find_existing(&store, "user-1", "").await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_exists_in_category_compares_normalized_names() {
    let store = setup_store().await;
    seed(&store, "user-1", CollectionKind::Fridge, "Tomates", "Produce").await;

    // "Tomate" and "Tomates" share the standard name "tomate".
    assert!(
        exists_in_category(&store, "user-1", CollectionKind::Fridge, "Produce", "Tomate")
            .await
            .unwrap()
    );
    // Same name under another category, or in the other collection, is free.
    assert!(
        !exists_in_category(&store, "user-1", CollectionKind::Fridge, "Dairy", "Tomate")
            .await
            .unwrap()
    );
    assert!(
        !exists_in_category(&store, "user-1", CollectionKind::Groceries, "Produce", "Tomate")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_check_recipe_ingredients_preserves_order() {
    let store = setup_store().await;
    seed(&store, "user-1", CollectionKind::Fridge, "Tomates", "Produce").await;
    seed(&store, "user-1", CollectionKind::Groceries, "Milk", "Dairy").await;

    let names = vec![
        "Tomate".to_string(),
        "Flour".to_string(),
        "Milk".to_string(),
    ];
    let checked = check_recipe_ingredients(&store, "user-1", &names)
        .await
        .unwrap();

    assert_eq!(checked.len(), 3);
    assert_eq!(checked[0].0, "Tomate");
    assert_eq!(checked[0].1.len(), 1);
    assert!(checked[0].1[0].in_fridge);
    assert!(checked[1].1.is_empty());
    assert_eq!(checked[2].0, "Milk");
    assert!(!checked[2].1[0].in_fridge);
}
