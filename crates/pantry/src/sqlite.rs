use async_trait::async_trait;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use foodiebuddy_db::table::Ingredient;
use foodiebuddy_shared::{Collection, CollectionKind, OwnedIngredient};

use crate::error::StoreError;
use crate::store::{CollectionStore, IngredientMatch};

/// sqlite-backed [`CollectionStore`] over the `ingredient` table.
///
/// Rows are keyed by a generated uuid and tagged with the owning user, the
/// collection kind discriminator, and the category string. Each call is one
/// statement; there is no multi-item atomicity, matching the contract the
/// committer assumes.
#[derive(Clone)]
pub struct SqliteCollectionStore {
    pool: SqlitePool,
}

impl SqliteCollectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct IngredientRow {
    id: String,
    category: String,
    displayed_name: String,
    standard_name: String,
    is_checked: bool,
}

#[derive(FromRow)]
struct MatchRow {
    kind: String,
    category: String,
    displayed_name: String,
}

#[async_trait]
impl CollectionStore for SqliteCollectionStore {
    async fn create(
        &self,
        user_id: &str,
        kind: CollectionKind,
        item: &OwnedIngredient,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();

        let statement = Query::insert()
            .into_table(Ingredient::Table)
            .columns([
                Ingredient::Id,
                Ingredient::UserId,
                Ingredient::Kind,
                Ingredient::Category,
                Ingredient::DisplayedName,
                Ingredient::StandardName,
                Ingredient::IsChecked,
            ])
            .values_panic([
                id.clone().into(),
                user_id.into(),
                kind.to_string().into(),
                item.category.clone().into(),
                item.displayed_name.clone().into(),
                item.standard_name.clone().into(),
                item.is_checked.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(id)
    }

    async fn delete(
        &self,
        user_id: &str,
        kind: CollectionKind,
        id: &str,
    ) -> Result<(), StoreError> {
        let statement = Query::delete()
            .from_table(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(id))
            .and_where(Expr::col(Ingredient::UserId).eq(user_id))
            .and_where(Expr::col(Ingredient::Kind).eq(kind.to_string()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    async fn update_category(
        &self,
        user_id: &str,
        kind: CollectionKind,
        from: &str,
        to: &str,
    ) -> Result<u64, StoreError> {
        let statement = Query::update()
            .table(Ingredient::Table)
            .value(Ingredient::Category, to)
            .and_where(Expr::col(Ingredient::UserId).eq(user_id))
            .and_where(Expr::col(Ingredient::Kind).eq(kind.to_string()))
            .and_where(Expr::col(Ingredient::Category).eq(from))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    async fn fetch_all(
        &self,
        user_id: &str,
        kind: CollectionKind,
    ) -> Result<Collection, StoreError> {
        let statement = Query::select()
            .columns([
                Ingredient::Id,
                Ingredient::Category,
                Ingredient::DisplayedName,
                Ingredient::StandardName,
                Ingredient::IsChecked,
            ])
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::UserId).eq(user_id))
            .and_where(Expr::col(Ingredient::Kind).eq(kind.to_string()))
            // Insertion order within a category.
            .order_by_expr(Expr::cust("rowid"), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        Ok(Collection::from_items(rows.into_iter().map(|row| {
            OwnedIngredient {
                id: row.id,
                displayed_name: row.displayed_name,
                standard_name: row.standard_name,
                category: row.category,
                is_checked: row.is_checked,
            }
        })))
    }

    async fn query_by_standard_name(
        &self,
        user_id: &str,
        standard_name: &str,
    ) -> Result<Vec<IngredientMatch>, StoreError> {
        let statement = Query::select()
            .columns([
                Ingredient::Kind,
                Ingredient::Category,
                Ingredient::DisplayedName,
            ])
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::UserId).eq(user_id))
            .and_where(Expr::col(Ingredient::StandardName).eq(standard_name))
            .order_by(Ingredient::Kind, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MatchRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let kind: CollectionKind = row.kind.parse().map_err(|_| {
                    StoreError::Decode(format!("unknown collection kind \"{}\"", row.kind))
                })?;
                Ok(IngredientMatch {
                    in_fridge: kind.is_fridge(),
                    category: row.category,
                    displayed_name: row.displayed_name,
                })
            })
            .collect()
    }
}
