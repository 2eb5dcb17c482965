mod ingredient_create_owner_idx;
mod ingredient_create_standard_name_idx;
mod ingredient_create_table;

use sqlx_migrator::vec_box;

pub struct M0001;

sqlx_migrator::sqlite_migration!(
    M0001,
    "main",
    "m0001",
    vec_box![],
    vec_box![
        ingredient_create_table::Operation,
        ingredient_create_owner_idx::Operation,
        ingredient_create_standard_name_idx::Operation
    ]
);
