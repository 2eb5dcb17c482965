use sqlx_migrator::{Info, Migrator};

mod m0001;
pub mod table;

/// Migrator for the foodiebuddy sqlite schema.
///
/// Callers run it with `sqlx_migrator::{Migrate, Plan}` against an acquired
/// connection; the binary's `migrate` command and the pantry integration
/// tests both go through here.
pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec![Box::new(m0001::M0001)])?;

    Ok(migrator)
}
