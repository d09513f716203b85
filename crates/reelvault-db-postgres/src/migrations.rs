//! Startup schema migrations.
//!
//! The schema is small enough to manage as idempotent DDL run on boot:
//! `movies` with a unique slug index, `genres` as a child table, and
//! `ratings` keyed by (user, movie).

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::info;

use crate::error::Result;

const STATEMENTS: &[&str] = &[
    r#"
    create table if not exists movies (
        id UUID primary key,
        slug TEXT not null,
        title TEXT not null,
        yearofrelease integer not null)
    "#,
    r#"
    create unique index if not exists movies_slug_index
    on movies
    using btree(slug)
    "#,
    r#"
    create table if not exists genres (
        movieid UUID references movies (id),
        name TEXT not null)
    "#,
    r#"
    create table if not exists ratings (
        userid uuid,
        movieid UUID references movies (id),
        rating integer not null,
        primary key (userid, movieid))
    "#,
];

/// Applies the schema. Safe to run on every startup.
pub async fn run(pool: &PgPool) -> Result<()> {
    for statement in STATEMENTS {
        query(statement).execute(pool).await?;
    }
    info!("Database schema up to date");
    Ok(())
}
