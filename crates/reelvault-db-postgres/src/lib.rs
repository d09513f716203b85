//! PostgreSQL backend for the reelvault repository contract.
//!
//! Uses `sqlx-core` and `sqlx-postgres` directly (rather than the `sqlx`
//! facade) so the workspace never pulls in sqlite feature conflicts.

pub mod config;
pub mod error;
pub mod migrations;
pub mod movies;
pub mod pool;
pub mod ratings;

pub use config::PostgresConfig;
pub use error::{PostgresError, Result, to_storage_error};
pub use movies::PostgresMovieRepository;
pub use pool::create_pool;
pub use ratings::PostgresRatingRepository;

pub use sqlx_postgres::PgPool;
