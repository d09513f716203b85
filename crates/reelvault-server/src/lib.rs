//! HTTP server for the reelvault movie catalog.
//!
//! Request flow: the options builder turns raw query parameters into
//! canonical [`reelvault_core::ListOptions`]; anonymous reads are served
//! out of the tagged response cache when possible; misses go through the
//! service layer to the repository; every successful mutation evicts the
//! shared `movies` cache tag.

pub mod cache;
pub mod config;
pub mod contracts;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod service;
pub mod state;
pub mod validation;

pub use config::AppConfig;
pub use error::ApiError;
pub use server::{ReelvaultServer, ServerBuilder, build_app};
pub use state::AppState;
