//! HTTP surface
//!
//! Thin axum handlers over the dataset read paths. Handlers never touch Redis or Postgres
//! directly: they go through the [`CacheStore`](cache_system::CacheStore) and
//! [`SourceOfRecord`](record_source::SourceOfRecord) held in [`AppState`].

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
