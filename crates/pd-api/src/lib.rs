//! # pd-api
//!
//! HTTP layer for the project dashboard: the magic-link sign-in flow and the
//! JSON timeline views consumed by the front end.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod store;

pub use extractors::AppState;
pub use routes::router;
pub use store::{MemoryProjectStore, ProjectStore, StoreError};
