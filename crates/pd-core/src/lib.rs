//! # pd-core
//!
//! Core types, traits, and utilities for the project dashboard.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Entity, ProjectScoped, Dated)
//! - The injectable clock
//! - Configuration types

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use clock::*;
pub use error::*;
pub use result::*;
pub use traits::*;
