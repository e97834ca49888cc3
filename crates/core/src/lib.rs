//! Copypanda domain logic.
//!
//! Pure functions and types shared by the database, pipeline and API
//! crates. Nothing in here performs I/O.

pub mod article;
pub mod budget;
pub mod error;
pub mod params;
pub mod preset;
pub mod progress;
pub mod tokens;
pub mod types;
