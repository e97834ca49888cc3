//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` DTO for writes where the API accepts one

pub mod article;
pub mod generation_task;
pub mod preset;
pub mod status;
