//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod generation_task_repo;
pub mod preset_repo;

pub use article_repo::ArticleRepo;
pub use generation_task_repo::GenerationTaskRepo;
pub use preset_repo::PresetRepo;
