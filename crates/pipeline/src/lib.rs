//! Article generation pipeline.
//!
//! - [`prompts`]: instruction text for every stage.
//! - [`stages`]: one generator call per stage, each returning
//!   `Result<String, GenerationError>`.
//! - [`editor`]: the final rewrite pass.
//! - [`coordinator`]: sequencing, progress reporting and failure policy.
//! - [`run`]: executes a pipeline for a stored article and records the
//!   terminal state.
//! - [`suggest`]: section title suggestions for the submission form.

pub mod coordinator;
pub mod editor;
pub mod error;
pub mod prompts;
pub mod reporter;
pub mod request;
pub mod run;
pub mod stages;
pub mod suggest;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{ArticlePipeline, FailurePolicy, PipelineOptions};
pub use error::{GenerationError, PipelineError, RunError, Stage};
pub use reporter::ProgressReporter;
pub use request::GenerationRequest;
