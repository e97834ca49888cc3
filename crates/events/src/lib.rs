//! Copypanda run status channels.
//!
//! Every article generation run gets a channel keyed by its run id and
//! guarded by a public token:
//!
//! - [`RunRegistry`]: mints run handles and lets clients attach to a run.
//! - [`RunSnapshot`]: the latest published state of one run.
//! - [`RunReporter`]: the single publisher side, owned by the pipeline.

pub mod channel;
pub mod registry;

pub use channel::{RunReporter, RunSnapshot, RunState};
pub use registry::{AttachError, RunHandle, RunRegistry};
