//! Background run execution.

pub mod launcher;

pub use launcher::RunLauncher;
