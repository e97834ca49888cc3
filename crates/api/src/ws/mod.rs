pub mod run_stream;

pub use run_stream::run_stream;
