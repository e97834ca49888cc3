pub mod articles;
pub mod presets;
pub mod runs;
