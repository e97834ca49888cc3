//! Run identifiers and public access tokens for status channels.

use rand::Rng;

/// Length of a generated public access token (alphanumeric characters).
pub const PUBLIC_TOKEN_LENGTH: usize = 32;

/// Prefix of every run identifier.
pub const RUN_ID_PREFIX: &str = "run_";

/// Generate a random public token guarding a run's status channel.
pub fn generate_public_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(PUBLIC_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Build a run identifier from a random suffix.
pub fn run_id(suffix: impl std::fmt::Display) -> String {
    format!("{RUN_ID_PREFIX}{suffix}")
}

/// Compare two tokens without short-circuiting on the first mismatch.
pub fn tokens_match(expected: &str, provided: &str) -> bool {
    let a = expected.as_bytes();
    let b = provided.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
