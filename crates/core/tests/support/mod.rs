//! Shared test helpers for `bffhang-core` integration tests.

pub mod store;

pub use store::RecordingStore;

/// Owned day list from string literals.
pub fn days(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
