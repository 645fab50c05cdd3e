//! Storage statistics types

use serde::{Deserialize, Serialize};

/// Best-effort aggregate counts across the whole store.
///
/// May lag recent writes on backends with eventually consistent counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub poll_count: u64,
    pub response_count: u64,
}
