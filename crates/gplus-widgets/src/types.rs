//! Shared response types

use serde::{Deserialize, Serialize};

/// Response payload for the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cached_widgets: usize,
}
