use serde::{Deserialize, Serialize};

use crate::chat::models::Metrics;

/// Success body of `POST /api/generate` with `stream: false`.
/// Fields the client does not use are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub response: String,
    pub total_duration: u64,
    pub eval_count: u64,
    pub eval_duration: u64,
}

impl Generation {
    pub fn metrics(&self) -> Metrics {
        Metrics::from_counters(self.total_duration, self.eval_count, self.eval_duration)
    }
}
