//! Analysis job payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One queued page analysis.
///
/// This is the sole contract between the dispatcher and the pipeline:
/// everything else the job needs is read through the injected stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzePageJob {
    /// Page to update when the run finishes
    pub page_id: Uuid,

    /// URL to fetch and analyze
    pub url: String,

    /// Project whose pattern library receives the blocks
    pub project_id: Uuid,
}

impl AnalyzePageJob {
    /// Build the job for one page.
    pub fn new(page_id: Uuid, url: impl Into<String>, project_id: Uuid) -> Self {
        Self {
            page_id,
            url: url.into(),
            project_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_round_trip() {
        let job = AnalyzePageJob::new(Uuid::new_v4(), "https://example.com/a", Uuid::new_v4());
        let json = serde_json::to_string(&job).unwrap();
        let back: AnalyzePageJob = serde_json::from_str(&json).unwrap();

        assert_eq!(back.page_id, job.page_id);
        assert_eq!(back.url, job.url);
        assert_eq!(back.project_id, job.project_id);
    }
}
