//! Analysis dispatcher - fans out one job per page requiring analysis.

use tracing::info;
use uuid::Uuid;

use mining::error::StoreResult;
use mining::traits::store::PageStore;

use super::job::AnalyzePageJob;
use super::queue::AnalysisQueue;

/// Enqueue an analysis job for every `PENDING` or `ERROR` page of the
/// project, resetting each to `PENDING` first. Returns the number of
/// jobs enqueued; a project with no eligible pages enqueues nothing and
/// returns 0.
///
/// The call only enqueues - no analysis happens synchronously, and
/// failures surface later through page status.
pub async fn schedule_analysis(
    project_id: Uuid,
    pages: &dyn PageStore,
    queue: &AnalysisQueue,
) -> StoreResult<usize> {
    let candidates = pages.pages_to_analyze(project_id).await?;

    let mut enqueued = 0;
    for page in candidates {
        pages.mark_pending(page.id).await?;

        if queue.enqueue(AnalyzePageJob::new(page.id, page.url, project_id)) {
            enqueued += 1;
        }
    }

    info!(project_id = %project_id, enqueued = enqueued, "analysis scheduled");
    Ok(enqueued)
}
