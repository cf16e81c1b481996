//! In-process analysis job queue.
//!
//! An unbounded MPSC channel: the schedule endpoint enqueues without
//! blocking, the worker pool shares one receiver. Job count equals page
//! count selected at schedule time; there is no dynamic re-fan-out.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use super::job::AnalyzePageJob;

/// Sending half, held by the schedule endpoint.
#[derive(Clone)]
pub struct AnalysisQueue {
    tx: mpsc::UnboundedSender<AnalyzePageJob>,
}

/// Receiving half, shared by the worker pool.
#[derive(Clone)]
pub struct JobReceiver {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<AnalyzePageJob>>>,
}

/// Create a connected queue/receiver pair.
pub fn analysis_queue() -> (AnalysisQueue, JobReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        AnalysisQueue { tx },
        JobReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

impl AnalysisQueue {
    /// Enqueue one job. Returns false when the worker pool has shut
    /// down and the receiver is gone.
    pub fn enqueue(&self, job: AnalyzePageJob) -> bool {
        self.tx.send(job).is_ok()
    }
}

impl JobReceiver {
    /// Receive the next job, or `None` once the queue is closed and drained.
    pub async fn recv(&self) -> Option<AnalyzePageJob> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_enqueue_and_recv() {
        let (queue, receiver) = analysis_queue();
        let job = AnalyzePageJob::new(Uuid::new_v4(), "https://example.com/", Uuid::new_v4());

        assert!(queue.enqueue(job.clone()));
        let received = receiver.recv().await.unwrap();
        assert_eq!(received.page_id, job.page_id);
    }

    #[tokio::test]
    async fn test_recv_is_fifo() {
        let (queue, receiver) = analysis_queue();
        let project_id = Uuid::new_v4();

        for i in 0..3 {
            queue.enqueue(AnalyzePageJob::new(
                Uuid::new_v4(),
                format!("https://example.com/{}", i),
                project_id,
            ));
        }

        for i in 0..3 {
            let job = receiver.recv().await.unwrap();
            assert_eq!(job.url, format!("https://example.com/{}", i));
        }
    }
}
