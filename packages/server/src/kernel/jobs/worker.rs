//! Analysis worker pool.
//!
//! Consumes queued page jobs, drives the mining pipeline per job and
//! settles each page's status. Jobs are retried with exponential
//! backoff on transient failures; every retry re-runs the pipeline from
//! scratch (the pipeline writes nothing before its fetch/segment stage
//! has fully succeeded, so retries cannot double-count blocks).

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use mining::error::{AnalysisError, FetchError};
use mining::traits::{fetcher::Fetcher, store::PageStore, store::PatternStore};

use super::job::AnalyzePageJob;
use super::queue::JobReceiver;

/// Configuration for the analysis worker pool.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of concurrent worker tasks
    pub workers: usize,
    /// Attempts per job before the page is marked ERROR
    pub max_attempts: u32,
    /// Base backoff delay; attempt n waits `base * 2^(n-1)`
    pub retry_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

/// Whether a failed attempt is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    Retryable,
    NonRetryable,
}

/// Classify an analysis failure for the retry decision.
///
/// Transport hiccups, timeouts and 5xx answers may clear up on a later
/// attempt; a 404, a malformed URL or an empty body will not.
fn classify_failure(error: &AnalysisError) -> ErrorKind {
    match error {
        AnalysisError::Fetch(FetchError::Timeout { .. })
        | AnalysisError::Fetch(FetchError::Transport(_)) => ErrorKind::Retryable,
        AnalysisError::Fetch(FetchError::Status { status, .. }) => {
            if *status >= 500 || *status == 429 {
                ErrorKind::Retryable
            } else {
                ErrorKind::NonRetryable
            }
        }
        AnalysisError::Fetch(FetchError::EmptyBody { .. })
        | AnalysisError::Fetch(FetchError::InvalidUrl { .. }) => ErrorKind::NonRetryable,
        AnalysisError::Store(mining::StoreError::Backend(_)) => ErrorKind::Retryable,
        AnalysisError::Store(_) => ErrorKind::NonRetryable,
    }
}

/// Pool of worker tasks that process analysis jobs from the queue.
pub struct AnalysisWorkerPool {
    receiver: JobReceiver,
    fetcher: Arc<dyn Fetcher>,
    pages: Arc<dyn PageStore>,
    patterns: Arc<dyn PatternStore>,
    config: WorkerConfig,
    shutdown: CancellationToken,
}

impl AnalysisWorkerPool {
    /// Create a pool with the default configuration.
    pub fn new(
        receiver: JobReceiver,
        fetcher: Arc<dyn Fetcher>,
        pages: Arc<dyn PageStore>,
        patterns: Arc<dyn PatternStore>,
    ) -> Self {
        Self::with_config(receiver, fetcher, pages, patterns, WorkerConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(
        receiver: JobReceiver,
        fetcher: Arc<dyn Fetcher>,
        pages: Arc<dyn PageStore>,
        patterns: Arc<dyn PatternStore>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            receiver,
            fetcher,
            pages,
            patterns,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token for requesting graceful shutdown.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run until the queue closes or shutdown is requested.
    pub async fn run(self) {
        info!(workers = self.config.workers, "analysis worker pool starting");

        let mut handles = Vec::with_capacity(self.config.workers);
        for worker_idx in 0..self.config.workers {
            let receiver = self.receiver.clone();
            let fetcher = self.fetcher.clone();
            let pages = self.pages.clone();
            let patterns = self.patterns.clone();
            let config = self.config.clone();
            let shutdown = self.shutdown.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        maybe_job = receiver.recv() => {
                            let Some(job) = maybe_job else { break };
                            process_job(job, &*fetcher, &*pages, &*patterns, &config).await;
                        }
                    }
                }
                debug!(worker = worker_idx, "analysis worker stopped");
            }));
        }

        futures::future::join_all(handles).await;
        info!("analysis worker pool stopped");
    }
}

/// Run one job to completion, retrying transient failures.
async fn process_job(
    job: AnalyzePageJob,
    fetcher: &dyn Fetcher,
    pages: &dyn PageStore,
    patterns: &dyn PatternStore,
    config: &WorkerConfig,
) {
    debug!(page_id = %job.page_id, url = %job.url, "executing analysis job");

    let mut attempt = 1;
    loop {
        match mining::analyze_page(job.project_id, &job.url, fetcher, patterns).await {
            Ok(analysis) => {
                info!(
                    page_id = %job.page_id,
                    url = %job.url,
                    blocks = analysis.blocks_folded,
                    "page analyzed"
                );
                if let Err(e) = pages
                    .mark_analyzed(job.page_id, analysis.title.as_deref())
                    .await
                {
                    error!(page_id = %job.page_id, error = %e, "failed to mark page analyzed");
                }
                return;
            }
            Err(e) => {
                if classify_failure(&e) == ErrorKind::Retryable && attempt < config.max_attempts {
                    let delay = config.retry_backoff * 2u32.pow(attempt - 1);
                    warn!(
                        page_id = %job.page_id,
                        url = %job.url,
                        attempt = attempt,
                        error = %e,
                        "analysis attempt failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                warn!(page_id = %job.page_id, url = %job.url, error = %e, "analysis failed");
                if let Err(mark_err) = pages.mark_error(job.page_id).await {
                    error!(page_id = %job.page_id, error = %mark_err, "failed to mark page errored");
                }
                return;
            }
        }
    }
}
