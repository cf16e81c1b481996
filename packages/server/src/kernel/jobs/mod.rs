//! Job infrastructure for background page analysis.
//!
//! This module provides the analysis job machinery:
//! - [`AnalyzePageJob`] - the per-page job payload
//! - [`AnalysisQueue`] - in-process queue the dispatcher feeds
//! - [`schedule_analysis`] - fan-out of one job per eligible page
//! - [`AnalysisWorkerPool`] - worker tasks that drive the pipeline
//!
//! # Architecture
//!
//! ```text
//! POST /projects/{id}/analyze
//!     │
//!     └─► schedule_analysis()
//!             ├─► select PENDING/ERROR pages, reset to PENDING
//!             └─► enqueue AnalyzePageJob per page
//!
//! AnalysisWorkerPool (N workers)
//!     │
//!     ├─► recv job from queue
//!     ├─► mining::analyze_page (fetch -> segment -> fingerprint -> fold)
//!     ├─► retry with backoff on transient failure
//!     └─► mark page ANALYZED / ERROR
//! ```
//!
//! Jobs are independent and unordered: one page's failure never touches
//! another in-flight job or the shared pattern library.

mod dispatcher;
mod job;
mod queue;
mod worker;

pub use dispatcher::schedule_analysis;
pub use job::AnalyzePageJob;
pub use queue::{analysis_queue, AnalysisQueue, JobReceiver};
pub use worker::{AnalysisWorkerPool, WorkerConfig};
