//! The analysis pipeline - rate limiting, retry, and the task orchestrator
//!
//! This module owns the run-level state machine: a fixed, ordered list of
//! analysis tasks executed strictly sequentially, each behind the shared rate
//! limiter and a bounded exponential-backoff retry. Task failures are captured
//! per task and never abort the run.

pub mod cancel;
pub mod orchestrator;
pub mod prior;
pub mod rate_limit;
pub mod retry;

pub use cancel::CancelFlag;
pub use orchestrator::{AnalysisOrchestrator, RunOutcome, RunParams, RunSummary};
pub use prior::format_previous_results;
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;
