//! Pass orchestration and scheduling.
//!
//! ```text
//! Scheduler → SyncOrchestrator → (ScrobbleSource → TrackMatcher)* → PlaylistUpdater
//! ```
//!
//! Every pass starts with a token refresh. The scheduler waits for the first
//! authorization, runs a pass immediately and then one per interval.

mod orchestrator;
mod scheduler;

pub use orchestrator::PassReport;
pub use orchestrator::Reconciliation;
pub use orchestrator::SyncOrchestrator;
pub use orchestrator::WindowReport;
pub use orchestrator::WindowStatus;
pub use orchestrator::reconcile;
pub use scheduler::AUTHORIZATION_POLL_INTERVAL;
pub use scheduler::Scheduler;
pub use scheduler::SchedulerHandle;
pub use scheduler::SchedulerState;
