use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at, sleep},
};

use super::SyncOrchestrator;
use crate::info;

/// How often the scheduler checks whether authorization has happened.
pub const AUTHORIZATION_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    AwaitingAuthorization,
    Running,
}

/// Runs a pass once authorized, then again on every interval tick.
///
/// There is no jitter and no catch-up: a tick missed while a pass was still
/// running is simply delayed. Nothing about past runs survives a restart.
pub struct Scheduler {
    orchestrator: Arc<SyncOrchestrator>,
    interval: Duration,
    poll_interval: Duration,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(orchestrator: Arc<SyncOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
            poll_interval: AUTHORIZATION_POLL_INTERVAL,
            state: SchedulerState::AwaitingAuthorization,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Polls the token store until it reports an access token. Never times out.
    pub async fn wait_for_authorization(&mut self) {
        let tokens = self.orchestrator.tokens();
        while !tokens.is_authorized().await {
            sleep(self.poll_interval).await;
        }
        self.state = SchedulerState::Running;
    }

    /// Runs a single pass after authorization.
    pub async fn run_once(mut self) {
        self.wait_for_authorization().await;
        let _ = self.orchestrator.run_pass().await;
    }

    /// Runs until `shutdown` flips to true or its sender goes away.
    ///
    /// Shutdown is observed between passes only; an in-flight pass always
    /// runs to completion.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tokio::select! {
            _ = self.wait_for_authorization() => {}
            _ = shutdown.changed() => return,
        }

        info!(
            "Authorized, syncing now and every {} minutes.",
            self.interval.as_secs() / 60
        );

        let mut ticker = interval_at(Instant::now(), self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // errors are already logged; the next tick starts over
                    let _ = self.orchestrator.run_pass().await;
                }
                _ = shutdown.changed() => break,
            }
        }
    }

    /// Moves the scheduler onto its own task.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(self.run(receiver));
        SchedulerHandle { shutdown, task }
    }
}

/// Owner of a spawned scheduler task.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Asks the scheduler to stop after the current pass and waits for it.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Waits for the scheduler task, keeping it alive indefinitely.
    pub async fn join(self) {
        let SchedulerHandle { shutdown, task } = self;
        let _ = task.await;
        drop(shutdown);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
