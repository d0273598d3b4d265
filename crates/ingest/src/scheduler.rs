//! Periodic execution of the ingestion cycle.
//!
//! Cycles run one after another on a single task, so two cycles never
//! overlap: a tick that arrives while a cycle is running waits for it to
//! finish. At most one such tick is kept; the rest are dropped. A failed
//! cycle is logged and the scheduler carries on with the next tick.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{error, info};

use crate::cycle::{CycleError, CycleReport, IngestionCycle};

/// What the scheduler is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Source of ticks.
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick.
    async fn tick(&mut self);
}

/// Wall-clock ticker. The first tick fires immediately.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        // missed ticks collapse into one delayed tick
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker driven by hand, for tests and embedding.
#[derive(Debug)]
pub struct ChannelTicker {
    rx: mpsc::Receiver<()>,
}

/// Fires ticks into a [`ChannelTicker`].
#[derive(Debug, Clone)]
pub struct TickSender {
    tx: mpsc::Sender<()>,
}

impl ChannelTicker {
    /// A ticker that buffers at most one pending tick.
    #[must_use]
    pub fn new() -> (TickSender, Self) {
        let (tx, rx) = mpsc::channel(1);
        (TickSender { tx }, Self { rx })
    }
}

impl TickSender {
    /// Queue a tick. Returns `false` if one is already pending and this one
    /// was dropped.
    pub fn fire(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

#[async_trait]
impl Ticker for ChannelTicker {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            // no more ticks will ever arrive
            std::future::pending::<()>().await;
        }
    }
}

/// Work the scheduler runs on every tick.
#[async_trait]
pub trait CycleTask: Send + Sync {
    async fn run_once(&self) -> Result<CycleReport, CycleError>;
}

#[async_trait]
impl CycleTask for IngestionCycle {
    async fn run_once(&self) -> Result<CycleReport, CycleError> {
        Self::run_once(self).await
    }
}

/// Runs a [`CycleTask`] on every tick until shut down.
pub struct Scheduler<C, T> {
    task: C,
    ticker: T,
    state: Arc<RwLock<SchedulerState>>,
}

impl<C: CycleTask, T: Ticker> Scheduler<C, T> {
    #[must_use]
    pub fn new(task: C, ticker: T) -> Self {
        Self {
            task,
            ticker,
            state: Arc::new(RwLock::new(SchedulerState::Idle)),
        }
    }

    /// Shared view of the scheduler state, valid after `run` consumes it.
    #[must_use]
    pub fn state_handle(&self) -> Arc<RwLock<SchedulerState>> {
        Arc::clone(&self.state)
    }

    /// Tick and run cycles until `shutdown` resolves.
    ///
    /// Shutdown is only observed between cycles; a cycle in progress is
    /// allowed to finish.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        info!("Ingestion scheduler starting");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = self.ticker.tick() => {}
            }

            *self.state.write().await = SchedulerState::Running;
            match self.task.run_once().await {
                Ok(report) if report.candidates > 0 || report.skipped > 0 => {
                    info!(
                        candidates = report.candidates,
                        persisted = report.persisted,
                        "Cycle finished"
                    );
                }
                Ok(_) => {}
                Err(e) => error!(error = %e, "Ingestion cycle failed"),
            }
            *self.state.write().await = SchedulerState::Idle;
        }

        *self.state.write().await = SchedulerState::Stopped;
        info!("Ingestion scheduler stopped");
    }
}
