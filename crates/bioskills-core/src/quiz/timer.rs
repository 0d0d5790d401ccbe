//! Periodic tick source for the quiz engine.
//!
//! At most one ticker task runs per `QuestionTimer`. Each `start()` opens a
//! new generation; ticks still queued from an older generation are dropped
//! in `recv()`, so nothing is delivered after `stop()`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

#[derive(Debug)]
pub struct QuestionTimer {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    rx: mpsc::UnboundedReceiver<Tick>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl Default for QuestionTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl QuestionTimer {
    pub fn new(period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            period,
            tx,
            rx,
            handle: None,
            generation: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start ticking. Any running ticker is cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        self.stop();
        self.generation += 1;

        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        tracing::trace!(generation, "question timer started");
    }

    /// Cancel the ticker. Safe to call repeatedly or when idle.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::trace!(generation = self.generation, "question timer stopped");
        }
    }

    /// Wait for the next tick of the running generation.
    ///
    /// Pends forever while stopped, which makes it safe to use as one arm
    /// of a `select!`.
    pub async fn recv(&mut self) -> Option<Tick> {
        loop {
            let tick = self.rx.recv().await?;
            if self.handle.is_some() && tick.generation == self.generation {
                return Some(tick);
            }
        }
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
