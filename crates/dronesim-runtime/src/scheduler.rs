//! Periodic tick scheduler.
//!
//! A dedicated worker thread hosts a current-thread tokio runtime. The
//! thread is spawned lazily on the first `start` and lives until `shutdown`,
//! while the periodic tick task itself can be started and stopped any
//! number of times on it.

use dronesim_core::{Result, SimError};
use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::runtime::{Builder, Handle};
use tokio::sync::{oneshot, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

struct Worker {
    handle: Handle,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn(name: &str) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(SimError::WorkerSpawn)?;
        let handle = runtime.handle().clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                tracing::debug!("Simulation worker started");
                runtime.block_on(async {
                    // Sender dropped counts as shutdown too
                    let _ = shutdown_rx.await;
                });
                tracing::debug!("Simulation worker finished");
            })
            .map_err(SimError::WorkerSpawn)?;

        Ok(Self {
            handle,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    fn is_alive(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn join(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Simulation worker panicked");
            }
        }
    }
}

/// Runs a tick handler at a fixed period on a background thread.
pub struct PeriodicScheduler {
    name: String,
    period: Duration,
    worker: Option<Worker>,
    /// Stop signal for the active tick task
    ticker: Option<watch::Sender<bool>>,
}

impl PeriodicScheduler {
    pub fn new(name: impl Into<String>, period: Duration) -> Self {
        Self {
            name: name.into(),
            period,
            worker: None,
            ticker: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start calling `tick` once per period, the first call one period from
    /// now. Spawns the worker thread on first use. A panic inside `tick` is
    /// logged and the next period runs as usual.
    ///
    /// Returns `Ok(false)` if a tick task is already active.
    pub fn start<F>(&mut self, tick: F) -> Result<bool>
    where
        F: FnMut() + Send + 'static,
    {
        if self.is_ticking() {
            return Ok(false);
        }

        if !self.worker.as_ref().is_some_and(Worker::is_alive) {
            self.worker = Some(Worker::spawn(&self.name)?);
        }
        let Some(worker) = self.worker.as_ref() else {
            return Ok(false);
        };

        let (stop_tx, stop_rx) = watch::channel(false);
        worker.handle.spawn(run_ticker(self.period, stop_rx, tick));
        self.ticker = Some(stop_tx);

        tracing::debug!("{}: ticking every {}ms", self.name, self.period.as_millis());
        Ok(true)
    }

    /// Stop future ticks. A tick already in progress runs to completion.
    ///
    /// Returns false if no tick task was active.
    pub fn stop(&mut self) -> bool {
        match self.ticker.take() {
            Some(tx) => {
                let _ = tx.send(true);
                true
            }
            None => false,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    pub fn is_worker_alive(&self) -> bool {
        self.worker.as_ref().is_some_and(Worker::is_alive)
    }

    /// Stop ticking and wait for the worker thread to exit.
    pub fn shutdown(&mut self) {
        self.stop();
        if let Some(mut worker) = self.worker.take() {
            worker.join();
            tracing::debug!("{}: worker stopped", self.name);
        }
    }
}

impl Drop for PeriodicScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_ticker<F>(period: Duration, mut stop: watch::Receiver<bool>, mut tick: F)
where
    F: FnMut(),
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = stop.changed() => {
                tracing::trace!("Tick task stopping");
                break;
            }
            _ = ticker.tick() => {
                // A panicking tick must not end the task
                if panic::catch_unwind(AssertUnwindSafe(&mut tick)).is_err() {
                    tracing::error!("Tick handler panicked, continuing");
                }
            }
        }
    }
}
