//! Thread-safe front for starting and stopping the simulation.
//!
//! All access to the model goes through one mutex, so ticks on the worker
//! thread and calls from the caller's thread never interleave inside a drone
//! update. Event handlers run while that mutex is held and must not call
//! back into the runner's model accessors or `start`/`stop`.

use dronesim_core::{
    ModelEvent, Result, StrategyKind, SubscriptionId, TelemetryModel, TelemetrySnapshot,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::scheduler::PeriodicScheduler;

const WORKER_NAME: &str = "dronesim-worker";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SimulationRunner {
    model: Arc<Mutex<TelemetryModel>>,
    /// Serializes whole start/stop transitions
    transition: Mutex<()>,
    /// Held only while reading or flipping the flag
    running: Mutex<bool>,
    scheduler: Mutex<PeriodicScheduler>,
}

impl SimulationRunner {
    pub fn new(model: TelemetryModel) -> Self {
        let period = model.tick_period();
        tracing::debug!("SimulationRunner created");
        Self {
            model: Arc::new(Mutex::new(model)),
            transition: Mutex::new(()),
            running: Mutex::new(false),
            scheduler: Mutex::new(PeriodicScheduler::new(WORKER_NAME, period)),
        }
    }

    /// Start ticking on the background worker. Returns false if already running.
    pub fn start_simulation(&self) -> Result<bool> {
        let _transition = lock(&self.transition);
        if *lock(&self.running) {
            return Ok(false);
        }

        // Model goes Running before the first tick can land
        lock(&self.model).start_simulation();

        let model = Arc::clone(&self.model);
        let started = lock(&self.scheduler).start(move || {
            lock(&model).update_telemetry();
        });
        if let Err(e) = started {
            lock(&self.model).stop_simulation();
            return Err(e);
        }
        *lock(&self.running) = true;

        tracing::info!("SimulationRunner simulation started");
        Ok(true)
    }

    /// Stop future ticks. Returns false if not running.
    pub fn stop_simulation(&self) -> bool {
        let _transition = lock(&self.transition);
        {
            let mut running = lock(&self.running);
            if !*running {
                return false;
            }
            *running = false;
        }

        lock(&self.scheduler).stop();
        lock(&self.model).stop_simulation();
        tracing::info!("SimulationRunner simulation stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        let running = *lock(&self.running);
        running && lock(&self.scheduler).is_worker_alive()
    }

    /// Whether the background worker thread exists. It is spawned on the
    /// first start and lives until shutdown.
    pub fn has_worker(&self) -> bool {
        lock(&self.scheduler).is_worker_alive()
    }

    /// Run `f` with exclusive access to the model.
    pub fn with_model<R>(&self, f: impl FnOnce(&mut TelemetryModel) -> R) -> R {
        let mut model = lock(&self.model);
        f(&mut *model)
    }

    pub fn model(&self) -> Arc<Mutex<TelemetryModel>> {
        Arc::clone(&self.model)
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ModelEvent) + Send + Sync + 'static,
    {
        self.with_model(|model| model.subscribe(handler))
    }

    pub fn toggle_failure_simulation(&self) -> bool {
        self.with_model(TelemetryModel::toggle_failure_simulation)
    }

    pub fn set_strategy_kind(&self, kind: StrategyKind) {
        self.with_model(|model| model.set_strategy_kind(kind));
    }

    pub fn snapshot(&self) -> Option<TelemetrySnapshot> {
        self.with_model(|model| model.snapshot())
    }

    /// Stop the simulation and wait for the worker thread to exit.
    pub fn shutdown(&self) {
        self.stop_simulation();
        lock(&self.scheduler).shutdown();
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.shutdown();
        tracing::debug!("SimulationRunner destroyed");
    }
}
