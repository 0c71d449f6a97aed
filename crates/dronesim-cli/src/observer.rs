//! Console observer.
//!
//! Status changes and alerts are printed as they are published. Telemetry
//! updates arrive several times per tick (once per changed field, then once
//! for the tick itself), so the observer only records the latest snapshot
//! and a renderer thread prints it at the tick rate.

use dronesim_core::{ModelEvent, TelemetrySnapshot};
use dronesim_runtime::SimulationRunner;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::display::{alert_message, format_snapshot, status_message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

pub struct ConsoleObserver {
    format: OutputFormat,
    latest: Mutex<Option<TelemetrySnapshot>>,
    dirty: AtomicBool,
}

impl ConsoleObserver {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            latest: Mutex::new(None),
            dirty: AtomicBool::new(false),
        }
    }

    /// Subscribe to the runner's model events.
    pub fn attach(self: &Arc<Self>, runner: &SimulationRunner) {
        let observer = Arc::clone(self);
        runner.subscribe(move |event| observer.handle(event));
    }

    pub fn handle(&self, event: &ModelEvent) {
        if let ModelEvent::TelemetryUpdated(snapshot) = event {
            *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
            self.dirty.store(true, Ordering::Release);
            return;
        }

        match self.format {
            OutputFormat::Json => print_json(event),
            OutputFormat::Text => {
                if let Some(alert) = alert_message(event) {
                    tracing::warn!("{}", alert);
                }
                if let Some(status) = status_message(event) {
                    println!("[status] {}", status);
                }
            }
        }
    }

    /// Latest snapshot if it changed since the previous call.
    pub fn take_pending(&self) -> Option<TelemetrySnapshot> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return None;
        }
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn render_pending(&self) {
        if let Some(snapshot) = self.take_pending() {
            self.render(&snapshot);
        }
    }

    pub fn render(&self, snapshot: &TelemetrySnapshot) {
        match self.format {
            OutputFormat::Json => print_json(&ModelEvent::TelemetryUpdated(snapshot.clone())),
            OutputFormat::Text => println!("{}", format_snapshot(snapshot)),
        }
    }
}

fn print_json(event: &ModelEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::error!("Failed to encode event: {}", e),
    }
}

/// Background thread printing pending telemetry at a fixed interval.
pub struct Renderer {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Renderer {
    pub fn spawn(observer: Arc<ConsoleObserver>, interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("dronesim-render".to_string())
            .spawn(move || {
                while !stop_flag.load(Ordering::Acquire) {
                    std::thread::sleep(interval);
                    observer.render_pending();
                }
            })?;

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.halt();
    }
}
