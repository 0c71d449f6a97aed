//! Runtime pieces for the drone simulator: configuration, logging, the
//! background tick scheduler, and the thread-safe simulation runner.

pub mod config;
pub mod logging;
pub mod runner;
pub mod scheduler;

pub use config::SimConfig;
pub use runner::SimulationRunner;
pub use scheduler::PeriodicScheduler;
