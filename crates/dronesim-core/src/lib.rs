//! Drone telemetry simulator core.
//!
//! Provides the drone entity, pluggable movement strategies, a synchronous
//! publish-subscribe bus, and the telemetry model that ties them together
//! on each simulation tick.

pub mod drone;
pub mod error;
pub mod events;
pub mod factory;
pub mod models;
pub mod movement;
pub mod telemetry;

pub use drone::{Drone, LOW_BATTERY_THRESHOLD};
pub use error::{Result, SimError};
pub use events::{EventBus, SubscriptionId};
pub use factory::{create_drone, create_drone_at};
pub use models::{DroneEvent, GpsFixStatus, ModelEvent, SimulationState, TelemetrySnapshot};
pub use movement::{
    normalize_heading, HoverStrategy, MovementStrategy, RandomWalkStrategy, StrategyKind,
};
pub use telemetry::{ModelConfig, TelemetryModel, DEFAULT_DRONE_ID, DEFAULT_TICK_PERIOD};
