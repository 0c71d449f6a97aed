//! Telemetry model: the simulation clock's state machine and tick logic.
//!
//! The model owns the drone and the active movement strategy. It does not
//! own a thread; a scheduler calls [`TelemetryModel::update_telemetry`] once
//! per [`TelemetryModel::tick_period`] while the simulation is running.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

use crate::drone::Drone;
use crate::events::{EventBus, SubscriptionId};
use crate::factory::create_drone;
use crate::models::{DroneEvent, ModelEvent, SimulationState, TelemetrySnapshot};
use crate::movement::{MovementStrategy, StrategyKind};

pub const DEFAULT_DRONE_ID: &str = "DRONE-001";
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(500);

/// Settings used to build a [`TelemetryModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub drone_id: String,
    pub tick_period: Duration,
    pub strategy: StrategyKind,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            drone_id: DEFAULT_DRONE_ID.to_string(),
            tick_period: DEFAULT_TICK_PERIOD,
            strategy: StrategyKind::default(),
            seed: None,
        }
    }
}

pub struct TelemetryModel {
    drone: Option<Drone>,
    /// Forwarding handler registered on the current drone
    drone_subscription: Option<SubscriptionId>,
    strategy: Option<Box<dyn MovementStrategy>>,
    rng: StdRng,
    tick_period: Duration,
    state: SimulationState,
    failure_simulation_active: bool,
    events: Arc<EventBus<ModelEvent>>,
}

impl TelemetryModel {
    /// Create a model with a default drone and the configured strategy.
    pub fn new(config: &ModelConfig) -> Self {
        Self::with_drone(config, create_drone(&config.drone_id))
    }

    /// Create a model around an existing drone.
    pub fn with_drone(config: &ModelConfig, drone: Drone) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut model = Self {
            drone: None,
            drone_subscription: None,
            strategy: None,
            rng,
            tick_period: config.tick_period,
            state: SimulationState::Stopped,
            failure_simulation_active: false,
            events: Arc::new(EventBus::new()),
        };
        model.set_drone(Some(drone));
        model.set_movement_strategy(config.strategy.build());

        tracing::debug!(
            "TelemetryModel initialized: tick={}ms strategy={}",
            model.tick_period.as_millis(),
            model.strategy_name().unwrap_or("none")
        );
        model
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ModelEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn drone(&self) -> Option<&Drone> {
        self.drone.as_ref()
    }

    /// Mutable access to the drone. Changes made here are still forwarded
    /// to model subscribers.
    pub fn drone_mut(&mut self) -> Option<&mut Drone> {
        self.drone.as_mut()
    }

    pub fn snapshot(&self) -> Option<TelemetrySnapshot> {
        self.drone.as_ref().map(Drone::snapshot)
    }

    pub fn strategy_name(&self) -> Option<&'static str> {
        self.strategy.as_ref().map(|s| s.name())
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn failure_simulation_active(&self) -> bool {
        self.failure_simulation_active
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Swap the owned drone, moving event forwarding to the new one.
    /// Returns the previous drone.
    pub fn set_drone(&mut self, drone: Option<Drone>) -> Option<Drone> {
        let previous = self.drone.take();
        if let (Some(old), Some(id)) = (previous.as_ref(), self.drone_subscription.take()) {
            old.unsubscribe(id);
        }

        self.drone = drone;
        if let Some(drone) = &self.drone {
            let events = Arc::clone(&self.events);
            let id = drone.subscribe(move |event| forward_drone_event(&events, event));
            self.drone_subscription = Some(id);
            tracing::info!("Drone changed to: {}", drone.id());
        }

        previous
    }

    /// Replace the active strategy. The previous one is dropped.
    pub fn set_movement_strategy(&mut self, strategy: Box<dyn MovementStrategy>) {
        let name = strategy.name();
        self.strategy = Some(strategy);

        tracing::info!("Movement strategy changed to: {}", name);
        self.events
            .publish(&ModelEvent::StrategyChanged(name.to_string()));
    }

    pub fn set_strategy_kind(&mut self, kind: StrategyKind) {
        self.set_movement_strategy(kind.build());
    }

    /// Returns true if the simulation was stopped and is now running.
    pub fn start_simulation(&mut self) -> bool {
        if self.state == SimulationState::Running {
            return false;
        }

        self.state = SimulationState::Running;
        tracing::info!("Simulation started");
        self.events.publish(&ModelEvent::SimulationStarted);
        true
    }

    /// Returns true if the simulation was running and is now stopped.
    pub fn stop_simulation(&mut self) -> bool {
        if self.state == SimulationState::Stopped {
            return false;
        }

        self.state = SimulationState::Stopped;
        tracing::info!("Simulation stopped");
        self.events.publish(&ModelEvent::SimulationStopped);
        true
    }

    /// Flip failure simulation and apply it to the drone. Returns the new state.
    pub fn toggle_failure_simulation(&mut self) -> bool {
        self.failure_simulation_active = !self.failure_simulation_active;

        if let Some(drone) = self.drone.as_mut() {
            if self.failure_simulation_active {
                drone.simulate_failure();
            } else {
                drone.reset_failure();
            }
        }

        tracing::info!(
            "Failure simulation {}",
            if self.failure_simulation_active {
                "activated"
            } else {
                "deactivated"
            }
        );
        self.events
            .publish(&ModelEvent::FailureToggled(self.failure_simulation_active));
        self.failure_simulation_active
    }

    /// One simulation tick: move the drone, drain its battery, notify.
    ///
    /// Does nothing while stopped or when no drone or strategy is set.
    /// Returns true if the tick ran.
    pub fn update_telemetry(&mut self) -> bool {
        if self.state != SimulationState::Running {
            return false;
        }

        let (Some(drone), Some(strategy)) = (self.drone.as_mut(), self.strategy.as_ref()) else {
            return false;
        };

        strategy.apply(drone, &mut self.rng);
        drone.drain_battery();

        let snapshot = drone.snapshot();
        tracing::trace!(
            "Tick {}: lat={:.6} lon={:.6} alt={:.1} battery={}%",
            snapshot.drone_id,
            snapshot.lat,
            snapshot.lon,
            snapshot.altitude_m,
            snapshot.battery
        );
        self.events.publish(&ModelEvent::TelemetryUpdated(snapshot));
        true
    }
}

fn forward_drone_event(events: &EventBus<ModelEvent>, event: &DroneEvent) {
    match event {
        DroneEvent::TelemetryUpdated(snapshot) => {
            events.publish(&ModelEvent::TelemetryUpdated(snapshot.clone()))
        }
        DroneEvent::BatteryLow { level } => events.publish(&ModelEvent::BatteryLow(*level)),
        DroneEvent::GpsFixLost => events.publish(&ModelEvent::GpsFixLost),
        // Surfaced to model subscribers as FailureToggled
        DroneEvent::FailureSimulated | DroneEvent::FailureReset => {}
    }
}

impl std::fmt::Debug for TelemetryModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryModel")
            .field("drone", &self.drone.as_ref().map(Drone::id))
            .field("strategy", &self.strategy_name())
            .field("state", &self.state)
            .field("tick_period", &self.tick_period)
            .field("failure_simulation_active", &self.failure_simulation_active)
            .finish()
    }
}
