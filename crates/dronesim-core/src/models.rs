//! Core data models for the drone simulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// GPS lock quality reported by a drone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsFixStatus {
    /// No GPS fix
    NoFix,
    /// 2D GPS fix
    Fix2D,
    /// 3D GPS fix
    #[default]
    Fix3D,
}

impl GpsFixStatus {
    /// Human readable label, as shown on the telemetry display.
    pub fn label(&self) -> &'static str {
        match self {
            GpsFixStatus::NoFix => "No Fix",
            GpsFixStatus::Fix2D => "2D Fix",
            GpsFixStatus::Fix3D => "3D Fix",
        }
    }

    pub fn has_fix(&self) -> bool {
        !matches!(self, GpsFixStatus::NoFix)
    }
}

impl fmt::Display for GpsFixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point-in-time copy of every telemetry field of a drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub drone_id: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    pub heading_deg: f64,
    pub speed_mps: f64,
    /// Battery percentage in [0, 100]
    pub battery: i32,
    pub gps_fix: GpsFixStatus,
    #[serde(default)]
    pub failure_mode: bool,
    pub timestamp: DateTime<Utc>,
}

/// Notifications published by a [`crate::Drone`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DroneEvent {
    /// Any telemetry field changed value
    TelemetryUpdated(TelemetrySnapshot),
    /// Battery crossed from above the low threshold to at or below it
    BatteryLow { level: i32 },
    /// GPS fix went from any fix to no fix
    GpsFixLost,
    FailureSimulated,
    FailureReset,
}

/// Notifications published by a [`crate::TelemetryModel`].
///
/// Drone battery-low and GPS-lost alerts are forwarded here so a single
/// subscription on the model sees everything a display needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ModelEvent {
    TelemetryUpdated(TelemetrySnapshot),
    SimulationStarted,
    SimulationStopped,
    /// New state of the failure simulation flag
    FailureToggled(bool),
    /// Display name of the newly active movement strategy
    StrategyChanged(String),
    BatteryLow(i32),
    GpsFixLost,
}

/// Run state of the simulation clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationState {
    #[default]
    Stopped,
    Running,
}
