//! Text rendering of telemetry and model events.

use dronesim_core::{ModelEvent, TelemetrySnapshot, LOW_BATTERY_THRESHOLD};
use std::fmt;

const BATTERY_WARN_THRESHOLD: i32 = 50;

/// Battery band used to tag the battery reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    Ok,
    Low,
    Critical,
}

impl BatteryLevel {
    pub fn from_percent(battery: i32) -> Self {
        if battery <= LOW_BATTERY_THRESHOLD {
            BatteryLevel::Critical
        } else if battery <= BATTERY_WARN_THRESHOLD {
            BatteryLevel::Low
        } else {
            BatteryLevel::Ok
        }
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BatteryLevel::Ok => "OK",
            BatteryLevel::Low => "LOW",
            BatteryLevel::Critical => "CRITICAL",
        })
    }
}

/// One-line telemetry readout.
pub fn format_snapshot(snapshot: &TelemetrySnapshot) -> String {
    format!(
        "{} | lat {:.6} lon {:.6} | alt {:.1} m | hdg {:.1}° | spd {:.1} m/s | bat {}% [{}] | GPS {}{}",
        snapshot.drone_id,
        snapshot.lat,
        snapshot.lon,
        snapshot.altitude_m,
        snapshot.heading_deg,
        snapshot.speed_mps,
        snapshot.battery,
        BatteryLevel::from_percent(snapshot.battery),
        snapshot.gps_fix,
        if snapshot.failure_mode { " | FAILURE" } else { "" },
    )
}

/// Status line for a model event, or `None` for telemetry updates.
pub fn status_message(event: &ModelEvent) -> Option<String> {
    let message = match event {
        ModelEvent::TelemetryUpdated(_) => return None,
        ModelEvent::SimulationStarted => "Simulation Running".to_string(),
        ModelEvent::SimulationStopped => "Simulation Stopped".to_string(),
        ModelEvent::FailureToggled(true) => "Failure Mode Active".to_string(),
        ModelEvent::FailureToggled(false) => "Normal Operation".to_string(),
        ModelEvent::StrategyChanged(name) => format!("Strategy: {}", name),
        ModelEvent::BatteryLow(level) => format!("Low Battery: {}%", level),
        ModelEvent::GpsFixLost => "GPS Fix Lost".to_string(),
    };
    Some(message)
}

/// Warning text for events that deserve the user's attention.
pub fn alert_message(event: &ModelEvent) -> Option<String> {
    match event {
        ModelEvent::BatteryLow(level) => {
            Some(format!("Warning: Drone battery is low ({}%)", level))
        }
        ModelEvent::GpsFixLost => Some("Warning: GPS fix has been lost!".to_string()),
        _ => None,
    }
}
