//! Simulated drone entity.
//!
//! Every mutation goes through a setter that compares against the current
//! value and only publishes [`DroneEvent::TelemetryUpdated`] when the value
//! actually changed.

use chrono::Utc;

use crate::events::{EventBus, SubscriptionId};
use crate::models::{DroneEvent, GpsFixStatus, TelemetrySnapshot};

/// Default position (New Delhi)
pub const DEFAULT_LAT: f64 = 28.6139;
pub const DEFAULT_LON: f64 = 77.2090;
pub const DEFAULT_ALTITUDE_M: f64 = 100.0;

pub const BATTERY_MIN: i32 = 0;
pub const BATTERY_MAX: i32 = 100;
/// Battery-low alert fires when the level drops to or below this value.
pub const LOW_BATTERY_THRESHOLD: i32 = 20;

const NORMAL_DRAIN: i32 = 1;
const FAILURE_DRAIN: i32 = 5;

/// A drone with telemetry state and failure simulation.
#[derive(Debug)]
pub struct Drone {
    id: String,
    lat: f64,
    lon: f64,
    altitude_m: f64,
    heading_deg: f64,
    speed_mps: f64,
    battery: i32,
    gps_fix: GpsFixStatus,
    failure_mode: bool,
    events: EventBus<DroneEvent>,
}

impl Drone {
    /// Create a drone at the default position with a full battery and 3D fix.
    pub fn new(id: impl Into<String>) -> Self {
        let drone = Self {
            id: id.into(),
            lat: DEFAULT_LAT,
            lon: DEFAULT_LON,
            altitude_m: DEFAULT_ALTITUDE_M,
            heading_deg: 0.0,
            speed_mps: 0.0,
            battery: BATTERY_MAX,
            gps_fix: GpsFixStatus::Fix3D,
            failure_mode: false,
            events: EventBus::new(),
        };

        tracing::info!(
            "Drone {} created with initial position: lat={:.6}, lon={:.6}, alt={:.1}",
            drone.id,
            drone.lat,
            drone.lon,
            drone.altitude_m
        );
        drone
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    pub fn battery(&self) -> i32 {
        self.battery
    }

    pub fn gps_fix(&self) -> GpsFixStatus {
        self.gps_fix
    }

    pub fn failure_mode(&self) -> bool {
        self.failure_mode
    }

    /// Copy of the current telemetry, stamped with the current time.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            drone_id: self.id.clone(),
            lat: self.lat,
            lon: self.lon,
            altitude_m: self.altitude_m,
            heading_deg: self.heading_deg,
            speed_mps: self.speed_mps,
            battery: self.battery,
            gps_fix: self.gps_fix,
            failure_mode: self.failure_mode,
            timestamp: Utc::now(),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&DroneEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn set_lat(&mut self, lat: f64) {
        if self.lat != lat {
            self.lat = lat;
            self.telemetry_updated();
        }
    }

    pub fn set_lon(&mut self, lon: f64) {
        if self.lon != lon {
            self.lon = lon;
            self.telemetry_updated();
        }
    }

    pub fn set_altitude_m(&mut self, altitude_m: f64) {
        if self.altitude_m != altitude_m {
            self.altitude_m = altitude_m;
            self.telemetry_updated();
        }
    }

    /// Stored as given; movement strategies keep it in [0, 360).
    pub fn set_heading_deg(&mut self, heading_deg: f64) {
        if self.heading_deg != heading_deg {
            self.heading_deg = heading_deg;
            self.telemetry_updated();
        }
    }

    pub fn set_speed_mps(&mut self, speed_mps: f64) {
        if self.speed_mps != speed_mps {
            self.speed_mps = speed_mps;
            self.telemetry_updated();
        }
    }

    /// Set the battery level, clamped to [0, 100].
    ///
    /// Publishes [`DroneEvent::BatteryLow`] ahead of the telemetry update when
    /// the level crosses from above [`LOW_BATTERY_THRESHOLD`] to at or below it.
    pub fn set_battery(&mut self, battery: i32) {
        let battery = battery.clamp(BATTERY_MIN, BATTERY_MAX);
        if self.battery == battery {
            return;
        }

        let previous = self.battery;
        self.battery = battery;

        if previous > LOW_BATTERY_THRESHOLD && battery <= LOW_BATTERY_THRESHOLD {
            tracing::warn!("Drone {} battery low: {}%", self.id, battery);
            self.events.publish(&DroneEvent::BatteryLow { level: battery });
        }
        self.telemetry_updated();
    }

    /// Publishes [`DroneEvent::GpsFixLost`] ahead of the telemetry update when
    /// going from any fix to no fix.
    pub fn set_gps_fix(&mut self, status: GpsFixStatus) {
        if self.gps_fix == status {
            return;
        }

        let previous = self.gps_fix;
        self.gps_fix = status;

        if previous.has_fix() && !status.has_fix() {
            tracing::warn!("Drone {} GPS fix lost", self.id);
            self.events.publish(&DroneEvent::GpsFixLost);
        }
        self.telemetry_updated();
    }

    /// One tick of battery decay: 1% normally, 5% in failure mode.
    pub fn drain_battery(&mut self) {
        let drain = if self.failure_mode {
            FAILURE_DRAIN
        } else {
            NORMAL_DRAIN
        };
        self.set_battery(self.battery - drain);
    }

    /// Enter failure mode and drop the GPS fix. No-op if already failed.
    pub fn simulate_failure(&mut self) {
        if self.failure_mode {
            return;
        }

        self.failure_mode = true;
        self.set_gps_fix(GpsFixStatus::NoFix);
        tracing::warn!("Drone {} failure mode activated", self.id);
        self.events.publish(&DroneEvent::FailureSimulated);
    }

    /// Leave failure mode and restore a 3D fix. No-op if not failed.
    pub fn reset_failure(&mut self) {
        if !self.failure_mode {
            return;
        }

        self.failure_mode = false;
        self.set_gps_fix(GpsFixStatus::Fix3D);
        tracing::info!("Drone {} failure mode reset", self.id);
        self.events.publish(&DroneEvent::FailureReset);
    }

    fn telemetry_updated(&self) {
        self.events
            .publish(&DroneEvent::TelemetryUpdated(self.snapshot()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorded(drone: &Drone) -> Arc<Mutex<Vec<DroneEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        drone.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
        events
    }

    fn count(events: &Arc<Mutex<Vec<DroneEvent>>>, pred: fn(&DroneEvent) -> bool) -> usize {
        events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    fn is_update(e: &DroneEvent) -> bool {
        matches!(e, DroneEvent::TelemetryUpdated(_))
    }

    fn is_low(e: &DroneEvent) -> bool {
        matches!(e, DroneEvent::BatteryLow { .. })
    }

    fn is_fix_lost(e: &DroneEvent) -> bool {
        matches!(e, DroneEvent::GpsFixLost)
    }

    #[test]
    fn new_drone_has_defaults() {
        let drone = Drone::new("DRONE-001");
        assert_eq!(drone.id(), "DRONE-001");
        assert_eq!(drone.lat(), DEFAULT_LAT);
        assert_eq!(drone.lon(), DEFAULT_LON);
        assert_eq!(drone.altitude_m(), DEFAULT_ALTITUDE_M);
        assert_eq!(drone.heading_deg(), 0.0);
        assert_eq!(drone.speed_mps(), 0.0);
        assert_eq!(drone.battery(), 100);
        assert_eq!(drone.gps_fix(), GpsFixStatus::Fix3D);
        assert!(!drone.failure_mode());
    }

    #[test]
    fn setters_notify_only_on_change() {
        let mut drone = Drone::new("D");
        let events = recorded(&drone);

        drone.set_lat(DEFAULT_LAT);
        drone.set_heading_deg(0.0);
        assert_eq!(count(&events, is_update), 0);

        drone.set_lat(1.0);
        drone.set_lon(2.0);
        drone.set_altitude_m(3.0);
        drone.set_heading_deg(4.0);
        drone.set_speed_mps(5.0);
        assert_eq!(count(&events, is_update), 5);

        match events.lock().unwrap().last() {
            Some(DroneEvent::TelemetryUpdated(snapshot)) => {
                assert_eq!(snapshot.speed_mps, 5.0);
                assert_eq!(snapshot.heading_deg, 4.0);
            }
            other => panic!("unexpected event {:?}", other),
        };
    }

    #[test]
    fn battery_updates_fire_once_per_distinct_value() {
        let mut drone = Drone::new("D");
        let events = recorded(&drone);

        for level in [90, 90, 80, 80, 80, 70] {
            drone.set_battery(level);
        }
        assert_eq!(count(&events, is_update), 3);
    }

    #[test]
    fn battery_is_clamped() {
        let mut drone = Drone::new("D");
        drone.set_battery(150);
        assert_eq!(drone.battery(), 100);
        drone.set_battery(-10);
        assert_eq!(drone.battery(), 0);
    }

    #[test]
    fn battery_low_fires_on_crossing_only() {
        let mut drone = Drone::new("D");
        let events = recorded(&drone);

        drone.set_battery(21);
        assert_eq!(count(&events, is_low), 0);

        drone.set_battery(20);
        drone.set_battery(15);
        drone.set_battery(5);
        assert_eq!(count(&events, is_low), 1);

        // Low alert precedes the telemetry update of the same call
        let log = events.lock().unwrap();
        let low_at = log.iter().position(is_low).unwrap();
        assert_eq!(log[low_at], DroneEvent::BatteryLow { level: 20 });
        assert!(is_update(&log[low_at + 1]));
    }

    #[test]
    fn battery_low_refires_after_recharge() {
        let mut drone = Drone::new("D");
        let events = recorded(&drone);

        drone.set_battery(10);
        drone.set_battery(50);
        drone.set_battery(20);
        assert_eq!(count(&events, is_low), 2);
    }

    #[test]
    fn drain_rates_follow_failure_mode() {
        let mut drone = Drone::new("D");
        drone.drain_battery();
        assert_eq!(drone.battery(), 99);

        drone.simulate_failure();
        drone.drain_battery();
        assert_eq!(drone.battery(), 94);

        drone.reset_failure();
        drone.drain_battery();
        assert_eq!(drone.battery(), 93);
    }

    #[test]
    fn drain_never_goes_below_zero() {
        let mut drone = Drone::new("D");
        drone.simulate_failure();
        for _ in 0..50 {
            drone.drain_battery();
        }
        assert_eq!(drone.battery(), 0);

        let events = recorded(&drone);
        drone.drain_battery();
        assert_eq!(drone.battery(), 0);
        assert_eq!(count(&events, is_update), 0);
    }

    #[test]
    fn simulate_failure_is_idempotent() {
        let mut drone = Drone::new("D");
        let events = recorded(&drone);

        drone.simulate_failure();
        drone.simulate_failure();

        assert!(drone.failure_mode());
        assert_eq!(drone.gps_fix(), GpsFixStatus::NoFix);
        assert_eq!(count(&events, |e| matches!(e, DroneEvent::FailureSimulated)), 1);
        assert_eq!(count(&events, is_fix_lost), 1);
    }

    #[test]
    fn reset_without_failure_is_noop() {
        let mut drone = Drone::new("D");
        let events = recorded(&drone);

        drone.reset_failure();

        assert!(events.lock().unwrap().is_empty());
        assert_eq!(drone.gps_fix(), GpsFixStatus::Fix3D);
    }

    #[test]
    fn reset_restores_3d_fix() {
        let mut drone = Drone::new("D");
        drone.simulate_failure();
        let events = recorded(&drone);

        drone.reset_failure();

        assert!(!drone.failure_mode());
        assert_eq!(drone.gps_fix(), GpsFixStatus::Fix3D);
        assert_eq!(count(&events, |e| matches!(e, DroneEvent::FailureReset)), 1);
        assert_eq!(count(&events, is_fix_lost), 0);
    }

    #[test]
    fn fix_lost_not_raised_when_already_without_fix() {
        let mut drone = Drone::new("D");
        drone.set_gps_fix(GpsFixStatus::NoFix);
        let events = recorded(&drone);

        drone.set_gps_fix(GpsFixStatus::NoFix);
        drone.simulate_failure();

        assert_eq!(count(&events, is_fix_lost), 0);
    }

    #[test]
    fn downgrade_to_2d_is_not_fix_lost() {
        let mut drone = Drone::new("D");
        let events = recorded(&drone);

        drone.set_gps_fix(GpsFixStatus::Fix2D);
        assert_eq!(count(&events, is_fix_lost), 0);

        drone.set_gps_fix(GpsFixStatus::NoFix);
        assert_eq!(count(&events, is_fix_lost), 1);
    }
}
