//! Convenience constructors for drones.

use crate::drone::Drone;

/// Create a drone at the default position.
pub fn create_drone(id: &str) -> Drone {
    tracing::info!("Creating drone with ID: {}", id);
    Drone::new(id)
}

/// Create a drone at a given position.
///
/// # Arguments
/// * `id` - Drone identifier
/// * `lat` - Latitude in decimal degrees
/// * `lon` - Longitude in decimal degrees
/// * `altitude_m` - Altitude in meters
pub fn create_drone_at(id: &str, lat: f64, lon: f64, altitude_m: f64) -> Drone {
    tracing::info!(
        "Creating drone with ID: {} at position lat={:.6}, lon={:.6}, alt={:.1}",
        id,
        lat,
        lon,
        altitude_m
    );

    // No subscribers exist yet, so these setters publish to nobody.
    let mut drone = Drone::new(id);
    drone.set_lat(lat);
    drone.set_lon(lon);
    drone.set_altitude_m(altitude_m);
    drone
}
