use rand::{Rng, RngCore};

use super::{normalize_heading, MovementStrategy};
use crate::drone::Drone;

const POSITION_STEP_DEG: f64 = 0.000_001;
const ALTITUDE_STEP_M: f64 = 0.1;
const HEADING_STEP_DEG: f64 = 0.1;
const SPEED_STEP_MPS: f64 = 0.1;

/// Hovering: tiny random drift around the current position.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverStrategy;

impl MovementStrategy for HoverStrategy {
    fn apply(&self, drone: &mut Drone, rng: &mut dyn RngCore) {
        let lat_change = (rng.random_range(0..100) - 50) as f64 * POSITION_STEP_DEG;
        let lon_change = (rng.random_range(0..100) - 50) as f64 * POSITION_STEP_DEG;
        let alt_change = (rng.random_range(0..20) - 10) as f64 * ALTITUDE_STEP_M;

        drone.set_lat(drone.lat() + lat_change);
        drone.set_lon(drone.lon() + lon_change);
        drone.set_altitude_m(drone.altitude_m() + alt_change);

        let heading_drift = (rng.random_range(0..20) - 10) as f64 * HEADING_STEP_DEG;
        drone.set_heading_deg(normalize_heading(drone.heading_deg() + heading_drift));

        // 0.0 to 0.4 m/s
        drone.set_speed_mps(rng.random_range(0..5) as f64 * SPEED_STEP_MPS);
    }

    fn name(&self) -> &'static str {
        "Hover"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hover_stays_near_start() {
        let mut drone = Drone::new("D");
        let mut rng = StdRng::seed_from_u64(7);
        let (lat0, lon0, alt0) = (drone.lat(), drone.lon(), drone.altitude_m());

        HoverStrategy.apply(&mut drone, &mut rng);

        assert!((drone.lat() - lat0).abs() <= 0.00005 + 1e-12);
        assert!((drone.lon() - lon0).abs() <= 0.00005 + 1e-12);
        assert!((drone.altitude_m() - alt0).abs() <= 1.0 + 1e-9);
        assert!((0.0..=0.4 + 1e-9).contains(&drone.speed_mps()));
    }

    #[test]
    fn test_hover_heading_stays_in_range() {
        let mut drone = Drone::new("D");
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..5_000 {
            HoverStrategy.apply(&mut drone, &mut rng);
            assert!((0.0..360.0).contains(&drone.heading_deg()));
        }
    }
}
