use rand::{Rng, RngCore};

use super::{normalize_heading, MovementStrategy};
use crate::drone::Drone;

const POSITION_STEP_DEG: f64 = 0.000_01;
const ALTITUDE_STEP_M: f64 = 0.5;
const MIN_SPEED_MPS: f64 = 5.0;
const MAX_SPEED_MPS: f64 = 20.0;

/// Random walk: larger jumps in position and heading at cruise speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWalkStrategy;

impl MovementStrategy for RandomWalkStrategy {
    fn apply(&self, drone: &mut Drone, rng: &mut dyn RngCore) {
        let lat_change = (rng.random_range(0..200) - 100) as f64 * POSITION_STEP_DEG;
        let lon_change = (rng.random_range(0..200) - 100) as f64 * POSITION_STEP_DEG;
        let alt_change = (rng.random_range(0..50) - 25) as f64 * ALTITUDE_STEP_M;

        drone.set_lat(drone.lat() + lat_change);
        drone.set_lon(drone.lon() + lon_change);
        drone.set_altitude_m(drone.altitude_m() + alt_change);

        let heading_change = (rng.random_range(0..60) - 30) as f64;
        drone.set_heading_deg(normalize_heading(drone.heading_deg() + heading_change));

        drone.set_speed_mps(rng.random_range(MIN_SPEED_MPS..MAX_SPEED_MPS));
    }

    fn name(&self) -> &'static str {
        "Random Walk"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_walk_heading_stays_in_range() {
        let mut drone = Drone::new("D");
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10_000 {
            RandomWalkStrategy.apply(&mut drone, &mut rng);
            let heading = drone.heading_deg();
            assert!((0.0..360.0).contains(&heading), "heading {} out of range", heading);
        }
    }

    #[test]
    fn test_random_walk_speed_and_step_bounds() {
        let mut drone = Drone::new("D");
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..1_000 {
            let (lat0, lon0, alt0) = (drone.lat(), drone.lon(), drone.altitude_m());
            RandomWalkStrategy.apply(&mut drone, &mut rng);

            assert!((MIN_SPEED_MPS..MAX_SPEED_MPS).contains(&drone.speed_mps()));
            assert!((drone.lat() - lat0).abs() <= 0.001 + 1e-9);
            assert!((drone.lon() - lon0).abs() <= 0.001 + 1e-9);
            assert!((drone.altitude_m() - alt0).abs() <= 12.5 + 1e-9);
        }
    }

    #[test]
    fn test_seeded_walks_are_reproducible() {
        let mut a = Drone::new("A");
        let mut b = Drone::new("B");
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            RandomWalkStrategy.apply(&mut a, &mut rng_a);
            RandomWalkStrategy.apply(&mut b, &mut rng_b);
        }

        assert_eq!(a.lat(), b.lat());
        assert_eq!(a.heading_deg(), b.heading_deg());
        assert_eq!(a.speed_mps(), b.speed_mps());
    }
}
