//! Movement strategies.
//!
//! A strategy perturbs a drone's position, heading and speed once per tick.
//! Changes are applied through the drone setters so observers are notified.

mod hover;
mod random_walk;

pub use hover::HoverStrategy;
pub use random_walk::RandomWalkStrategy;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::drone::Drone;
use crate::error::SimError;

/// Per-tick motion policy.
pub trait MovementStrategy: Send + Sync {
    /// Apply one tick of motion to the drone.
    fn apply(&self, drone: &mut Drone, rng: &mut dyn RngCore);

    /// Stable display name.
    fn name(&self) -> &'static str;
}

/// Built-in strategies, selectable by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Near-stationary drift
    #[default]
    Hover,
    /// Visibly dynamic wandering
    RandomWalk,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Hover, StrategyKind::RandomWalk];

    pub fn build(self) -> Box<dyn MovementStrategy> {
        match self {
            StrategyKind::Hover => Box::new(HoverStrategy),
            StrategyKind::RandomWalk => Box::new(RandomWalkStrategy),
        }
    }

    /// Command-line spelling of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Hover => "hover",
            StrategyKind::RandomWalk => "random-walk",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hover" => Ok(StrategyKind::Hover),
            "random-walk" | "random_walk" | "randomwalk" | "random walk" => {
                Ok(StrategyKind::RandomWalk)
            }
            _ => Err(SimError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Wrap a heading in degrees into [0, 360).
pub fn normalize_heading(heading_deg: f64) -> f64 {
    let wrapped = heading_deg.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
