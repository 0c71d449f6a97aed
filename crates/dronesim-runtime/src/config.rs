//! Simulator configuration from environment.

use dronesim_core::{ModelConfig, StrategyKind};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const TICK_MS_VAR: &str = "DRONESIM_TICK_MS";
pub const DRONE_ID_VAR: &str = "DRONESIM_DRONE_ID";
pub const STRATEGY_VAR: &str = "DRONESIM_STRATEGY";
pub const SEED_VAR: &str = "DRONESIM_SEED";
pub const LOG_DIR_VAR: &str = "DRONESIM_LOG_DIR";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimConfig {
    pub model: ModelConfig,
    /// Directory for the log file; `None` disables file logging
    pub log_dir: Option<PathBuf>,
}

impl SimConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the environment without logging. The returned warnings describe
    /// ignored values and can be logged once tracing is installed.
    pub fn parse_env() -> (Self, Vec<String>) {
        Self::parse(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparseable values fall back to
    /// the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, warnings) = Self::parse(lookup);
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        config
    }

    /// Like [`SimConfig::from_lookup`], but returns the warnings instead of
    /// logging them.
    pub fn parse<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ModelConfig::default();
        let mut warnings = Vec::new();

        let tick_period = lookup(TICK_MS_VAR)
            .and_then(|raw| parse_value::<u64>(TICK_MS_VAR, &raw, &mut warnings))
            .filter(|ms| {
                if *ms == 0 {
                    warnings.push(format!("{} must be positive, using default", TICK_MS_VAR));
                }
                *ms > 0
            })
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_period);

        let drone_id = lookup(DRONE_ID_VAR)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or(defaults.drone_id);

        let strategy = lookup(STRATEGY_VAR)
            .and_then(|raw| parse_value::<StrategyKind>(STRATEGY_VAR, &raw, &mut warnings))
            .unwrap_or(defaults.strategy);

        let seed =
            lookup(SEED_VAR).and_then(|raw| parse_value::<u64>(SEED_VAR, &raw, &mut warnings));

        let log_dir = lookup(LOG_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let config = Self {
            model: ModelConfig {
                drone_id,
                tick_period,
                strategy,
                seed,
            },
            log_dir,
        };
        (config, warnings)
    }
}

fn parse_value<T>(key: &str, raw: &str, warnings: &mut Vec<String>) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warnings.push(format!("Ignoring invalid {}={:?}: {}", key, raw, e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = SimConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.model.tick_period, Duration::from_millis(500));
        assert_eq!(config.model.drone_id, "DRONE-001");
    }

    #[test]
    fn reads_all_variables() {
        let config = SimConfig::from_lookup(lookup(&[
            (TICK_MS_VAR, "250"),
            (DRONE_ID_VAR, "DRONE-042"),
            (STRATEGY_VAR, "random-walk"),
            (SEED_VAR, "7"),
            (LOG_DIR_VAR, "/tmp/dronesim"),
        ]));

        assert_eq!(config.model.tick_period, Duration::from_millis(250));
        assert_eq!(config.model.drone_id, "DRONE-042");
        assert_eq!(config.model.strategy, StrategyKind::RandomWalk);
        assert_eq!(config.model.seed, Some(7));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/dronesim")));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = SimConfig::from_lookup(lookup(&[
            (TICK_MS_VAR, "fast"),
            (STRATEGY_VAR, "orbit"),
            (SEED_VAR, "-1"),
            (DRONE_ID_VAR, "   "),
        ]));

        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn parse_collects_warnings() {
        let (config, warnings) = SimConfig::parse(lookup(&[
            (TICK_MS_VAR, "0"),
            (SEED_VAR, "abc"),
            (DRONE_ID_VAR, "DRONE-009"),
        ]));

        assert_eq!(config.model.drone_id, "DRONE-009");
        assert_eq!(config.model.seed, None);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains(TICK_MS_VAR));
        assert!(warnings[1].contains(SEED_VAR));
    }

    #[test]
    fn blank_log_dir_disables_file_logging() {
        let (config, warnings) = SimConfig::parse(lookup(&[(LOG_DIR_VAR, "  ")]));
        assert_eq!(config.log_dir, None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn zero_tick_is_rejected() {
        let config = SimConfig::from_lookup(lookup(&[(TICK_MS_VAR, "0")]));
        assert_eq!(config.model.tick_period, Duration::from_millis(500));
    }
}
