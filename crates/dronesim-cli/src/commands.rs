//! Interactive console commands.

use dronesim_core::{SimError, StrategyKind};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  start              start the simulation
  stop               stop the simulation
  toggle             start if stopped, stop if running
  fail               toggle failure simulation
  strategy <name>    switch movement strategy (hover, random-walk)
  status             print current telemetry
  help               show this help
  quit               exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    Fail,
    Strategy(StrategyKind),
    Status,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: strategy <hover|random-walk>")]
    MissingStrategy,
    #[error("{0}")]
    BadStrategy(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(ParseCommandError::Empty);
        };

        match verb.to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "toggle" => Ok(Command::Toggle),
            "fail" | "failure" => Ok(Command::Fail),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "strategy" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingStrategy);
                }
                rest.join(" ")
                    .parse::<StrategyKind>()
                    .map(Command::Strategy)
                    .map_err(|e: SimError| ParseCommandError::BadStrategy(e.to_string()))
            }
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}
