//! Error types for catalog loading, oracle calls and configuration.
//!
//! None of these ever interrupt a battle in progress: data errors surface when a
//! battle is built, oracle errors are folded into the opponent fallback.
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse move catalog")]
    MoveCatalog(#[source] serde_yaml::Error),

    #[error("failed to parse species roster")]
    Roster(#[source] serde_json::Error),

    #[error("move '{0}' must have positive power")]
    ZeroPower(String),

    #[error("move '{id}' has accuracy {accuracy}, expected 0..=100")]
    InvalidAccuracy { id: String, accuracy: u8 },

    #[error("species '{species}' has a {stat} stat of zero")]
    ZeroStat { species: String, stat: &'static str },

    #[error("species '{species}' references unknown move '{move_id}'")]
    UnknownMove { species: String, move_id: String },

    #[error("species '{species}' must list exactly {expected} moves, found {found}")]
    MovesetSize {
        species: String,
        expected: usize,
        found: usize,
    },

    #[error("roster needs at least two species, found {0}")]
    RosterTooSmall(usize),

    #[error("move pool needs at least {needed} moves, found {found}")]
    MovePoolTooSmall { needed: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle did not answer within {0:?}")]
    Timeout(Duration),

    #[error("oracle request failed")]
    Transport(#[from] reqwest::Error),

    #[error("oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle reported an error: {0}")]
    Api(String),

    #[error("oracle returned no candidates")]
    EmptyResponse,

    #[error("malformed oracle response")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
