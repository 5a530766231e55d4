pub mod ai;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod tools;

pub use crate::ai::{choose_highest_power, DecisionContext, DecisionOracle, HighestPowerOracle, OracleDecision, RandomOracle};
pub use crate::config::{BattleConfig, GeminiConfig};
pub use crate::core::{
    battle::{Battle, Fallback, OpponentTurn, TurnReport},
    cues::{Cue, CueSink, SilentCues, TerminalBell, TracingCues},
    damage::{resolve_damage, DamageOutcome},
    factory::{create_battle_state, MOVESET_SIZE},
    session::BattleSession,
    state::{BattleState, Combatant, Phase, Side},
};
pub use crate::data::{
    moves::{MoveData, MoveDatabase},
    species::{BaseStats, SpeciesData, SpeciesDatabase},
    type_chart::{Element, TypeChart},
    Catalog,
};
pub use crate::error::{ConfigError, DataError, OracleError};
pub use crate::tools::gemini::{GeminiClient, GeminiOracle};
