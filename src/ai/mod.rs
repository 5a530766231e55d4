pub mod oracle;
pub mod simple;

pub use oracle::{CombatantView, DecisionContext, DecisionOracle, MoveOption, OracleDecision};
pub use simple::{choose_highest_power, HighestPowerOracle, RandomOracle};
