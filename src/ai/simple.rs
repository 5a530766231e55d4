use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ai::oracle::{DecisionContext, DecisionOracle, OracleDecision};
use crate::core::damage::STAB_BONUS;
use crate::data::type_chart::TypeChart;
use crate::error::OracleError;

/// Index of the move with the best power × effectiveness × STAB against the
/// foe. Ties keep the lowest index.
pub fn choose_highest_power(context: &DecisionContext, type_chart: &TypeChart) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for option in &context.moves {
        let effectiveness = f64::from(type_chart.effectiveness(option.element, context.foe.element));
        let stab = if option.element == context.controlled.element {
            STAB_BONUS
        } else {
            1.0
        };
        let score = f64::from(option.power) * effectiveness * stab;
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((option.index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// Local stand-in for a remote oracle: always plays its strongest hit.
#[derive(Clone, Debug, Default)]
pub struct HighestPowerOracle {
    type_chart: TypeChart,
}

impl HighestPowerOracle {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DecisionOracle for HighestPowerOracle {
    async fn choose_move(&self, context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        let index = choose_highest_power(context, &self.type_chart)
            .ok_or_else(|| OracleError::Unavailable("no moves to choose from".to_string()))?;
        let name = &context.moves[index].name;
        Ok(OracleDecision::new(
            index as i64,
            format!("{}, use {}!", context.controlled.name, name),
        ))
    }
}

/// Uniform pick. Seed it with the session seed for reproducible battles.
#[derive(Debug)]
pub struct RandomOracle {
    rng: Mutex<StdRng>,
}

impl RandomOracle {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng: Mutex::new(rng) }
    }
}

impl Default for RandomOracle {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl DecisionOracle for RandomOracle {
    async fn choose_move(&self, context: &DecisionContext) -> Result<OracleDecision, OracleError> {
        if context.moves.is_empty() {
            return Err(OracleError::Unavailable("no moves to choose from".to_string()));
        }
        let index = self
            .rng
            .lock()
            .map_err(|_| OracleError::Unavailable("random oracle poisoned".to_string()))?
            .gen_range(0..context.moves.len());
        Ok(OracleDecision::new(index as i64, String::new()))
    }
}
