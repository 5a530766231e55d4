use crate::ai::oracle::{DecisionContext, OracleDecision};
use crate::core::damage::{resolve_damage, DamageOutcome};
use crate::core::factory::{create_battle_state, MOVESET_SIZE};
use crate::core::state::{BattleState, Phase, Side};
use crate::core::utils::pick_index;
use crate::data::moves::MoveData;
use crate::data::type_chart::TypeChart;
use crate::data::Catalog;
use crate::error::{DataError, OracleError};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const THINKING_LINE: &str = "Opponent is thinking...";
pub const HESITATION_LINE: &str = "The opponent hesitated!";
pub const OUT_OF_RANGE_COMMENTARY: &str = "...";

/// Why the opponent's move was not the oracle's own pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// The oracle answered with an index outside the moveset; the first move was used.
    OutOfRange(i64),
    /// The oracle failed or timed out; a random move was used.
    OracleFailed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub attacker: Side,
    pub move_index: usize,
    pub move_name: String,
    pub damage: u32,
    pub effectiveness: f32,
    /// Defender's health after the hit.
    pub defender_hp: u32,
    pub winner: Option<Side>,
    pub fallback: Option<Fallback>,
}

/// Ticket for an opened opponent decision window. Only the battle of the same
/// generation accepts it back.
#[derive(Clone, Debug)]
pub struct OpponentTurn {
    generation: u64,
    context: DecisionContext,
}

impl OpponentTurn {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn context(&self) -> &DecisionContext {
        &self.context
    }
}

/// The canonical battle state plus the rules for moving it between phases.
///
/// Every action method is a silent no-op (returns `None`) when called in the
/// wrong phase, including after the battle has ended.
#[derive(Clone, Debug)]
pub struct Battle {
    state: BattleState,
    type_chart: TypeChart,
    generation: u64,
}

impl Battle {
    pub fn new(state: BattleState, generation: u64) -> Self {
        Self {
            state,
            type_chart: TypeChart::new(),
            generation,
        }
    }

    pub fn start(catalog: &Catalog, rng: &mut dyn FnMut() -> f64, generation: u64) -> Result<Self, DataError> {
        let state = create_battle_state(catalog, rng)?;
        info!(
            generation,
            player = %state.player.name,
            opponent = %state.opponent.name,
            "battle started"
        );
        Ok(Self::new(state, generation))
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn submit_player_move(&mut self, move_index: usize, rng: &mut dyn FnMut() -> f64) -> Option<TurnReport> {
        if self.state.phase != Phase::AwaitingPlayerAction {
            debug!(phase = ?self.state.phase, "player move ignored");
            return None;
        }
        let move_data = self.state.player.move_at(move_index)?.clone();
        self.state.phase = Phase::Resolving(Side::Player);
        Some(self.strike(Side::Player, move_index, move_data, None, rng))
    }

    /// Opens the opponent's decision window and returns what the oracle may see.
    pub fn begin_opponent_turn(&mut self) -> Option<OpponentTurn> {
        if self.state.phase != Phase::AwaitingOpponentAction {
            return None;
        }
        self.state.phase = Phase::Resolving(Side::Opponent);
        self.state.log.push(THINKING_LINE.to_string());
        Some(OpponentTurn {
            generation: self.generation,
            context: DecisionContext::for_side(&self.state, Side::Opponent),
        })
    }

    /// Applies the oracle's answer, or its fallback, for an opened window.
    pub fn complete_opponent_turn(
        &mut self,
        turn: OpponentTurn,
        outcome: Result<OracleDecision, OracleError>,
        rng: &mut dyn FnMut() -> f64,
    ) -> Option<TurnReport> {
        if turn.generation != self.generation {
            debug!(
                stale = turn.generation,
                current = self.generation,
                "discarding decision from a previous battle"
            );
            return None;
        }
        if self.state.phase != Phase::Resolving(Side::Opponent) {
            return None;
        }

        let (move_index, commentary, fallback) = match outcome {
            Ok(decision) => match usize::try_from(decision.move_index)
                .ok()
                .filter(|&idx| idx < MOVESET_SIZE)
            {
                Some(idx) => (idx, decision.commentary, None),
                None => {
                    warn!(index = decision.move_index, "oracle chose an unknown move; using the first");
                    (
                        0,
                        OUT_OF_RANGE_COMMENTARY.to_string(),
                        Some(Fallback::OutOfRange(decision.move_index)),
                    )
                }
            },
            Err(err) => {
                warn!(error = %err, "oracle failed; picking a random move");
                self.state.log.push(HESITATION_LINE.to_string());
                (
                    pick_index(rng, MOVESET_SIZE),
                    format!("{} attacks wildly!", self.state.opponent.name),
                    Some(Fallback::OracleFailed),
                )
            }
        };

        if !commentary.is_empty() {
            self.state.log.push(format!("Trainer: \"{}\"", commentary));
        }
        let move_data = self.state.opponent.moves[move_index].clone();
        Some(self.strike(Side::Opponent, move_index, move_data, fallback, rng))
    }

    fn strike(
        &mut self,
        attacker: Side,
        move_index: usize,
        move_data: Arc<MoveData>,
        fallback: Option<Fallback>,
        rng: &mut dyn FnMut() -> f64,
    ) -> TurnReport {
        let defender = attacker.foe();
        self.state.log.push(format!(
            "{} used {}!",
            self.state.combatant(attacker).name,
            move_data.name
        ));

        let outcome: DamageOutcome = resolve_damage(
            &self.type_chart,
            self.state.combatant(attacker),
            self.state.combatant(defender),
            &move_data,
            rng,
        );
        let hp = self.state.hp_mut(defender);
        *hp = hp.saturating_sub(outcome.damage);
        let defender_hp = *hp;
        self.state
            .log
            .push(format!("Dealt {} damage!{}", outcome.damage, outcome.qualifier()));

        debug!(
            %attacker,
            attack = %move_data.name,
            damage = outcome.damage,
            effectiveness = outcome.effectiveness,
            defender_hp,
            "attack resolved"
        );

        let winner = if defender_hp == 0 {
            self.state.phase = Phase::Terminal(attacker);
            let line = match attacker {
                Side::Player => format!("{} fainted! You won!", self.state.opponent.name),
                Side::Opponent => format!("{} fainted! You lost...", self.state.player.name),
            };
            self.state.log.push(line);
            info!(generation = self.generation, winner = %attacker, "battle over");
            Some(attacker)
        } else {
            self.state.phase = Phase::awaiting(defender);
            None
        };

        TurnReport {
            attacker,
            move_index,
            move_name: move_data.name.clone(),
            damage: outcome.damage,
            effectiveness: outcome.effectiveness,
            defender_hp,
            winner,
            fallback,
        }
    }
}
