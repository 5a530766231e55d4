use crate::core::factory::MOVESET_SIZE;
use crate::data::moves::MoveData;
use crate::data::type_chart::Element;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn foe(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

/// Where the battle stands. Whose turn it is and whether a turn is in flight
/// are both read off this one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "side")]
pub enum Phase {
    AwaitingPlayerAction,
    AwaitingOpponentAction,
    /// The side's action has been declared and is not yet applied.
    Resolving(Side),
    /// Absorbing. Carries the winner.
    Terminal(Side),
}

impl Phase {
    pub fn awaiting(side: Side) -> Phase {
        match side {
            Side::Player => Phase::AwaitingPlayerAction,
            Side::Opponent => Phase::AwaitingOpponentAction,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Terminal(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub species_id: String,
    pub name: String,
    pub element: Element,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Not consulted: turns strictly alternate.
    pub speed: u32,
    pub moves: [Arc<MoveData>; MOVESET_SIZE],
}

impl Combatant {
    pub fn move_at(&self, index: usize) -> Option<&Arc<MoveData>> {
        self.moves.get(index)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub player: Combatant,
    pub player_hp: u32,
    pub opponent: Combatant,
    pub opponent_hp: u32,
    pub phase: Phase,
    pub log: Vec<String>,
}

impl BattleState {
    pub fn new(player: Combatant, opponent: Combatant) -> Self {
        let log = vec![
            format!("Wild {} appeared!", opponent.name),
            format!("Go! {}!", player.name),
        ];
        Self {
            player_hp: player.max_hp,
            opponent_hp: opponent.max_hp,
            player,
            opponent,
            phase: Phase::AwaitingPlayerAction,
            log,
        }
    }

    /// The side that acts (or last acted, once the battle is over).
    pub fn turn(&self) -> Side {
        match self.phase {
            Phase::AwaitingPlayerAction => Side::Player,
            Phase::AwaitingOpponentAction => Side::Opponent,
            Phase::Resolving(side) | Phase::Terminal(side) => side,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::Terminal(side) => Some(side),
            _ => None,
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn hp(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_hp,
            Side::Opponent => self.opponent_hp,
        }
    }

    pub(crate) fn hp_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Player => &mut self.player_hp,
            Side::Opponent => &mut self.opponent_hp,
        }
    }
}
