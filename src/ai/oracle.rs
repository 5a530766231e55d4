//! Contract for the external decision step that picks the opponent's move.
//!
//! An oracle only ever sees a [`DecisionContext`], an owned copy built from a
//! state snapshot, so it cannot touch the live battle.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::state::{BattleState, Combatant, Side};
use crate::data::type_chart::Element;
use crate::error::OracleError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantView {
    pub name: String,
    pub element: Element,
    pub hp: u32,
    pub max_hp: u32,
}

impl CombatantView {
    fn new(combatant: &Combatant, hp: u32) -> Self {
        Self {
            name: combatant.name.clone(),
            element: combatant.element,
            hp,
            max_hp: combatant.max_hp,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOption {
    pub index: usize,
    pub name: String,
    pub element: Element,
    pub power: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionContext {
    /// The side the oracle is choosing for.
    pub controlled: CombatantView,
    pub foe: CombatantView,
    pub moves: Vec<MoveOption>,
}

impl DecisionContext {
    pub fn for_side(state: &BattleState, side: Side) -> Self {
        let acting = state.combatant(side);
        let moves = acting
            .moves
            .iter()
            .enumerate()
            .map(|(index, m)| MoveOption {
                index,
                name: m.name.clone(),
                element: m.move_type,
                power: m.power,
            })
            .collect();

        Self {
            controlled: CombatantView::new(acting, state.hp(side)),
            foe: CombatantView::new(state.combatant(side.foe()), state.hp(side.foe())),
            moves,
        }
    }
}

/// What an oracle answers. The index is range-checked by the battle, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OracleDecision {
    pub move_index: i64,
    pub commentary: String,
}

impl OracleDecision {
    pub fn new(move_index: i64, commentary: impl Into<String>) -> Self {
        Self {
            move_index,
            commentary: commentary.into(),
        }
    }
}

#[async_trait]
pub trait DecisionOracle: Send + Sync {
    /// One attempt. Failures are not retried; the caller substitutes a move.
    async fn choose_move(&self, context: &DecisionContext) -> Result<OracleDecision, OracleError>;
}
