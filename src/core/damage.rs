use crate::core::state::Combatant;
use crate::core::utils::roll_inclusive;
use crate::data::moves::MoveData;
use crate::data::type_chart::TypeChart;

/// Every combatant fights as if it were this level.
pub const VIRTUAL_LEVEL: f64 = 50.0;
pub const STAB_BONUS: f64 = 1.5;
/// Defense below this is treated as this. Catalog loading already rejects zero.
pub const MIN_DEFENSE: u32 = 1;

const ROLL_MIN: u32 = 85;
const ROLL_MAX: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    pub damage: u32,
    /// Raw type multiplier, without STAB. Drives the narration qualifier.
    pub effectiveness: f32,
}

impl DamageOutcome {
    pub fn qualifier(&self) -> &'static str {
        if self.effectiveness > 1.0 {
            " It's super effective!"
        } else if self.effectiveness < 1.0 {
            " It's not very effective..."
        } else {
            ""
        }
    }
}

pub fn base_damage(attacker: &Combatant, defender: &Combatant, move_data: &MoveData) -> f64 {
    let level_factor = 2.0 * VIRTUAL_LEVEL / 5.0 + 2.0;
    let attack = f64::from(attacker.attack);
    let defense = f64::from(defender.defense.max(MIN_DEFENSE));
    let power = f64::from(move_data.power);
    ((level_factor * power * attack / defense) / 50.0 + 2.0).floor()
}

/// Draws one roll in `85..=100` from `rng` and applies the fixed formula.
pub fn resolve_damage(
    type_chart: &TypeChart,
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    rng: &mut dyn FnMut() -> f64,
) -> DamageOutcome {
    let roll = roll_inclusive(rng, ROLL_MIN, ROLL_MAX);
    damage_with_roll(type_chart, attacker, defender, move_data, roll)
}

/// Same as [`resolve_damage`] with the random roll supplied as a percentage.
pub fn damage_with_roll(
    type_chart: &TypeChart,
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    roll: u32,
) -> DamageOutcome {
    let base = base_damage(attacker, defender, move_data);
    let effectiveness = type_chart.effectiveness(move_data.move_type, defender.element);
    let stab = if attacker.element == move_data.move_type {
        STAB_BONUS
    } else {
        1.0
    };
    let random = f64::from(roll.clamp(ROLL_MIN, ROLL_MAX)) / 100.0;
    let damage = (base * f64::from(effectiveness) * stab * random).floor();

    DamageOutcome {
        damage: damage.max(0.0) as u32,
        effectiveness,
    }
}
