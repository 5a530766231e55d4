use crate::core::state::{BattleState, Combatant};
use crate::core::utils::pick_index;
use crate::data::moves::{MoveData, MoveDatabase};
use crate::data::species::SpeciesData;
use crate::data::Catalog;
use crate::error::DataError;
use std::sync::Arc;

pub const MOVESET_SIZE: usize = 4;

pub type Moveset = [Arc<MoveData>; MOVESET_SIZE];

pub fn create_combatant(species: &SpeciesData, moves: Moveset) -> Combatant {
    let stats = &species.base_stats;
    Combatant {
        species_id: species.id.clone(),
        name: species.name.clone(),
        element: species.element,
        max_hp: stats.hp,
        attack: stats.attack,
        defense: stats.defense,
        speed: stats.speed,
        moves,
    }
}

/// Resolves a species' predefined moveset against the pool.
pub fn species_moves(species: &SpeciesData, move_db: &MoveDatabase) -> Result<Moveset, DataError> {
    let resolved = species
        .moves
        .iter()
        .map(|id| {
            move_db.get(id).cloned().ok_or_else(|| DataError::UnknownMove {
                species: species.id.clone(),
                move_id: id.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    into_moveset(&species.id, resolved)
}

/// Draws `MOVESET_SIZE` distinct moves uniformly from the whole pool.
pub fn sample_moves(move_db: &MoveDatabase, rng: &mut dyn FnMut() -> f64) -> Result<Vec<Arc<MoveData>>, DataError> {
    let mut pool: Vec<Arc<MoveData>> = move_db.iter().cloned().collect();
    if pool.len() < MOVESET_SIZE {
        return Err(DataError::MovePoolTooSmall {
            needed: MOVESET_SIZE,
            found: pool.len(),
        });
    }
    // Partial Fisher-Yates: the first MOVESET_SIZE slots end up a uniform sample.
    for i in 0..MOVESET_SIZE {
        let j = i + pick_index(rng, pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(MOVESET_SIZE);
    Ok(pool)
}

fn into_moveset(species_id: &str, moves: Vec<Arc<MoveData>>) -> Result<Moveset, DataError> {
    let found = moves.len();
    moves.try_into().map_err(|_| DataError::MovesetSize {
        species: species_id.to_string(),
        expected: MOVESET_SIZE,
        found,
    })
}

/// Builds a fresh battle: the last roster species with a sampled moveset
/// against a random earlier species with its own moves.
pub fn create_battle_state(catalog: &Catalog, rng: &mut dyn FnMut() -> f64) -> Result<BattleState, DataError> {
    let roster = catalog.species.roster();
    let (player_species, candidates) = match catalog.species.player_species() {
        Some(player) if roster.len() >= 2 => (player, catalog.species.opponent_candidates()),
        _ => return Err(DataError::RosterTooSmall(roster.len())),
    };

    let player_moves = into_moveset(&player_species.id, sample_moves(&catalog.moves, rng)?)?;
    let player = create_combatant(player_species, player_moves);

    let opponent_species = &candidates[pick_index(rng, candidates.len())];
    let opponent = create_combatant(
        opponent_species,
        species_moves(opponent_species, &catalog.moves)?,
    );

    Ok(BattleState::new(player, opponent))
}
