pub mod moves;
pub mod species;
pub mod type_chart;

use crate::core::factory::MOVESET_SIZE;
use crate::error::DataError;
use moves::MoveDatabase;
use species::SpeciesDatabase;

/// Read-only input to battle construction: the move pool plus the roster.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub moves: MoveDatabase,
    pub species: SpeciesDatabase,
}

impl Catalog {
    pub fn new(moves: MoveDatabase, species: SpeciesDatabase) -> Result<Self, DataError> {
        let catalog = Self { moves, species };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_default() -> Result<Self, DataError> {
        Self::new(MoveDatabase::load_default()?, SpeciesDatabase::load_default()?)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let roster = self.species.roster();
        if roster.len() < 2 {
            return Err(DataError::RosterTooSmall(roster.len()));
        }
        if self.moves.len() < MOVESET_SIZE {
            return Err(DataError::MovePoolTooSmall {
                needed: MOVESET_SIZE,
                found: self.moves.len(),
            });
        }
        for species in roster {
            if species.moves.len() != MOVESET_SIZE {
                return Err(DataError::MovesetSize {
                    species: species.id.clone(),
                    expected: MOVESET_SIZE,
                    found: species.moves.len(),
                });
            }
            if let Some(unknown) = species.moves.iter().find(|id| self.moves.get(id).is_none()) {
                return Err(DataError::UnknownMove {
                    species: species.id.clone(),
                    move_id: unknown.clone(),
                });
            }
        }
        Ok(())
    }
}
