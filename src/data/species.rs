use crate::data::type_chart::Element;
use crate::error::DataError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesData {
    pub id: String,
    pub name: String,
    pub element: Element,
    pub base_stats: BaseStats,
    /// Predefined moveset, used when this species is the opponent.
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub front_image: String,
    #[serde(default)]
    pub back_image: String,
}

impl SpeciesData {
    fn check_stats(&self) -> Result<(), DataError> {
        let stats = &self.base_stats;
        for (stat, value) in [
            ("hp", stats.hp),
            ("attack", stats.attack),
            ("defense", stats.defense),
            ("speed", stats.speed),
        ] {
            if value == 0 {
                return Err(DataError::ZeroStat {
                    species: self.id.clone(),
                    stat,
                });
            }
        }
        Ok(())
    }
}

/// Ordered roster. The last entry is the player's species; every earlier
/// entry can be drawn as an opponent.
#[derive(Clone, Debug, Default)]
pub struct SpeciesDatabase {
    species: Vec<SpeciesData>,
}

impl SpeciesDatabase {
    pub fn new() -> Self {
        Self {
            species: Vec::new(),
        }
    }

    pub fn insert(&mut self, data: SpeciesData) -> Result<(), DataError> {
        data.check_stats()?;
        match self.species.iter().position(|s| s.id == data.id) {
            Some(idx) => self.species[idx] = data,
            None => self.species.push(data),
        }
        Ok(())
    }

    pub fn get(&self, species_id: &str) -> Option<&SpeciesData> {
        self.species.iter().find(|s| s.id == species_id)
    }

    pub fn roster(&self) -> &[SpeciesData] {
        &self.species
    }

    pub fn player_species(&self) -> Option<&SpeciesData> {
        self.species.last()
    }

    pub fn opponent_candidates(&self) -> &[SpeciesData] {
        match self.species.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn load_from_json_str(json: &str) -> Result<Self, DataError> {
        let list: Vec<SpeciesData> = serde_json::from_str(json).map_err(DataError::Roster)?;
        let mut db = Self::new();
        for data in list {
            db.insert(data)?;
        }
        Ok(db)
    }

    pub fn load_default() -> Result<Self, DataError> {
        const DEFAULT_SPECIES_JSON: &str = include_str!("../../data/species.json");
        Self::load_from_json_str(DEFAULT_SPECIES_JSON)
    }
}
