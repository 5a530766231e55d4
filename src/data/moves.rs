use crate::data::type_chart::Element;
use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: Element,
    pub power: u32,
    /// Percent chance to land. Carried for display only; every move hits.
    #[serde(default = "full_accuracy")]
    pub accuracy: u8,
    #[serde(default)]
    pub description: String,
}

fn full_accuracy() -> u8 {
    100
}

/// The global move pool, keyed by id. Ordered so that sampling from it is
/// reproducible under a fixed seed.
#[derive(Clone, Debug, Default)]
pub struct MoveDatabase {
    moves: BTreeMap<String, Arc<MoveData>>,
}

impl MoveDatabase {
    pub fn new() -> Self {
        Self {
            moves: BTreeMap::new(),
        }
    }

    pub fn load_default() -> Result<Self, DataError> {
        const DEFAULT_MOVES_YAML: &str = include_str!("../../data/moves.yaml");
        Self::load_from_yaml_str(DEFAULT_MOVES_YAML)
    }

    pub fn insert(&mut self, move_data: MoveData) -> Result<(), DataError> {
        if move_data.power == 0 {
            return Err(DataError::ZeroPower(move_data.id));
        }
        if move_data.accuracy > 100 {
            return Err(DataError::InvalidAccuracy {
                id: move_data.id,
                accuracy: move_data.accuracy,
            });
        }
        self.moves.insert(move_data.id.clone(), Arc::new(move_data));
        Ok(())
    }

    pub fn get(&self, move_id: &str) -> Option<&Arc<MoveData>> {
        self.moves.get(move_id)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MoveData>> {
        self.moves.values()
    }

    /// Accepts either a map keyed by id or a plain list of moves.
    pub fn load_from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let entries: Vec<MoveData> =
            match serde_yaml::from_str::<HashMap<String, MoveData>>(yaml) {
                Ok(map) => map.into_values().collect(),
                Err(_) => serde_yaml::from_str(yaml).map_err(DataError::MoveCatalog)?,
            };

        let mut db = Self::new();
        for move_data in entries {
            db.insert(move_data)?;
        }
        Ok(db)
    }

    pub fn load_from_yaml_file(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_yaml_str(&content)
    }
}
