use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Grass,
    Electric,
    Normal,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Water,
        Element::Grass,
        Element::Electric,
        Element::Normal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Grass => "grass",
            Element::Electric => "electric",
            Element::Normal => "normal",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SUPER_EFFECTIVE: f32 = 2.0;
pub const NOT_VERY_EFFECTIVE: f32 = 0.5;
pub const NEUTRAL: f32 = 1.0;

/// Attacking-type against defending-type multipliers. Pairs missing from the
/// table are neutral.
#[derive(Clone, Debug)]
pub struct TypeChart {
    chart: HashMap<(Element, Element), f32>,
}

impl TypeChart {
    pub fn new() -> Self {
        let mut chart = HashMap::new();
        let mut add_entry = |attacking: Element, super_effective: &[Element], resisted_by: &[Element]| {
            for &defending in super_effective {
                chart.insert((attacking, defending), SUPER_EFFECTIVE);
            }
            for &defending in resisted_by {
                chart.insert((attacking, defending), NOT_VERY_EFFECTIVE);
            }
        };

        use Element::*;
        add_entry(Fire, &[Grass], &[Fire, Water]);
        add_entry(Water, &[Fire], &[Water, Grass]);
        add_entry(Grass, &[Water], &[Grass, Fire]);
        add_entry(Electric, &[Water], &[Electric, Grass]);

        Self { chart }
    }

    pub fn effectiveness(&self, move_type: Element, target_type: Element) -> f32 {
        self.chart
            .get(&(move_type, target_type))
            .copied()
            .unwrap_or(NEUTRAL)
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_triangle() {
        let chart = TypeChart::new();
        assert_eq!(chart.effectiveness(Element::Water, Element::Fire), 2.0);
        assert_eq!(chart.effectiveness(Element::Fire, Element::Grass), 2.0);
        assert_eq!(chart.effectiveness(Element::Grass, Element::Water), 2.0);
        assert_eq!(chart.effectiveness(Element::Fire, Element::Water), 0.5);
        assert_eq!(chart.effectiveness(Element::Electric, Element::Water), 2.0);
    }

    #[test]
    fn full_table() {
        use Element::*;
        let chart = TypeChart::new();
        let non_neutral = [
            (Fire, Grass, 2.0),
            (Water, Fire, 2.0),
            (Grass, Water, 2.0),
            (Electric, Water, 2.0),
            (Fire, Fire, 0.5),
            (Fire, Water, 0.5),
            (Water, Water, 0.5),
            (Water, Grass, 0.5),
            (Grass, Grass, 0.5),
            (Grass, Fire, 0.5),
            (Electric, Electric, 0.5),
            (Electric, Grass, 0.5),
        ];
        for attacking in Element::ALL {
            for defending in Element::ALL {
                let expected = non_neutral
                    .iter()
                    .find(|(a, d, _)| *a == attacking && *d == defending)
                    .map_or(NEUTRAL, |&(_, _, m)| m);
                assert_eq!(chart.effectiveness(attacking, defending), expected, "{attacking} -> {defending}");
            }
        }
    }

    #[test]
    fn normal_is_always_neutral() {
        let chart = TypeChart::new();
        for other in Element::ALL {
            assert_eq!(chart.effectiveness(Element::Normal, other), 1.0);
            assert_eq!(chart.effectiveness(other, Element::Normal), 1.0);
        }
    }

    #[test]
    fn lookup_is_total() {
        let chart = TypeChart::new();
        for attacking in Element::ALL {
            for defending in Element::ALL {
                let m = chart.effectiveness(attacking, defending);
                assert!([SUPER_EFFECTIVE, NOT_VERY_EFFECTIVE, NEUTRAL].contains(&m));
            }
        }
    }

    #[test]
    fn elements_serialize_lowercase() {
        let json = serde_json::to_string(&Element::Electric).unwrap();
        assert_eq!(json, "\"electric\"");
    }
}
