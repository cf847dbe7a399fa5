//! Weighted bubble type catalogue
//!
//! Selection walks an explicit ordered list of (type, cumulative weight)
//! pairs, so the draw never depends on a container's iteration order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::renderer::Color;

/// Tolerance when checking that probabilities sum to 1.0
const PROBABILITY_EPSILON: f64 = 1e-6;

/// Bubble categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleKind {
    Normal,
    Double,
    Triple,
    Bomb,
    PowerUp,
}

impl BubbleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BubbleKind::Normal => "normal",
            BubbleKind::Double => "double",
            BubbleKind::Triple => "triple",
            BubbleKind::Bomb => "bomb",
            BubbleKind::PowerUp => "powerup",
        }
    }
}

/// What a pop of this type does beyond scoring its points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopRole {
    /// Chain explosion around the bubble
    Bomb,
    /// Activates a random power-up
    PowerUp,
    /// Negative, non-bomb: resets combo
    Hazard,
    /// Builds combo and drives level-ups
    Scoring,
}

/// One entry of the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleTypeDef {
    pub kind: BubbleKind,
    /// Base points (negative for penalty bubbles)
    pub points: i64,
    /// Spawn probability (0..1)
    pub probability: f64,
    #[serde(default)]
    pub negative: bool,
    #[serde(default)]
    pub power_up: bool,
    /// Sparkle colour
    pub color: Color,
    /// Glyph drawn on the bubble
    pub glyph: String,
    /// Tooltip text
    #[serde(default)]
    pub description: String,
}

impl BubbleTypeDef {
    pub fn role(&self) -> PopRole {
        if self.kind == BubbleKind::Bomb {
            PopRole::Bomb
        } else if self.power_up {
            PopRole::PowerUp
        } else if self.negative {
            PopRole::Hazard
        } else {
            PopRole::Scoring
        }
    }
}

/// The stock catalogue, in selection order
pub fn default_bubble_types() -> Vec<BubbleTypeDef> {
    vec![
        BubbleTypeDef {
            kind: BubbleKind::Normal,
            points: 10,
            probability: 0.40,
            negative: false,
            power_up: false,
            color: Color(0x0096ff),
            glyph: "●".into(),
            description: "Normal Bubble\n10 pts | Builds combo".into(),
        },
        BubbleTypeDef {
            kind: BubbleKind::Double,
            points: 20,
            probability: 0.30,
            negative: false,
            power_up: false,
            color: Color(0x00ff64),
            glyph: "◆".into(),
            description: "Double Points\n20 pts | 2x value".into(),
        },
        BubbleTypeDef {
            kind: BubbleKind::Triple,
            points: 50,
            probability: 0.15,
            negative: false,
            power_up: false,
            color: Color(0xffd700),
            glyph: "★".into(),
            description: "Triple Points\n50 pts | 3x value".into(),
        },
        BubbleTypeDef {
            kind: BubbleKind::Bomb,
            points: -30,
            probability: 0.10,
            negative: true,
            power_up: false,
            color: Color(0xff0000),
            glyph: "💣".into(),
            description: "Bomb Bubble\n-30 pts | Chain reaction".into(),
        },
        BubbleTypeDef {
            kind: BubbleKind::PowerUp,
            points: 100,
            probability: 0.05,
            negative: false,
            power_up: true,
            color: Color(0x00ff88),
            glyph: "⚡".into(),
            description: "Power-up\n100 pts | Special ability".into(),
        },
    ]
}

/// Ordered catalogue with precomputed cumulative weights
#[derive(Debug, Clone)]
pub struct BubbleTypeTable {
    entries: Vec<(BubbleTypeDef, f64)>,
    default_index: usize,
}

impl BubbleTypeTable {
    /// Build the table. A malformed table is accepted with a warning: draws
    /// past the last cumulative weight land on `default_kind`.
    pub fn new(defs: Vec<BubbleTypeDef>, default_kind: BubbleKind) -> Self {
        let defs = if defs.is_empty() {
            log::warn!("Empty bubble type table, using stock catalogue");
            default_bubble_types()
        } else {
            defs
        };

        let mut cumulative = 0.0;
        let entries: Vec<(BubbleTypeDef, f64)> = defs
            .into_iter()
            .map(|def| {
                if !(0.0..=1.0).contains(&def.probability) {
                    log::warn!(
                        "Bubble type {} has out-of-range probability {}",
                        def.kind.as_str(),
                        def.probability
                    );
                }
                cumulative += def.probability.max(0.0);
                (def, cumulative)
            })
            .collect();

        if (cumulative - 1.0).abs() > PROBABILITY_EPSILON {
            log::warn!(
                "Bubble probabilities sum to {cumulative}, not 1.0; falling back to {} past the end",
                default_kind.as_str()
            );
        }

        let default_index = match entries.iter().position(|(d, _)| d.kind == default_kind) {
            Some(i) => i,
            None => {
                log::warn!(
                    "Default bubble type {} missing from table, using {}",
                    default_kind.as_str(),
                    entries[0].0.kind.as_str()
                );
                0
            }
        };

        Self {
            entries,
            default_index,
        }
    }

    /// Draw a type using the supplied RNG
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &BubbleTypeDef {
        self.pick_with(rng.random::<f64>())
    }

    /// First entry whose cumulative weight reaches `r`, or the default type
    /// when rounding leaves `r` past the final cumulative weight.
    pub fn pick_with(&self, r: f64) -> &BubbleTypeDef {
        self.entries
            .iter()
            .find(|(_, cumulative)| *cumulative >= r)
            .map(|(def, _)| def)
            .unwrap_or_else(|| self.default_type())
    }

    /// Look up a type, falling back to the default type if absent
    pub fn get(&self, kind: BubbleKind) -> &BubbleTypeDef {
        self.entries
            .iter()
            .find(|(d, _)| d.kind == kind)
            .map(|(d, _)| d)
            .unwrap_or_else(|| self.default_type())
    }

    pub fn default_type(&self) -> &BubbleTypeDef {
        &self.entries[self.default_index].0
    }

    /// Sum of all probabilities
    pub fn total_weight(&self) -> f64 {
        self.entries.last().map(|(_, c)| *c).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BubbleTypeDef> {
        self.entries.iter().map(|(d, _)| d)
    }
}

impl Default for BubbleTypeTable {
    fn default() -> Self {
        Self::new(default_bubble_types(), BubbleKind::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_stock_table_sums_to_one() {
        let table = BubbleTypeTable::default();
        assert!((table.total_weight() - 1.0).abs() < PROBABILITY_EPSILON);
    }

    #[test]
    fn test_pick_boundaries() {
        let table = BubbleTypeTable::default();
        assert_eq!(table.pick_with(0.0).kind, BubbleKind::Normal);
        assert_eq!(table.pick_with(0.40).kind, BubbleKind::Normal);
        assert_eq!(table.pick_with(0.41).kind, BubbleKind::Double);
        assert_eq!(table.pick_with(0.80).kind, BubbleKind::Triple);
        assert_eq!(table.pick_with(0.90).kind, BubbleKind::Bomb);
        assert_eq!(table.pick_with(0.99).kind, BubbleKind::PowerUp);
    }

    #[test]
    fn test_malformed_table_falls_back_to_default() {
        // Sums to 0.9: draws in (0.9, 1.0) match nothing
        let mut defs = default_bubble_types();
        defs[1].probability = 0.2;
        let table = BubbleTypeTable::new(defs, BubbleKind::Triple);

        assert!((table.total_weight() - 0.9).abs() < PROBABILITY_EPSILON);
        assert_eq!(table.pick_with(0.95).kind, BubbleKind::Triple);
        assert_eq!(table.pick_with(0.999_999).kind, BubbleKind::Triple);
        // In-range draws are unaffected
        assert_eq!(table.pick_with(0.1).kind, BubbleKind::Normal);
    }

    #[test]
    fn test_missing_default_uses_first_entry() {
        let defs: Vec<_> = default_bubble_types()
            .into_iter()
            .filter(|d| d.kind != BubbleKind::Normal)
            .collect();
        let table = BubbleTypeTable::new(defs, BubbleKind::Normal);
        assert_eq!(table.default_type().kind, BubbleKind::Double);
        assert_eq!(table.get(BubbleKind::Normal).kind, BubbleKind::Double);
    }

    #[test]
    fn test_roles() {
        let table = BubbleTypeTable::default();
        assert_eq!(table.get(BubbleKind::Normal).role(), PopRole::Scoring);
        assert_eq!(table.get(BubbleKind::Triple).role(), PopRole::Scoring);
        assert_eq!(table.get(BubbleKind::Bomb).role(), PopRole::Bomb);
        assert_eq!(table.get(BubbleKind::PowerUp).role(), PopRole::PowerUp);

        let mut hazard = table.get(BubbleKind::Double).clone();
        hazard.negative = true;
        assert_eq!(hazard.role(), PopRole::Hazard);
    }

    #[test]
    fn test_weighted_distribution() {
        let table = BubbleTypeTable::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let samples = 100_000;

        let mut counts: HashMap<BubbleKind, u32> = HashMap::new();
        for _ in 0..samples {
            *counts.entry(table.pick(&mut rng).kind).or_default() += 1;
        }

        let expected = [
            (BubbleKind::Normal, 0.40),
            (BubbleKind::Double, 0.30),
            (BubbleKind::Triple, 0.15),
            (BubbleKind::Bomb, 0.10),
            (BubbleKind::PowerUp, 0.05),
        ];
        for (kind, p) in expected {
            let observed = counts.get(&kind).copied().unwrap_or(0) as f64 / samples as f64;
            assert!(
                (observed - p).abs() < 0.01,
                "{}: observed {observed}, expected {p}",
                kind.as_str()
            );
        }
    }

    proptest! {
        #[test]
        fn prop_pick_is_total(r in 0.0f64..1.0, scale in 0.5f64..1.0) {
            let mut defs = default_bubble_types();
            for d in &mut defs {
                d.probability *= scale;
            }
            let table = BubbleTypeTable::new(defs, BubbleKind::Normal);
            let kind = table.pick_with(r).kind;
            prop_assert!(table.iter().any(|d| d.kind == kind));
        }
    }
}
