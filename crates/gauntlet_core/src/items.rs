//! Item definitions, rolled instances and the item-rolling port.
//!
//! The reward granter only sees [`ItemRoller`]. [`TableItemRoller`] is the
//! stock implementation: uniform definition pick, rarity-driven affix count,
//! and per-affix value ranges from [`ROLLABLE_AFFIXES`].

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::stats::{Modifier, ModifierKind, ModifierSource, StatType};

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// No rolled affixes.
    Normal,
    /// One or two rolled affixes.
    Magic,
    /// Three to five rolled affixes.
    Rare,
    /// Hand-authored; one rolled affix.
    Unique,
}

impl Rarity {
    /// Inclusive-exclusive range for the number of rolled affixes.
    #[must_use]
    pub const fn affix_range(self) -> (i32, i32) {
        match self {
            Rarity::Normal => (0, 0),
            Rarity::Magic => (1, 3),
            Rarity::Rare => (3, 6),
            Rarity::Unique => (1, 1),
        }
    }
}

/// Slot an item occupies when equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentSlot {
    /// Head.
    Helmet,
    /// Chest.
    BodyArmor,
    /// Hands.
    Gloves,
    /// Feet.
    Boots,
    /// Neck.
    Amulet,
    /// Waist.
    Belt,
    /// Finger.
    Ring,
    /// Weapon hand.
    MainHand,
    /// Shield hand.
    OffHand,
}

/// Authored item base.
///
/// # Example RON
///
/// ```ron
/// ItemDefinition(
///     id: "rusty_sword",
///     name: "Rusty Sword",
///     rarity: Normal,
///     slot: MainHand,
///     implicit_modifiers: [
///         (stat: PhysicalDamage, kind: Flat, value: 5.0),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rarity, which drives the rolled affix count.
    pub rarity: Rarity,
    /// Equipment slot.
    pub slot: EquipmentSlot,
    /// Modifiers every instance carries.
    #[serde(default)]
    pub implicit_modifiers: Vec<Modifier>,
}

/// A concrete dropped item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Unique id within one roller.
    pub uid: u64,
    /// The base this instance was rolled from.
    pub definition: ItemDefinition,
    /// Affixes rolled on drop.
    pub rolled_modifiers: Vec<Modifier>,
}

impl ItemInstance {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Rarity of the base.
    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.definition.rarity
    }

    /// Source tag under which this item's modifiers are applied.
    #[must_use]
    pub fn source(&self) -> ModifierSource {
        ModifierSource::new(format!("item:{}", self.uid))
    }

    /// Implicit then rolled modifiers.
    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> {
        self.definition
            .implicit_modifiers
            .iter()
            .chain(self.rolled_modifiers.iter())
    }
}

/// Produces random loot. Returns `None` when there is nothing to roll.
pub trait ItemRoller {
    /// Roll one item.
    fn roll_item(&mut self, rng: &mut dyn RandomSource) -> Option<ItemInstance>;
}

/// A stat that can appear as a rolled affix, with its value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffixRange {
    /// Stat affected.
    pub stat: StatType,
    /// Combination rule.
    pub kind: ModifierKind,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

/// Affix pool for [`TableItemRoller`].
pub const ROLLABLE_AFFIXES: [AffixRange; 7] = [
    AffixRange {
        stat: StatType::MaxHealth,
        kind: ModifierKind::Flat,
        min: 5.0,
        max: 50.0,
    },
    AffixRange {
        stat: StatType::PhysicalDamage,
        kind: ModifierKind::Flat,
        min: 1.0,
        max: 10.0,
    },
    AffixRange {
        stat: StatType::Armor,
        kind: ModifierKind::Flat,
        min: 1.0,
        max: 10.0,
    },
    AffixRange {
        stat: StatType::AttackSpeed,
        kind: ModifierKind::Increased,
        min: 0.05,
        max: 0.25,
    },
    AffixRange {
        stat: StatType::CriticalChance,
        kind: ModifierKind::Increased,
        min: 0.30,
        max: 1.00,
    },
    AffixRange {
        stat: StatType::Evasion,
        kind: ModifierKind::Flat,
        min: 1.0,
        max: 8.0,
    },
    AffixRange {
        stat: StatType::MovementSpeed,
        kind: ModifierKind::Flat,
        min: 0.2,
        max: 1.0,
    },
];

const ROLLED_SOURCE: &str = "rolled";

/// Rolls items from a fixed definition table.
#[derive(Debug, Clone)]
pub struct TableItemRoller {
    definitions: Vec<ItemDefinition>,
    next_uid: u64,
}

impl TableItemRoller {
    /// Create a roller over `definitions`. Uids start at 1.
    #[must_use]
    pub fn new(definitions: Vec<ItemDefinition>) -> Self {
        Self {
            definitions,
            next_uid: 1,
        }
    }

    /// Number of definitions in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn roll_affix(rng: &mut dyn RandomSource) -> Modifier {
        let last = ROLLABLE_AFFIXES.len() - 1;
        let index = usize::try_from(rng.range_i32(0, ROLLABLE_AFFIXES.len() as i32))
            .unwrap_or(0)
            .min(last);
        let affix = ROLLABLE_AFFIXES[index];
        Modifier::new(affix.stat, affix.kind, rng.range_f32(affix.min, affix.max))
            .with_source(ROLLED_SOURCE)
    }
}

impl ItemRoller for TableItemRoller {
    fn roll_item(&mut self, rng: &mut dyn RandomSource) -> Option<ItemInstance> {
        if self.definitions.is_empty() {
            return None;
        }

        let pick = rng.range_i32(0, self.definitions.len() as i32);
        let definition = usize::try_from(pick)
            .ok()
            .and_then(|i| self.definitions.get(i))?
            .clone();

        let (min, max) = definition.rarity.affix_range();
        let count = if max > min {
            rng.range_i32(min, max)
        } else {
            min
        };
        let rolled_modifiers = (0..count.max(0)).map(|_| Self::roll_affix(rng)).collect();

        let uid = self.next_uid;
        self.next_uid += 1;

        Some(ItemInstance {
            uid,
            definition,
            rolled_modifiers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the lower bound of any range.
    struct Lowest;

    impl RandomSource for Lowest {
        fn next_f64(&mut self) -> f64 {
            0.0
        }

        fn range_i32(&mut self, min: i32, _max_exclusive: i32) -> i32 {
            min
        }

        fn range_f32(&mut self, min: f32, _max: f32) -> f32 {
            min
        }
    }

    /// Always returns the top of any range.
    struct Highest;

    impl RandomSource for Highest {
        fn next_f64(&mut self) -> f64 {
            0.999
        }

        fn range_i32(&mut self, min: i32, max_exclusive: i32) -> i32 {
            (max_exclusive - 1).max(min)
        }

        fn range_f32(&mut self, _min: f32, max: f32) -> f32 {
            max
        }
    }

    fn definition(id: &str, rarity: Rarity) -> ItemDefinition {
        ItemDefinition {
            id: id.to_string(),
            name: id.to_string(),
            rarity,
            slot: EquipmentSlot::Ring,
            implicit_modifiers: vec![
                Modifier::flat(StatType::PhysicalDamage, 2.0).with_source("implicit"),
            ],
        }
    }

    #[test]
    fn test_empty_table_rolls_nothing() {
        let mut roller = TableItemRoller::new(Vec::new());
        assert!(roller.roll_item(&mut Lowest).is_none());
    }

    #[test]
    fn test_normal_items_have_no_affixes() {
        let mut roller = TableItemRoller::new(vec![definition("ring", Rarity::Normal)]);
        let item = roller.roll_item(&mut Highest).unwrap();
        assert!(item.rolled_modifiers.is_empty());
        assert_eq!(item.modifiers().count(), 1);
    }

    #[test]
    fn test_affix_counts_follow_rarity() {
        let mut magic = TableItemRoller::new(vec![definition("m", Rarity::Magic)]);
        assert_eq!(magic.roll_item(&mut Lowest).unwrap().rolled_modifiers.len(), 1);
        assert_eq!(magic.roll_item(&mut Highest).unwrap().rolled_modifiers.len(), 2);

        let mut rare = TableItemRoller::new(vec![definition("r", Rarity::Rare)]);
        assert_eq!(rare.roll_item(&mut Lowest).unwrap().rolled_modifiers.len(), 3);
        assert_eq!(rare.roll_item(&mut Highest).unwrap().rolled_modifiers.len(), 5);

        let mut unique = TableItemRoller::new(vec![definition("u", Rarity::Unique)]);
        assert_eq!(unique.roll_item(&mut Highest).unwrap().rolled_modifiers.len(), 1);
    }

    #[test]
    fn test_rolled_values_use_affix_ranges() {
        let mut roller = TableItemRoller::new(vec![definition("m", Rarity::Magic)]);
        let item = roller.roll_item(&mut Lowest).unwrap();
        let affix = &item.rolled_modifiers[0];
        assert_eq!(affix.stat, StatType::MaxHealth);
        assert_eq!(affix.kind, ModifierKind::Flat);
        assert_eq!(affix.value, 5.0);
        assert_eq!(affix.source.as_str(), "rolled");

        let item = roller.roll_item(&mut Highest).unwrap();
        assert_eq!(item.rolled_modifiers[0].stat, StatType::MovementSpeed);
        assert_eq!(item.rolled_modifiers[0].value, 1.0);
    }

    #[test]
    fn test_uids_are_sequential() {
        let mut roller = TableItemRoller::new(vec![definition("a", Rarity::Normal)]);
        let first = roller.roll_item(&mut Lowest).unwrap();
        let second = roller.roll_item(&mut Lowest).unwrap();
        assert_eq!(first.uid, 1);
        assert_eq!(second.uid, 2);
        assert_ne!(first.source(), second.source());
    }
}
