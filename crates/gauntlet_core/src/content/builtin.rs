//! Content shipped with the crate, used when no content file is supplied.

use super::database::{ContentData, ContentDatabase};
use super::definitions::{
    BattleDefinition, EnemyDefinition, LootTable, MapDefinition, RewardEntry, RewardType,
    TierDefinition, TierScaling, WaveDefinition, WaveSpawnEntry,
};
use crate::items::{EquipmentSlot, ItemDefinition, Rarity};
use crate::stats::{Modifier, StatType};

const TIER_ID: &str = "tier_1";
const MAP_ID: &str = "map_1_1";
const BATTLE_COUNT: u32 = 10;
const IMPLICIT: &str = "implicit";

impl ContentDatabase {
    /// One tier, one map, ten battles of skeletons, zombies and ghosts.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_data())
    }
}

fn builtin_data() -> ContentData {
    let battles: Vec<BattleDefinition> = (0..BATTLE_COUNT).map(battle).collect();

    ContentData {
        tiers: vec![TierDefinition {
            id: TIER_ID.to_string(),
            name: "Act I".to_string(),
            order: 1,
            map_ids: vec![MAP_ID.to_string()],
        }],
        maps: vec![MapDefinition {
            id: MAP_ID.to_string(),
            name: "Twilight Shore".to_string(),
            tier_id: TIER_ID.to_string(),
            battle_ids: battles.iter().map(|b| b.id.clone()).collect(),
        }],
        battles,
        enemies: vec![
            enemy("skeleton", "Skeleton", 30.0, 5.0, 2.0, 2.0),
            enemy("zombie", "Zombie", 50.0, 8.0, 4.0, 1.2),
            enemy("ghost", "Ghost", 20.0, 10.0, 0.0, 3.0),
        ],
        items: items(),
        loot: LootTable::default(),
        scaling: TierScaling::default(),
    }
}

fn enemy(
    id: &str,
    name: &str,
    health: f32,
    damage: f32,
    armor: f32,
    speed: f32,
) -> EnemyDefinition {
    EnemyDefinition {
        id: id.to_string(),
        name: name.to_string(),
        base_health: health,
        base_damage: damage,
        base_armor: armor,
        base_speed: speed,
    }
}

fn battle(b: u32) -> BattleDefinition {
    let wave_count = (2 + b / 4).min(4);
    let waves = (0..wave_count)
        .map(|w| {
            let count = (2 + b / 3 + w).min(8);
            let is_last = w + 1 == wave_count;
            let grunt = if b >= 5 && is_last { "zombie" } else { "skeleton" };

            let mut spawns = vec![WaveSpawnEntry::new(grunt, count)];
            if b >= 7 && w >= 1 {
                spawns.push(WaveSpawnEntry::new("ghost", 1 + b / 8));
            }

            WaveDefinition {
                spawns,
                delay_before_wave: if w == 0 { 1.0 } else { 2.0 },
            }
        })
        .collect();

    let mut rewards = vec![RewardEntry::new(RewardType::Experience, "xp", 10 + 5 * b)];
    if b % 3 == 2 {
        rewards.push(RewardEntry::new(RewardType::Currency, "gold", 5 + 2 * b));
    }

    BattleDefinition {
        id: format!("battle_1_1_{:02}", b + 1),
        map_id: MAP_ID.to_string(),
        order: b + 1,
        waves,
        rewards,
    }
}

fn item(
    id: &str,
    name: &str,
    rarity: Rarity,
    slot: EquipmentSlot,
    implicit: impl IntoIterator<Item = Modifier>,
) -> ItemDefinition {
    ItemDefinition {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        slot,
        implicit_modifiers: implicit
            .into_iter()
            .map(|m| m.with_source(IMPLICIT))
            .collect(),
    }
}

fn items() -> Vec<ItemDefinition> {
    use EquipmentSlot as S;
    use StatType as T;

    vec![
        item(
            "rusty_sword",
            "Rusty Sword",
            Rarity::Normal,
            S::MainHand,
            [Modifier::flat(T::PhysicalDamage, 5.0)],
        ),
        item(
            "iron_sword",
            "Iron Sword",
            Rarity::Magic,
            S::MainHand,
            [Modifier::flat(T::PhysicalDamage, 10.0)],
        ),
        item(
            "leather_vest",
            "Leather Vest",
            Rarity::Normal,
            S::BodyArmor,
            [Modifier::flat(T::Armor, 8.0), Modifier::flat(T::MaxHealth, 15.0)],
        ),
        item(
            "iron_helmet",
            "Iron Helmet",
            Rarity::Normal,
            S::Helmet,
            [Modifier::flat(T::Armor, 5.0)],
        ),
        item(
            "worn_gloves",
            "Worn Gloves",
            Rarity::Normal,
            S::Gloves,
            [Modifier::increased(T::AttackSpeed, 0.05)],
        ),
        item(
            "simple_boots",
            "Simple Boots",
            Rarity::Normal,
            S::Boots,
            [Modifier::flat(T::MovementSpeed, 1.0)],
        ),
        item(
            "jade_amulet",
            "Jade Amulet",
            Rarity::Magic,
            S::Amulet,
            [Modifier::flat(T::MaxHealth, 20.0)],
        ),
        item(
            "leather_belt",
            "Leather Belt",
            Rarity::Normal,
            S::Belt,
            [Modifier::flat(T::MaxHealth, 10.0)],
        ),
        item(
            "iron_ring",
            "Iron Ring",
            Rarity::Normal,
            S::Ring,
            [Modifier::flat(T::PhysicalDamage, 2.0)],
        ),
        item(
            "wooden_shield",
            "Wooden Shield",
            Rarity::Normal,
            S::OffHand,
            [Modifier::flat(T::Armor, 12.0)],
        ),
        item(
            "great_axe",
            "Great Axe",
            Rarity::Rare,
            S::MainHand,
            [Modifier::flat(T::PhysicalDamage, 18.0)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentProvider;

    #[test]
    fn test_builtin_is_valid() {
        let db = ContentDatabase::builtin();
        assert!(db.validate().is_empty(), "{:?}", db.validate());
        assert_eq!(db.tier_count(), 1);
        assert_eq!(db.tier(0).unwrap().name, "Act I");
        assert_eq!(db.map(0, 0).unwrap().name, "Twilight Shore");
        assert_eq!(db.battle_count(0, 0), 10);
        assert_eq!(db.items().len(), 11);
    }

    #[test]
    fn test_first_battle_shape() {
        let db = ContentDatabase::builtin();
        let first = db.battle(0, 0, 0).unwrap();
        assert_eq!(first.id, "battle_1_1_01");
        assert_eq!(first.waves.len(), 2);
        assert_eq!(first.waves[0].spawns, vec![WaveSpawnEntry::new("skeleton", 2)]);
        assert_eq!(first.waves[0].delay_before_wave, 1.0);
        assert_eq!(first.waves[1].delay_before_wave, 2.0);
        assert_eq!(first.rewards.len(), 1);
    }

    #[test]
    fn test_late_battles_escalate() {
        let db = ContentDatabase::builtin();
        let last = db.battle(0, 0, 9).unwrap();
        assert_eq!(last.waves.len(), 4);
        assert_eq!(last.waves[3].spawns[0].enemy_id, "zombie");
        assert_eq!(last.waves[3].spawns[0].count, 8);
        assert_eq!(last.waves[1].spawns[1], WaveSpawnEntry::new("ghost", 2));
        assert!(last.waves[0].spawns.iter().all(|s| s.enemy_id == "skeleton"));

        let third = db.battle(0, 0, 2).unwrap();
        assert_eq!(third.rewards.len(), 2);
        assert_eq!(third.rewards[1].amount, 9);
    }

    #[test]
    fn test_builtin_round_trips_through_ron() {
        let db = ContentDatabase::builtin();
        let text = db.to_ron_string().unwrap();
        let reloaded = ContentDatabase::load_validated(&text, "builtin").unwrap();
        assert_eq!(reloaded.data(), db.data());
    }
}
