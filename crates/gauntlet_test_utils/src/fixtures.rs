//! Test fixtures and helpers.
//!
//! Content databases with exact tier/map/battle shapes, a plain skeleton
//! enemy and hero stat blocks for consistent testing.

use gauntlet_core::components::CombatStats;
use gauntlet_core::content::{
    BattleDefinition, ContentData, ContentDatabase, EnemyDefinition, LootTable, MapDefinition,
    TierDefinition, TierScaling, WaveDefinition, WaveSpawnEntry,
};
use gauntlet_core::hero::HeroState;
use gauntlet_core::stats::StatType;

/// Health of [`skeleton`].
pub const SKELETON_HEALTH: f32 = 30.0;

/// A 30 HP skeleton with no armor.
#[must_use]
pub fn skeleton() -> EnemyDefinition {
    EnemyDefinition {
        id: "skeleton".to_string(),
        name: "Skeleton".to_string(),
        base_health: SKELETON_HEALTH,
        base_damage: 5.0,
        base_armor: 0.0,
        base_speed: 2.0,
    }
}

/// A wave of `count` skeletons after `delay` seconds.
#[must_use]
pub fn skeleton_wave(count: u32, delay: f32) -> WaveDefinition {
    WaveDefinition {
        spawns: vec![WaveSpawnEntry::new("skeleton", count)],
        delay_before_wave: delay,
    }
}

/// Scaling that leaves enemies at their base stats in every tier.
#[must_use]
pub fn flat_scaling() -> TierScaling {
    TierScaling {
        base: 1.0,
        per_tier: 0.0,
    }
}

/// Content shaped by `layout`: one entry per tier, each listing the battle
/// count of every map in that tier.
///
/// Every battle is a single wave of `skeletons_per_wave` skeletons with no
/// delay. Ids follow `tier_{t}`, `map_{t}_{m}` and `battle_{t}_{m}_{b}`.
///
/// ```
/// use gauntlet_core::content::ContentProvider;
/// use gauntlet_test_utils::fixtures::content_with_layout;
///
/// let content = content_with_layout(&[&[2, 1], &[3]], 1);
/// assert_eq!(content.tier_count(), 2);
/// assert_eq!(content.battle_count(0, 0), 2);
/// assert_eq!(content.battle_count(1, 0), 3);
/// ```
#[must_use]
pub fn content_with_layout(layout: &[&[usize]], skeletons_per_wave: u32) -> ContentDatabase {
    let mut data = ContentData {
        tiers: Vec::new(),
        maps: Vec::new(),
        battles: Vec::new(),
        enemies: vec![skeleton()],
        items: Vec::new(),
        loot: LootTable::default(),
        scaling: flat_scaling(),
    };

    for (t, maps) in layout.iter().enumerate() {
        let tier_id = format!("tier_{t}");
        let mut map_ids = Vec::new();

        for (m, &battle_count) in maps.iter().enumerate() {
            let map_id = format!("map_{t}_{m}");
            let battle_ids: Vec<String> = (0..battle_count)
                .map(|b| format!("battle_{t}_{m}_{b}"))
                .collect();

            for (b, id) in battle_ids.iter().enumerate() {
                data.battles.push(BattleDefinition {
                    id: id.clone(),
                    map_id: map_id.clone(),
                    order: b as u32 + 1,
                    waves: vec![skeleton_wave(skeletons_per_wave, 0.0)],
                    rewards: Vec::new(),
                });
            }

            data.maps.push(MapDefinition {
                id: map_id.clone(),
                name: format!("Map {t}-{m}"),
                tier_id: tier_id.clone(),
                battle_ids,
            });
            map_ids.push(map_id);
        }

        data.tiers.push(TierDefinition {
            id: tier_id,
            name: format!("Tier {t}"),
            order: t as u32 + 1,
            map_ids,
        });
    }

    ContentDatabase::new(data)
}

/// One tier, one map, one battle made of `waves`.
#[must_use]
pub fn single_battle_content(waves: Vec<WaveDefinition>) -> ContentDatabase {
    let mut content = content_with_layout(&[&[1]], 0).data().clone();
    if let Some(battle) = content.battles.first_mut() {
        battle.waves = waves;
    }
    ContentDatabase::new(content)
}

/// Combat stats for a test hero with 100 HP and no armor.
#[must_use]
pub fn hero_combat_stats(damage: f32, attack_speed: f32, crit_chance: f32) -> CombatStats {
    CombatStats {
        max_health: 100.0,
        current_health: 100.0,
        physical_damage: damage,
        attack_speed,
        armor: 0.0,
        move_speed: 3.0,
        crit_chance,
        crit_multiplier: 2.0,
    }
}

/// Hero state whose final stats match [`hero_combat_stats`].
#[must_use]
pub fn hero_state(damage: f32, attack_speed: f32, crit_chance: f32) -> HeroState {
    let mut hero = HeroState::default();
    let stats = hero.stats_mut();
    stats.set_base(StatType::PhysicalDamage, damage);
    stats.set_base(StatType::AttackSpeed, attack_speed);
    stats.set_base(StatType::CriticalChance, crit_chance);
    stats.set_base(StatType::CriticalMultiplier, 2.0);
    stats.set_base(StatType::Armor, 0.0);
    hero
}
