//! Encounter benchmarks for gauntlet_core.
//!
//! Run with: `cargo bench -p gauntlet_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gauntlet_core::components::CombatStats;
use gauntlet_core::content::{ContentDatabase, WaveDefinition, WaveSpawnEntry};
use gauntlet_core::rng::SeededRandom;
use gauntlet_core::simulation::CombatWorld;

fn crowded_world(enemies: u32) -> (CombatWorld, SeededRandom) {
    let content = ContentDatabase::builtin();
    let mut rng = SeededRandom::new(99);
    let mut world = CombatWorld::default();
    world.spawn_hero(CombatStats {
        max_health: 100.0,
        current_health: 100.0,
        physical_damage: 1.0,
        attack_speed: 20.0,
        ..CombatStats::default()
    });
    let wave = WaveDefinition {
        spawns: vec![WaveSpawnEntry::new("zombie", enemies)],
        delay_before_wave: 0.0,
    };
    world.spawn_wave(&wave, 0, 10.0, &content, &mut rng);
    (world, rng)
}

/// Ticks a crowded wave at 60 Hz.
pub fn world_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    for enemies in [10_u32, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(enemies), &enemies, |b, &n| {
            let (mut world, mut rng) = crowded_world(n);
            b.iter(|| black_box(world.tick(1.0 / 60.0, &mut rng)));
        });
    }
    group.finish();
}

criterion_group!(benches, world_tick_benchmark);
criterion_main!(benches);
