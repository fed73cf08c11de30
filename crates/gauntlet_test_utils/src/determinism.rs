//! Determinism testing utilities.
//!
//! Two encounters built from the same content, seed and tick size must end
//! in the same state. Sources of drift this catches:
//!
//! - **HashMap iteration order**: systems must walk entities in sorted id order.
//! - **Ambient randomness**: every roll has to go through the injected
//!   [`gauntlet_core::rng::RandomSource`].
//! - **Shared state**: parallel runs must not leak into one another.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use gauntlet_core::rng::SeededRandom;
use gauntlet_core::simulation::CombatWorld;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Final hash of each run.
    pub hashes: Vec<u64>,
    /// Number of steps per run.
    pub ticks: u64,
}

impl DeterminismResult {
    /// True when every run produced the same hash.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Distinct hashes across runs.
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Panic with a readable report if the runs disagreed.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            panic!(
                "Encounter is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                self.unique_hashes().len(),
                self.hashes
            );
        }
    }
}

/// Run `setup` then `step` `ticks` times, `runs` times over, and compare hashes.
///
/// # Example
///
/// ```ignore
/// let result = verify_determinism(
///     3,
///     200,
///     || seeded_world(7),
///     |(world, rng)| { world.tick(0.05, rng); },
///     |(world, _)| world.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let hashes = (0..runs)
        .map(|_| {
            let mut state = setup();
            for _ in 0..ticks {
                step(&mut state);
            }
            hash(&state)
        })
        .collect();

    DeterminismResult { hashes, ticks }
}

/// Tick a world built by `setup` on several threads at once.
///
/// Each thread gets its own world and its own [`SeededRandom`] from `seed`.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_worlds<F>(
    setup: F,
    seed: u64,
    num_worlds: usize,
    ticks: u64,
    dt: f32,
) -> DeterminismResult
where
    F: Fn() -> CombatWorld + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_worlds)
            .map(|_| {
                s.spawn(|| {
                    let mut world = setup();
                    let mut rng = SeededRandom::new(seed);
                    for _ in 0..ticks {
                        world.tick(dt, &mut rng);
                    }
                    world.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("world thread panicked"))
            .collect()
    });

    DeterminismResult { hashes, ticks }
}

/// Tick two identical worlds side by side and report the first tick where
/// their hashes differ. `Some(0)` means they differed before any tick.
pub fn find_first_divergence<F>(setup: F, seed: u64, ticks: u64, dt: f32) -> Option<u64>
where
    F: Fn() -> CombatWorld,
{
    let mut a = setup();
    let mut b = setup();
    let mut rng_a = SeededRandom::new(seed);
    let mut rng_b = SeededRandom::new(seed);

    if a.state_hash() != b.state_hash() {
        return Some(0);
    }

    for tick in 1..=ticks {
        a.tick(dt, &mut rng_a);
        b.tick(dt, &mut rng_b);
        if a.state_hash() != b.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Hash any hashable value with the default hasher.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_counters_are_deterministic() {
        let result = verify_determinism(4, 10, || 0_u64, |n| *n += 3, |n| compute_hash(n));
        assert!(result.is_deterministic());
        assert_eq!(result.unique_hashes().len(), 1);
        result.assert_deterministic();
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_divergent_runs_panic() {
        let result = DeterminismResult {
            hashes: vec![1, 2],
            ticks: 1,
        };
        result.assert_deterministic();
    }

    #[test]
    fn test_empty_world_never_diverges() {
        assert_eq!(find_first_divergence(CombatWorld::default, 1, 20, 0.1), None);
    }
}
