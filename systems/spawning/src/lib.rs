#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system responsible for emitting zombie and sky sun commands.

use std::time::Duration;

use lawn_defence_core::{Command, DifficultyProfile, Event, FieldRules, RunPhase, SunRules};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration that draws rows and drop positions from the seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits spawn commands while a run is in progress.
#[derive(Debug)]
pub struct Spawning {
    zombie_accumulator: Duration,
    sun_accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            zombie_accumulator: Duration::ZERO,
            sun_accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the active tier to emit spawn commands.
    ///
    /// Each accumulator spawns at most one entity per call once it exceeds its
    /// interval and then restarts from zero, dropping any overrun.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: RunPhase,
        profile: Option<DifficultyProfile>,
        field: &FieldRules,
        suns: &SunRules,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::RunStarted { .. } | Event::LevelAdvanced { .. } | Event::SessionReset => {
                    self.reset();
                    accumulated = Duration::ZERO;
                }
                Event::TimeAdvanced { dt } => {
                    accumulated = accumulated.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if !phase.is_running() || accumulated.is_zero() {
            return;
        }
        let Some(profile) = profile else {
            return;
        };

        self.zombie_accumulator = self.zombie_accumulator.saturating_add(accumulated);
        self.sun_accumulator = self.sun_accumulator.saturating_add(accumulated);

        if self.zombie_accumulator > profile.zombie_spawn_interval && field.rows > 0 {
            self.zombie_accumulator = Duration::ZERO;
            let row = self.rng.gen_range(0..field.rows);
            out.push(Command::SpawnZombie { row });
        }

        if self.sun_accumulator > profile.sun_spawn_interval {
            self.sun_accumulator = Duration::ZERO;
            let x = self.drop_position(field, suns);
            out.push(Command::SpawnSun { x });
        }
    }

    fn reset(&mut self) {
        self.zombie_accumulator = Duration::ZERO;
        self.sun_accumulator = Duration::ZERO;
    }

    fn drop_position(&mut self, field: &FieldRules, suns: &SunRules) -> f32 {
        let span = field.width() - 2.0 * suns.spawn_margin;
        if span <= 0.0 {
            return suns.spawn_margin;
        }
        suns.spawn_margin + self.rng.gen::<f32>() * span
    }
}
