#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides which plants act during the current frame.
//!
//! Sunflowers release a sun once their action timer reaches the production
//! interval. Peashooters fire once their timer reaches the shoot interval and a
//! zombie walks ahead of them in the same row within range. The world owns the
//! timers and resets them when it executes the emitted commands.

use lawn_defence_core::{
    Command, PlantKind, PlantRules, PlantView, RunPhase, ZombieId, ZombieView,
};

/// Plant action system that reuses scratch buffers between frames.
#[derive(Debug, Default)]
pub struct PlantActions {
    zombie_workspace: Vec<ZombieCandidate>,
}

#[derive(Clone, Copy, Debug)]
struct ZombieCandidate {
    id: ZombieId,
    row: u32,
    x: f32,
}

impl PlantActions {
    /// Creates a new plant action system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::ProduceSun` and `Command::FireProjectile` for ready plants.
    pub fn handle(
        &mut self,
        phase: RunPhase,
        plants: &PlantView,
        zombies: &ZombieView,
        rules: &PlantRules,
        out: &mut Vec<Command>,
    ) {
        if !phase.is_running() || plants.is_empty() {
            return;
        }

        self.prepare_zombie_workspace(zombies);
        let production_interval = rules.production_interval();
        let shoot_interval = rules.shoot_interval();

        for plant in plants.iter() {
            match plant.kind {
                PlantKind::Sunflower => {
                    if plant.action_timer >= production_interval {
                        out.push(Command::ProduceSun { plant: plant.id });
                    }
                }
                PlantKind::Peashooter => {
                    if plant.action_timer < shoot_interval {
                        continue;
                    }
                    let target =
                        self.first_target(plant.cell.row(), plant.bounds.x, rules.shoot_range);
                    if target.is_some() {
                        out.push(Command::FireProjectile { plant: plant.id });
                    }
                }
                PlantKind::WallNut => {}
            }
        }
    }

    fn prepare_zombie_workspace(&mut self, zombies: &ZombieView) {
        self.zombie_workspace.clear();
        self.zombie_workspace
            .extend(zombies.iter().map(|zombie| ZombieCandidate {
                id: zombie.id,
                row: zombie.row,
                x: zombie.bounds.x,
            }));
    }

    /// First zombie in collection order that stands ahead of the plant within range.
    fn first_target(&self, row: u32, plant_x: f32, range: f32) -> Option<ZombieId> {
        self.zombie_workspace
            .iter()
            .find(|zombie| zombie.row == row && zombie.x > plant_x && zombie.x - plant_x < range)
            .map(|zombie| zombie.id)
    }
}
