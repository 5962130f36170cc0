#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves contacts between projectiles, zombies and plants.
//!
//! The system never mutates world state. It receives lightweight bodies in
//! collection order and reports every consequence of the contact pass in a
//! [`CollisionOutcome`] so the world can apply removals in a single batch.

use lawn_defence_core::{PlantId, ProjectileId, Rect, ZombieId};

/// Projectile participating in the contact pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileBody {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Pixel bounds after this frame's movement.
    pub bounds: Rect,
    /// Health removed from the zombie that is hit.
    pub damage: f32,
}

/// Zombie participating in the contact pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieBody {
    /// Identifier of the zombie.
    pub id: ZombieId,
    /// Pixel bounds after this frame's movement.
    pub bounds: Rect,
    /// Health before the pass.
    pub health: f32,
}

/// Plant participating in the contact pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantBody {
    /// Identifier of the plant.
    pub id: PlantId,
    /// Pixel bounds of the plant body.
    pub bounds: Rect,
    /// Health before the pass.
    pub health: f32,
}

/// State of a surviving zombie after the pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieOutcome {
    /// Identifier of the zombie.
    pub id: ZombieId,
    /// Health after projectile hits.
    pub health: f32,
    /// Indicates whether the zombie is eating a plant and must stand still.
    pub attacking: bool,
}

/// Every consequence of a single contact pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Projectiles consumed by a hit, in the order they hit.
    pub spent_projectiles: Vec<ProjectileId>,
    /// Zombies whose health dropped to zero, in the order they died.
    pub killed_zombies: Vec<ZombieId>,
    /// Surviving zombies in collection order.
    pub zombies: Vec<ZombieOutcome>,
    /// Plants that were eaten, in the order they fell.
    pub destroyed_plants: Vec<PlantId>,
    /// Bitten plants that are still standing together with their new health.
    pub bitten_plants: Vec<(PlantId, f32)>,
}

impl CollisionOutcome {
    fn clear(&mut self) {
        self.spent_projectiles.clear();
        self.killed_zombies.clear();
        self.zombies.clear();
        self.destroyed_plants.clear();
        self.bitten_plants.clear();
    }
}

/// Contact resolution system that reuses scratch buffers between frames.
#[derive(Debug, Default)]
pub struct Collision {
    zombie_health: Vec<f32>,
    zombie_alive: Vec<bool>,
    plant_health: Vec<f32>,
    plant_bitten: Vec<bool>,
}

impl Collision {
    /// Creates a new collision system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves projectile hits first and zombie bites second.
    ///
    /// A projectile damages at most one zombie and a dead zombie neither
    /// absorbs further projectiles nor bites. Bite damage is a fixed amount per
    /// call, independent of frame duration. The output buffer is cleared
    /// before it is populated.
    pub fn resolve(
        &mut self,
        projectiles: &[ProjectileBody],
        zombies: &[ZombieBody],
        plants: &[PlantBody],
        bite_damage: f32,
        out: &mut CollisionOutcome,
    ) {
        out.clear();
        self.prepare(zombies, plants);

        for projectile in projectiles {
            self.strike(projectile, zombies, out);
        }

        for (index, zombie) in zombies.iter().enumerate() {
            if !self.zombie_alive[index] {
                continue;
            }

            let attacking = self.bite(zombie, plants, bite_damage, out);
            out.zombies.push(ZombieOutcome {
                id: zombie.id,
                health: self.zombie_health[index],
                attacking,
            });
        }

        for (index, plant) in plants.iter().enumerate() {
            if self.plant_bitten[index] && self.plant_health[index] > 0.0 {
                out.bitten_plants.push((plant.id, self.plant_health[index]));
            }
        }
    }

    fn prepare(&mut self, zombies: &[ZombieBody], plants: &[PlantBody]) {
        self.zombie_health.clear();
        self.zombie_health
            .extend(zombies.iter().map(|zombie| zombie.health));
        self.zombie_alive.clear();
        self.zombie_alive.resize(zombies.len(), true);

        self.plant_health.clear();
        self.plant_health
            .extend(plants.iter().map(|plant| plant.health));
        self.plant_bitten.clear();
        self.plant_bitten.resize(plants.len(), false);
    }

    fn strike(
        &mut self,
        projectile: &ProjectileBody,
        zombies: &[ZombieBody],
        out: &mut CollisionOutcome,
    ) {
        for (index, zombie) in zombies.iter().enumerate() {
            if !self.zombie_alive[index] || !projectile.bounds.overlaps(&zombie.bounds) {
                continue;
            }

            self.zombie_health[index] -= projectile.damage;
            out.spent_projectiles.push(projectile.id);

            if self.zombie_health[index] <= 0.0 {
                self.zombie_health[index] = 0.0;
                self.zombie_alive[index] = false;
                out.killed_zombies.push(zombie.id);
            }
            return;
        }
    }

    fn bite(
        &mut self,
        zombie: &ZombieBody,
        plants: &[PlantBody],
        bite_damage: f32,
        out: &mut CollisionOutcome,
    ) -> bool {
        let mut attacking = false;

        for (index, plant) in plants.iter().enumerate() {
            if self.plant_health[index] <= 0.0 || !zombie.bounds.overlaps(&plant.bounds) {
                continue;
            }

            attacking = true;
            self.plant_bitten[index] = true;
            self.plant_health[index] -= bite_damage;

            if self.plant_health[index] <= 0.0 {
                self.plant_health[index] = 0.0;
                out.destroyed_plants.push(plant.id);
                attacking = false;
            }
        }

        attacking
    }
}
