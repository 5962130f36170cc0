//! Projectile state and ballistics.

use lawn_defence_core::{PlantId, ProjectileId, ProjectileSnapshot, Rect};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) plant: PlantId,
    pub(crate) bounds: Rect,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
}

impl Projectile {
    pub(crate) fn advance(&mut self) {
        self.bounds.x += self.speed;
    }

    /// Reports whether the projectile is still strictly inside the lawn.
    pub(crate) fn in_flight(&self, field_width: f32) -> bool {
        self.bounds.x > 0.0 && self.bounds.x < field_width
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            plant: self.plant,
            bounds: self.bounds,
            damage: self.damage,
        }
    }
}
