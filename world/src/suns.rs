//! Sun state, falling motion and expiry.

use std::time::Duration;

use lawn_defence_core::{FieldPoint, Rect, SunId, SunOrigin, SunSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Sun {
    pub(crate) id: SunId,
    pub(crate) origin: SunOrigin,
    pub(crate) bounds: Rect,
    pub(crate) fall_speed: f32,
    pub(crate) collected: bool,
    pub(crate) age: Duration,
    pub(crate) lifetime: Duration,
}

impl Sun {
    /// Falls by the per-tick speed and ages by the frame duration.
    ///
    /// A sun older than its lifetime is flagged as collected without crediting
    /// anyone, so the next prune discards it.
    pub(crate) fn advance(&mut self, dt: Duration) {
        self.bounds.y += self.fall_speed;
        self.age = self.age.saturating_add(dt);
        if self.age > self.lifetime {
            self.collected = true;
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        !self.collected
    }

    pub(crate) fn hit(&self, point: FieldPoint) -> bool {
        self.is_live() && self.bounds.contains(point)
    }

    pub(crate) fn snapshot(&self) -> SunSnapshot {
        SunSnapshot {
            id: self.id,
            origin: self.origin,
            bounds: self.bounds,
            collected: self.collected,
            age: self.age,
            lifetime: self.lifetime,
        }
    }
}
