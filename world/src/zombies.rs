//! Zombie state and per-frame behaviour.

use std::time::Duration;

use lawn_defence_core::{Rect, ZombieId, ZombieRules, ZombieSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Zombie {
    pub(crate) id: ZombieId,
    pub(crate) row: u32,
    pub(crate) bounds: Rect,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) speed: f32,
    pub(crate) attacking: bool,
    pub(crate) attack_timer: Duration,
}

impl Zombie {
    /// Walks left by the fixed per-tick speed unless eating.
    ///
    /// While eating the attack timer wraps at the attack interval. Bite damage
    /// is applied by the contact pass on every tick, so the cycle only feeds
    /// presentation.
    pub(crate) fn advance(&mut self, dt: Duration, rules: &ZombieRules) {
        if !self.attacking {
            self.bounds.x -= self.speed;
            return;
        }

        self.attack_timer = self.attack_timer.saturating_add(dt);
        if self.attack_timer >= rules.attack_interval() {
            self.attack_timer = Duration::ZERO;
        }
    }

    pub(crate) fn snapshot(&self) -> ZombieSnapshot {
        ZombieSnapshot {
            id: self.id,
            row: self.row,
            bounds: self.bounds,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            attacking: self.attacking,
            attack_timer: self.attack_timer,
        }
    }
}
