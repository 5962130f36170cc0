//! Per-tier counters that drive waves and level transitions.

use std::time::Duration;

use lawn_defence_core::ProgressionRules;

#[derive(Clone, Debug, Default)]
pub(crate) struct Progression {
    pub(crate) elapsed: Duration,
    pub(crate) kills: u32,
    pub(crate) spawned: u32,
    suppressed_until: Option<Duration>,
}

impl Progression {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub(crate) fn record_kills(&mut self, count: usize) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.kills = self.kills.saturating_add(count);
    }

    pub(crate) fn record_spawn(&mut self) {
        self.spawned = self.spawned.saturating_add(1);
    }

    /// Reports whether either threshold is met and no declined offer is still
    /// inside its grace period.
    pub(crate) fn level_up_due(&self, rules: &ProgressionRules) -> bool {
        let reached =
            self.elapsed >= rules.level_up_elapsed() || self.kills >= rules.level_up_kills;
        let suppressed = self
            .suppressed_until
            .map_or(false, |until| self.elapsed < until);
        reached && !suppressed
    }

    pub(crate) fn decline(&mut self, rules: &ProgressionRules) {
        self.suppressed_until = Some(self.elapsed.saturating_add(rules.decline_grace()));
    }

    pub(crate) fn wave(&self, rules: &ProgressionRules) -> u32 {
        rules.wave_for(self.spawned)
    }
}
