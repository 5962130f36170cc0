//! Tunable gameplay constants shared by the world and its systems.
//!
//! Every section implements [`Default`] with the values used by the shipped
//! game, and every field is optional when deserialising so adapters may load
//! partial overrides from configuration files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CellCoord, FieldPoint, Rect};

/// Complete rule set consumed by a simulation session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Layout of the lawn.
    pub field: FieldRules,
    /// Plant geometry and behaviour cadence.
    pub plants: PlantRules,
    /// Zombie geometry and melee behaviour.
    pub zombies: ZombieRules,
    /// Projectile geometry, speed and damage.
    pub projectiles: ProjectileRules,
    /// Sun geometry, motion and lifetime.
    pub suns: SunRules,
    /// Level progression thresholds.
    pub progression: ProgressionRules,
}

/// Grid layout of the lawn expressed in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRules {
    /// Side length of a single square grid cell.
    pub grid_size: f32,
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            grid_size: 75.0,
            columns: 12,
            rows: 8,
        }
    }
}

impl FieldRules {
    /// Total width of the lawn.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.grid_size
    }

    /// Total height of the lawn.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.grid_size
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Converts a field position into the grid cell that contains it.
    ///
    /// Returns `None` for negative or non-finite coordinates or a degenerate
    /// grid size. The returned cell may still lie outside the grid on the far
    /// edges.
    #[must_use]
    pub fn cell_at(&self, point: FieldPoint) -> Option<CellCoord> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        if point.x < 0.0 || point.y < 0.0 || self.grid_size <= f32::EPSILON {
            return None;
        }

        let column = (point.x / self.grid_size).floor();
        let row = (point.y / self.grid_size).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }

        Some(CellCoord::new(column as u32, row as u32))
    }

    /// Top edge of the provided row.
    #[must_use]
    pub fn row_top(&self, row: u32) -> f32 {
        row as f32 * self.grid_size
    }
}

/// Plant geometry and action cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantRules {
    /// Offset of the plant body from the top-left corner of its cell.
    pub inset: f32,
    /// Side length of the square plant body.
    pub size: f32,
    /// Milliseconds a sunflower needs between two produced suns.
    pub production_interval_ms: u64,
    /// Milliseconds a peashooter needs between two shots.
    pub shoot_interval_ms: u64,
    /// Forward distance within which a peashooter notices zombies.
    pub shoot_range: f32,
    /// Horizontal muzzle offset relative to the plant body.
    pub muzzle_offset_x: f32,
    /// Vertical muzzle offset relative to the plant body.
    pub muzzle_offset_y: f32,
    /// Offset of a produced sun relative to the plant body on both axes.
    pub produced_sun_offset: f32,
}

impl Default for PlantRules {
    fn default() -> Self {
        Self {
            inset: 10.0,
            size: 55.0,
            production_interval_ms: 5_000,
            shoot_interval_ms: 2_000,
            shoot_range: 800.0,
            muzzle_offset_x: 50.0,
            muzzle_offset_y: 20.0,
            produced_sun_offset: 12.0,
        }
    }
}

impl PlantRules {
    /// Interval between two suns produced by a sunflower.
    #[must_use]
    pub fn production_interval(&self) -> Duration {
        Duration::from_millis(self.production_interval_ms)
    }

    /// Interval between two peashooter shots.
    #[must_use]
    pub fn shoot_interval(&self) -> Duration {
        Duration::from_millis(self.shoot_interval_ms)
    }

    /// Pixel bounds of a plant rooted in the provided cell.
    #[must_use]
    pub fn bounds_for(&self, field: &FieldRules, cell: CellCoord) -> Rect {
        Rect::new(
            cell.column() as f32 * field.grid_size + self.inset,
            cell.row() as f32 * field.grid_size + self.inset,
            self.size,
            self.size,
        )
    }
}

/// Zombie geometry and melee behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieRules {
    /// Width of the zombie body.
    pub width: f32,
    /// Height of the zombie body.
    pub height: f32,
    /// Vertical offset of the body from the top of its row.
    pub row_inset: f32,
    /// Zombies at or beyond this x coordinate are discarded.
    pub despawn_x: f32,
    /// Milliseconds of a single attack cycle while a zombie is eating.
    pub attack_interval_ms: u64,
    /// Health removed from an overlapped plant on every tick.
    pub bite_damage: f32,
}

impl Default for ZombieRules {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 60.0,
            row_inset: 10.0,
            despawn_x: -50.0,
            attack_interval_ms: 1_000,
            bite_damage: 0.5,
        }
    }
}

impl ZombieRules {
    /// Duration of a single attack cycle.
    #[must_use]
    pub fn attack_interval(&self) -> Duration {
        Duration::from_millis(self.attack_interval_ms)
    }
}

/// Projectile geometry and ballistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileRules {
    /// Side length of the square projectile.
    pub size: f32,
    /// Pixels travelled per tick.
    pub speed: f32,
    /// Health removed from the zombie that is hit.
    pub damage: f32,
}

impl Default for ProjectileRules {
    fn default() -> Self {
        Self {
            size: 10.0,
            speed: 5.0,
            damage: 20.0,
        }
    }
}

/// Sun geometry, motion and lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunRules {
    /// Side length of the square sun.
    pub size: f32,
    /// Pixels fallen per tick by suns spawned from the sky.
    pub fall_speed: f32,
    /// Milliseconds a sky sun survives before it expires.
    pub lifetime_ms: u64,
    /// Milliseconds a sunflower-produced sun survives before it expires.
    pub produced_lifetime_ms: u64,
    /// Horizontal margin kept clear on both sides when dropping sky suns.
    pub spawn_margin: f32,
    /// Vertical position at which sky suns appear.
    pub spawn_y: f32,
    /// Distance below the lawn after which a falling sun is discarded.
    pub despawn_margin: f32,
}

impl Default for SunRules {
    fn default() -> Self {
        Self {
            size: 30.0,
            fall_speed: 1.0,
            lifetime_ms: 10_000,
            produced_lifetime_ms: 8_000,
            spawn_margin: 20.0,
            spawn_y: -20.0,
            despawn_margin: 50.0,
        }
    }
}

impl SunRules {
    /// Lifetime of a sky sun.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }

    /// Lifetime of a sunflower-produced sun.
    #[must_use]
    pub fn produced_lifetime(&self) -> Duration {
        Duration::from_millis(self.produced_lifetime_ms)
    }
}

/// Thresholds that drive level transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionRules {
    /// Milliseconds of play after which the next tier is offered.
    pub level_up_elapsed_ms: u64,
    /// Kill count after which the next tier is offered.
    pub level_up_kills: u32,
    /// Percentage of the sun balance carried into the next tier.
    pub carry_over_percent: u32,
    /// Milliseconds of play during which a declined offer is not repeated.
    pub decline_grace_ms: u64,
    /// Zombies spawned per wave when computing the wave counter.
    pub zombies_per_wave: u32,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            level_up_elapsed_ms: 300_000,
            level_up_kills: 30,
            carry_over_percent: 80,
            decline_grace_ms: 30_000,
            zombies_per_wave: 10,
        }
    }
}

impl ProgressionRules {
    /// Elapsed play time after which the next tier is offered.
    #[must_use]
    pub fn level_up_elapsed(&self) -> Duration {
        Duration::from_millis(self.level_up_elapsed_ms)
    }

    /// Grace period applied after a declined offer.
    #[must_use]
    pub fn decline_grace(&self) -> Duration {
        Duration::from_millis(self.decline_grace_ms)
    }

    /// Sun balance retained when advancing to the next tier.
    #[must_use]
    pub fn carried_sun(&self, balance: u32) -> u32 {
        let carried = u64::from(balance) * u64::from(self.carry_over_percent) / 100;
        carried.min(u64::from(u32::MAX)) as u32
    }

    /// One-based wave number reached after spawning `spawned` zombies.
    #[must_use]
    pub fn wave_for(&self, spawned: u32) -> u32 {
        match self.zombies_per_wave {
            0 => 1,
            per_wave => 1 + spawned / per_wave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_field_matches_shipped_canvas() {
        let field = FieldRules::default();
        assert_eq!(field.width(), 900.0);
        assert_eq!(field.height(), 600.0);
    }

    #[test]
    fn cell_at_floors_coordinates() {
        let field = FieldRules::default();
        assert_eq!(
            field.cell_at(FieldPoint::new(149.9, 75.0)),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(field.cell_at(FieldPoint::new(-0.5, 10.0)), None);
    }

    #[test]
    fn cell_at_rejects_non_finite_coordinates() {
        let field = FieldRules::default();
        assert_eq!(field.cell_at(FieldPoint::new(f32::NAN, f32::NAN)), None);
        assert_eq!(field.cell_at(FieldPoint::new(10.0, f32::NAN)), None);
        assert_eq!(field.cell_at(FieldPoint::new(f32::INFINITY, 10.0)), None);
    }

    #[test]
    fn plant_bounds_are_inset_within_cell() {
        let rules = Rules::default();
        let bounds = rules
            .plants
            .bounds_for(&rules.field, CellCoord::new(2, 3));
        assert_eq!(bounds, Rect::new(160.0, 235.0, 55.0, 55.0));
    }

    #[test]
    fn carry_over_rounds_down() {
        let progression = ProgressionRules::default();
        assert_eq!(progression.carried_sun(125), 100);
        assert_eq!(progression.carried_sun(99), 79);
        assert_eq!(progression.carried_sun(0), 0);
    }

    #[test]
    fn wave_counter_advances_per_quota() {
        let progression = ProgressionRules::default();
        assert_eq!(progression.wave_for(0), 1);
        assert_eq!(progression.wave_for(9), 1);
        assert_eq!(progression.wave_for(10), 2);

        let unbounded = ProgressionRules {
            zombies_per_wave: 0,
            ..ProgressionRules::default()
        };
        assert_eq!(unbounded.wave_for(500), 1);
    }

    #[test]
    fn partial_toml_overrides_keep_defaults() {
        let rules: Rules = toml::from_str(
            r#"
            [progression]
            level_up_kills = 5

            [zombies]
            bite_damage = 1.0
            "#,
        )
        .expect("partial rules parse");

        assert_eq!(rules.progression.level_up_kills, 5);
        assert_eq!(rules.progression.carry_over_percent, 80);
        assert_eq!(rules.zombies.bite_damage, 1.0);
        assert_eq!(rules.field, FieldRules::default());
    }
}
