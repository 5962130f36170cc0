#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that turns pointer presses into collection or placement commands.

use lawn_defence_core::{Command, FieldPoint, FieldRules, PlantKind, RunPhase, SunView};

/// Pointer system that remembers which plant the player picked from the seed bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pointer {
    selected: PlantKind,
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pointer {
    /// Creates a pointer system with the sunflower selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: PlantKind::Sunflower,
        }
    }

    /// Plant kind grown by the next press on an empty spot.
    #[must_use]
    pub const fn selected(&self) -> PlantKind {
        self.selected
    }

    /// Chooses the plant kind grown by subsequent presses.
    pub fn select(&mut self, kind: PlantKind) {
        self.selected = kind;
    }

    /// Translates a press at the provided field position into at most one command.
    ///
    /// Suns take priority: the first uncollected sun whose bounds contain the
    /// point is collected. Otherwise the press plants the selected kind in the
    /// cell under the pointer; the world validates bounds, occupancy and funds.
    /// Presses are ignored unless the run is in progress.
    pub fn handle(
        &mut self,
        phase: RunPhase,
        press: Option<FieldPoint>,
        suns: &SunView,
        field: &FieldRules,
        out: &mut Vec<Command>,
    ) {
        if !phase.is_running() {
            return;
        }
        let Some(point) = press else {
            return;
        };

        let hits_sun = suns
            .iter()
            .any(|sun| !sun.collected && sun.bounds.contains(point));
        if hits_sun {
            out.push(Command::CollectSun { point });
            return;
        }

        if let Some(cell) = field.cell_at(point) {
            out.push(Command::PlacePlant {
                kind: self.selected,
                cell,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawn_defence_core::{CellCoord, Rect, SunId, SunOrigin, SunSnapshot};
    use std::time::Duration;

    fn sun_at(x: f32, y: f32, collected: bool) -> SunView {
        SunView::from_snapshots(vec![SunSnapshot {
            id: SunId::new(0),
            origin: SunOrigin::Sky,
            bounds: Rect::new(x, y, 30.0, 30.0),
            collected,
            age: Duration::ZERO,
            lifetime: Duration::from_secs(10),
        }])
    }

    #[test]
    fn press_on_sun_collects_it() {
        let mut pointer = Pointer::new();
        let mut out = Vec::new();
        let point = FieldPoint::new(130.0, 130.0);

        pointer.handle(
            RunPhase::Running,
            Some(point),
            &sun_at(100.0, 100.0, false),
            &FieldRules::default(),
            &mut out,
        );

        assert_eq!(out, vec![Command::CollectSun { point }]);
    }

    #[test]
    fn press_on_collected_sun_plants_instead() {
        let mut pointer = Pointer::new();
        pointer.select(PlantKind::WallNut);
        let mut out = Vec::new();

        pointer.handle(
            RunPhase::Running,
            Some(FieldPoint::new(110.0, 110.0)),
            &sun_at(100.0, 100.0, true),
            &FieldRules::default(),
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::PlacePlant {
                kind: PlantKind::WallNut,
                cell: CellCoord::new(1, 1),
            }]
        );
    }

    #[test]
    fn press_while_paused_is_ignored() {
        let mut pointer = Pointer::new();
        let mut out = Vec::new();

        pointer.handle(
            RunPhase::Paused,
            Some(FieldPoint::new(10.0, 10.0)),
            &SunView::default(),
            &FieldRules::default(),
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn press_above_the_lawn_emits_nothing() {
        let mut pointer = Pointer::new();
        let mut out = Vec::new();

        pointer.handle(
            RunPhase::Running,
            Some(FieldPoint::new(10.0, -5.0)),
            &SunView::default(),
            &FieldRules::default(),
            &mut out,
        );

        assert!(out.is_empty());
    }
}
