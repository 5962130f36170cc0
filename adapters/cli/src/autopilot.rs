//! Scripted player used by the headless host.

use glam::Vec2;
use lawn_defence_core::{CellCoord, PlantKind, RunPhase};
use lawn_defence_rendering::{FrameInput, Scene};

/// Column closest to the house where peashooters are planted.
const PEASHOOTER_COLUMNS: std::ops::RangeInclusive<u32> = 1..=3;
/// Column that holds the wall-nut line.
const WALL_NUT_COLUMN: u32 = 5;

/// Produces one frame of input by inspecting the presented scene.
///
/// Collecting sun always comes first. Threatened rows receive a peashooter,
/// then the economy grows one sunflower per row in the first column, and
/// defended rows finally get a wall-nut in front of their shooters.
#[derive(Debug)]
pub(crate) struct Autopilot {
    accept_level_ups: bool,
}

impl Autopilot {
    pub(crate) fn new(accept_level_ups: bool) -> Self {
        Self { accept_level_ups }
    }

    pub(crate) fn next_input(&mut self, scene: &Scene) -> FrameInput {
        let mut input = FrameInput::default();

        match scene.hud.stats.phase {
            RunPhase::LevelTransition { .. } => {
                if self.accept_level_ups {
                    input.accept_level_up = true;
                } else {
                    input.decline_level_up = true;
                }
                return input;
            }
            RunPhase::Running => {}
            _ => return input,
        }

        if let Some(sun) = scene.suns.first() {
            input.press = Some(sun.center);
            return input;
        }

        if let Some((kind, cell)) = self.choose_planting(scene) {
            input.select_plant = Some(kind);
            input.press = Some(scene.lawn.cell_center(cell));
        }
        input
    }

    fn choose_planting(&self, scene: &Scene) -> Option<(PlantKind, CellCoord)> {
        let balance = scene.hud.stats.sun;
        let affordable = |kind: PlantKind| balance >= kind.cost();

        let threatened = |row: u32| scene.zombies.iter().any(|zombie| zombie.row == row);
        let has = |kind: PlantKind, row: u32| {
            scene
                .plants
                .iter()
                .any(|plant| plant.kind == kind && plant.cell.row() == row)
        };
        let occupied = |cell: CellCoord| scene.plants.iter().any(|plant| plant.cell == cell);

        let rows = 0..scene.lawn.rows;

        if affordable(PlantKind::Peashooter) {
            for row in rows.clone() {
                if !threatened(row) || has(PlantKind::Peashooter, row) {
                    continue;
                }
                let free = PEASHOOTER_COLUMNS
                    .map(|column| CellCoord::new(column, row))
                    .find(|cell| !occupied(*cell));
                if let Some(cell) = free {
                    return Some((PlantKind::Peashooter, cell));
                }
            }
        }

        if affordable(PlantKind::Sunflower) {
            let free = rows
                .clone()
                .map(|row| CellCoord::new(0, row))
                .find(|cell| !occupied(*cell));
            if let Some(cell) = free {
                return Some((PlantKind::Sunflower, cell));
            }
        }

        if affordable(PlantKind::WallNut) && WALL_NUT_COLUMN < scene.lawn.columns {
            for row in rows {
                let cell = CellCoord::new(WALL_NUT_COLUMN, row);
                if threatened(row) && has(PlantKind::Peashooter, row) && !occupied(cell) {
                    return Some((PlantKind::WallNut, cell));
                }
            }
        }

        None
    }
}

/// Converts a scene position into the pointer coordinates expected by the host.
pub(crate) fn to_field(position: Vec2) -> lawn_defence_core::FieldPoint {
    lawn_defence_core::FieldPoint::new(position.x, position.y)
}
