//! Authoritative plant state management utilities.

use std::{collections::BTreeMap, time::Duration};

use lawn_defence_core::{CellCoord, PlantId, PlantKind, PlantSnapshot, Rect};

/// Plant stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Plant {
    /// Identifier allocated by the world for the plant.
    pub(crate) id: PlantId,
    /// Kind of plant that was grown.
    pub(crate) kind: PlantKind,
    /// Cell occupied by the plant.
    pub(crate) cell: CellCoord,
    /// Pixel bounds of the plant body.
    pub(crate) bounds: Rect,
    /// Remaining health.
    pub(crate) health: f32,
    /// Time accumulated towards the next production or shot.
    pub(crate) action_timer: Duration,
}

impl Plant {
    /// Accrues frame time for plants that act on a cadence.
    pub(crate) fn accrue(&mut self, dt: Duration) {
        match self.kind {
            PlantKind::Sunflower | PlantKind::Peashooter => {
                self.action_timer = self.action_timer.saturating_add(dt);
            }
            PlantKind::WallNut => {}
        }
    }

    pub(crate) fn snapshot(&self) -> PlantSnapshot {
        PlantSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            bounds: self.bounds,
            health: self.health,
            max_health: self.kind.max_health(),
            action_timer: self.action_timer,
        }
    }
}

/// Registry that stores plants in identifier order and indexes them by cell.
#[derive(Debug)]
pub(crate) struct PlantRegistry {
    entries: BTreeMap<PlantId, Plant>,
    cells: BTreeMap<CellCoord, PlantId>,
    next_plant_id: PlantId,
}

impl PlantRegistry {
    /// Creates an empty plant registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            cells: BTreeMap::new(),
            next_plant_id: PlantId::new(0),
        }
    }

    pub(crate) fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    pub(crate) fn at(&self, cell: CellCoord) -> Option<PlantId> {
        self.cells.get(&cell).copied()
    }

    /// Grows a new plant and returns the identifier allocated to it.
    pub(crate) fn insert(&mut self, kind: PlantKind, cell: CellCoord, bounds: Rect) -> PlantId {
        let id = self.next_plant_id;
        self.next_plant_id = PlantId::new(id.get().wrapping_add(1));

        let plant = Plant {
            id,
            kind,
            cell,
            bounds,
            health: kind.max_health(),
            action_timer: Duration::ZERO,
        };
        let _ = self.entries.insert(id, plant);
        let _ = self.cells.insert(cell, id);
        id
    }

    pub(crate) fn remove(&mut self, id: PlantId) -> Option<Plant> {
        let plant = self.entries.remove(&id)?;
        let _ = self.cells.remove(&plant.cell);
        Some(plant)
    }

    pub(crate) fn get_mut(&mut self, id: PlantId) -> Option<&mut Plant> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Plant> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Plant> {
        self.entries.values_mut()
    }

    /// Removes every plant while keeping identifiers unique across the session.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }
}
