#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lawn Defence adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use lawn_defence_core::{
    CellCoord, Difficulty, Event, PlacementError, PlantId, PlantKind, PlantView, ProjectileView,
    Rect, RunPhase, RunStats, SunId, SunOrigin, SunView, ZombieId, ZombieView,
};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

const SUNFLOWER_COLOR: Color = Color::from_rgb_u8(0xff, 0xd7, 0x00);
const PEASHOOTER_COLOR: Color = Color::from_rgb_u8(0x32, 0xcd, 0x32);
const ZOMBIE_COLOR: Color = Color::from_rgb_u8(0x70, 0x80, 0x90);
const PROJECTILE_COLOR: Color = Color::from_rgb_u8(0x32, 0xcd, 0x32);
const SUN_COLOR: Color = Color::from_rgb_u8(0xff, 0xd7, 0x00);

/// Tint of a wall-nut that fades from brown to orange as it is eaten.
#[must_use]
pub fn wall_nut_color(health_ratio: f32) -> Color {
    let ratio = health_ratio.clamp(0.0, 1.0);
    let red = (139.0 + (255.0 - 139.0) * (1.0 - ratio)).floor() as u8;
    let green = (69.0 + (165.0 - 69.0) * ratio).floor() as u8;
    Color::from_rgb_u8(red, green, 19)
}

/// Body color of a plant given its remaining health.
#[must_use]
pub fn plant_color(kind: PlantKind, health_ratio: f32) -> Color {
    match kind {
        PlantKind::Sunflower => SUNFLOWER_COLOR,
        PlantKind::Peashooter => PEASHOOTER_COLOR,
        PlantKind::WallNut => wall_nut_color(health_ratio),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer press expressed in lawn pixels, if one happened this frame.
    pub press: Option<Vec2>,
    /// Plant picked from the seed bar on this frame.
    pub select_plant: Option<PlantKind>,
    /// Difficulty chosen on this frame.
    pub select_difficulty: Option<Difficulty>,
    /// Whether the start control was activated.
    pub start: bool,
    /// Whether the pause control was activated.
    pub toggle_pause: bool,
    /// Whether the reset control was activated.
    pub reset: bool,
    /// Whether a pending level-up offer was accepted.
    pub accept_level_up: bool,
    /// Whether a pending level-up offer was declined.
    pub decline_level_up: bool,
}

/// Grid layout of the lawn in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LawnPresentation {
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Side length of a single square cell.
    pub grid_size: f32,
    /// Color of the grid lines.
    pub line_color: Color,
}

impl LawnPresentation {
    /// Creates a new lawn presentation descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidGridSize`] when the cell size is not
    /// strictly positive.
    pub fn new(
        columns: u32,
        rows: u32,
        grid_size: f32,
        line_color: Color,
    ) -> Result<Self, RenderingError> {
        if !grid_size.is_finite() || grid_size <= 0.0 {
            return Err(RenderingError::InvalidGridSize { grid_size });
        }

        Ok(Self {
            columns,
            rows,
            grid_size,
            line_color,
        })
    }

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

    /// Cell under the provided position, or `None` outside the lawn.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        if position.x >= self.width() || position.y >= self.height() {
            return None;
        }

        let column = (position.x / self.grid_size).floor() as u32;
        let row = (position.y / self.grid_size).floor() as u32;
        Some(CellCoord::new(column, row))
    }

    /// Centre of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.column() as f32 + 0.5) * self.grid_size,
            (cell.row() as f32 + 0.5) * self.grid_size,
        )
    }
}

fn rect_origin(rect: Rect) -> Vec2 {
    Vec2::new(rect.x, rect.y)
}

fn rect_size(rect: Rect) -> Vec2 {
    Vec2::new(rect.width, rect.height)
}

fn rect_center(rect: Rect) -> Vec2 {
    let center = rect.center();
    Vec2::new(center.x, center.y)
}

/// Plant drawn on the lawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantPresentation {
    /// Identifier allocated to the plant by the world.
    pub id: PlantId,
    /// Kind of plant.
    pub kind: PlantKind,
    /// Cell occupied by the plant.
    pub cell: CellCoord,
    /// Top-left corner of the plant body.
    pub position: Vec2,
    /// Extent of the plant body.
    pub size: Vec2,
    /// Body color.
    pub color: Color,
    /// Remaining health as a fraction of the maximum.
    pub health_ratio: f32,
}

impl PlantPresentation {
    /// Reports whether the plant is damaged enough to show cracks.
    #[must_use]
    pub fn cracked(&self) -> bool {
        self.kind == PlantKind::WallNut && self.health_ratio < 0.5
    }
}

/// Zombie drawn on the lawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombiePresentation {
    /// Identifier allocated to the zombie by the world.
    pub id: ZombieId,
    /// Row the zombie walks along.
    pub row: u32,
    /// Top-left corner of the zombie body.
    pub position: Vec2,
    /// Extent of the zombie body.
    pub size: Vec2,
    /// Body color.
    pub color: Color,
    /// Remaining health as a fraction of the maximum.
    pub health_ratio: f32,
    /// Indicates whether the zombie is eating a plant.
    pub attacking: bool,
}

impl ZombiePresentation {
    /// Health bars are only drawn for injured zombies.
    #[must_use]
    pub fn shows_health_bar(&self) -> bool {
        self.health_ratio < 1.0
    }
}

/// Projectile drawn as a disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the disc.
    pub center: Vec2,
    /// Radius of the disc.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Sun drawn as a disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunPresentation {
    /// Identifier allocated to the sun by the world.
    pub id: SunId,
    /// Source that created the sun.
    pub origin: SunOrigin,
    /// Centre of the disc.
    pub center: Vec2,
    /// Radius of the disc.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Counters and status shown above the lawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Session counters reported by the world.
    pub stats: RunStats,
    /// Plant grown by the next press.
    pub selected_plant: PlantKind,
}

impl Hud {
    /// Short status message describing the current phase.
    #[must_use]
    pub fn status(&self) -> String {
        match self.stats.phase {
            RunPhase::AwaitingDifficulty => "Choose a difficulty".to_owned(),
            RunPhase::Ready => "Press start".to_owned(),
            RunPhase::Running => "Defend the house".to_owned(),
            RunPhase::Paused => "Paused".to_owned(),
            RunPhase::LevelTransition { next } => format!("Level up available: {next}"),
            RunPhase::Lost => "The zombies ate your brains".to_owned(),
        }
    }

    /// Plant menu in seed-bar order, with the selection marked by `>`.
    #[must_use]
    pub fn seed_bar(&self) -> String {
        PlantKind::ALL
            .iter()
            .map(|&kind| {
                let marker = if kind == self.selected_plant { '>' } else { ' ' };
                format!("{marker}{} ({})", kind.label(), kind.cost())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Single-line summary of every counter.
    #[must_use]
    pub fn summary(&self) -> String {
        let difficulty = self
            .stats
            .difficulty
            .map_or_else(|| "-".to_owned(), |difficulty| difficulty.to_string());
        format!(
            "[{difficulty}] sun {} | kills {} | wave {} | time {}s | planting {} | {}",
            self.stats.sun,
            self.stats.kills,
            self.stats.wave,
            self.stats.elapsed.as_secs(),
            self.selected_plant.label(),
            self.status(),
        )
    }
}

/// Player-facing feedback about the most recent interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionFeedback {
    /// A plant was placed.
    PlantPlaced {
        /// Kind of plant that was placed.
        kind: PlantKind,
        /// Cell that now holds the plant.
        cell: CellCoord,
    },
    /// A placement request was rejected.
    PlacementRejected {
        /// Kind of plant requested.
        kind: PlantKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Reason reported by the world.
        reason: PlacementError,
    },
    /// A sun was collected.
    SunCollected {
        /// Amount credited.
        value: u32,
    },
}

impl InteractionFeedback {
    /// Extracts feedback from a world event, if it describes an interaction.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match *event {
            Event::PlantPlaced { kind, cell, .. } => Some(Self::PlantPlaced { kind, cell }),
            Event::PlantPlacementRejected { kind, cell, reason } => {
                Some(Self::PlacementRejected { kind, cell, reason })
            }
            Event::SunCollected { value, .. } => Some(Self::SunCollected { value }),
            _ => None,
        }
    }
}

impl fmt::Display for InteractionFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlantPlaced { kind, cell } => write!(
                f,
                "{} planted at ({}, {})",
                kind.label(),
                cell.column(),
                cell.row()
            ),
            Self::PlacementRejected { kind, reason, .. } => {
                write!(f, "cannot plant {}: {reason}", kind.label())
            }
            Self::SunCollected { value } => write!(f, "+{value} sun"),
        }
    }
}

/// Scene description combining the lawn and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid that composes the play area.
    pub lawn: LawnPresentation,
    /// Plants in collection order.
    pub plants: Vec<PlantPresentation>,
    /// Zombies in collection order.
    pub zombies: Vec<ZombiePresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Uncollected suns.
    pub suns: Vec<SunPresentation>,
    /// Counters shown above the lawn.
    pub hud: Hud,
    /// Feedback about the last interaction, if any.
    pub feedback: Option<InteractionFeedback>,
}

impl Scene {
    /// Creates an empty scene for the provided lawn.
    #[must_use]
    pub fn new(lawn: LawnPresentation, hud: Hud) -> Self {
        Self {
            lawn,
            plants: Vec::new(),
            zombies: Vec::new(),
            projectiles: Vec::new(),
            suns: Vec::new(),
            hud,
            feedback: None,
        }
    }

    /// Replaces the inhabitants with the latest world snapshots.
    pub fn refresh(
        &mut self,
        plants: &PlantView,
        zombies: &ZombieView,
        projectiles: &ProjectileView,
        suns: &SunView,
        hud: Hud,
    ) {
        self.plants.clear();
        self.plants.extend(plants.iter().map(|plant| {
            let health_ratio = plant.health_ratio();
            PlantPresentation {
                id: plant.id,
                kind: plant.kind,
                cell: plant.cell,
                position: rect_origin(plant.bounds),
                size: rect_size(plant.bounds),
                color: plant_color(plant.kind, health_ratio),
                health_ratio,
            }
        }));

        self.zombies.clear();
        self.zombies.extend(zombies.iter().map(|zombie| ZombiePresentation {
            id: zombie.id,
            row: zombie.row,
            position: rect_origin(zombie.bounds),
            size: rect_size(zombie.bounds),
            color: ZOMBIE_COLOR,
            health_ratio: zombie.health_ratio(),
            attacking: zombie.attacking,
        }));

        self.projectiles.clear();
        self.projectiles
            .extend(projectiles.iter().map(|projectile| ProjectilePresentation {
                center: rect_center(projectile.bounds),
                radius: projectile.bounds.width * 0.5,
                color: PROJECTILE_COLOR,
            }));

        self.suns.clear();
        self.suns.extend(
            suns.iter()
                .filter(|sun| !sun.collected)
                .map(|sun| SunPresentation {
                    id: sun.id,
                    origin: sun.origin,
                    center: rect_center(sun.bounds),
                    radius: sun.bounds.width * 0.5,
                    color: SUN_COLOR,
                }),
        );

        self.hud = hud;
    }

    /// Records the latest interaction feedback found in the event stream.
    pub fn note_events(&mut self, events: &[Event]) {
        if let Some(feedback) = events.iter().rev().find_map(InteractionFeedback::from_event) {
            self.feedback = Some(feedback);
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or log header.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lawn Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Grid cells must have a positive size.
    InvalidGridSize {
        /// Provided size that failed validation.
        grid_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridSize { grid_size } => {
                write!(f, "grid_size must be positive (received {grid_size})")
            }
        }
    }
}

impl Error for RenderingError {}
