#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lawn Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod rules;

pub use rules::{
    FieldRules, PlantRules, ProgressionRules, ProjectileRules, Rules, SunRules, ZombieRules,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lawn Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Chooses the difficulty tier for the upcoming run.
    SelectDifficulty {
        /// Tier that governs zombie strength and spawn cadence.
        difficulty: Difficulty,
    },
    /// Requests that the prepared run begins.
    Start,
    /// Flips the run between running and paused.
    TogglePause,
    /// Discards the session and returns to difficulty selection.
    Reset,
    /// Advances the session clock and evaluates level progression.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a zombie enters the lawn on the provided row.
    SpawnZombie {
        /// Zero-based row the zombie walks along.
        row: u32,
    },
    /// Requests that a sun drops from the sky at the provided column offset.
    SpawnSun {
        /// Horizontal position of the sun's left edge.
        x: f32,
    },
    /// Requests that a sunflower releases the sun it finished producing.
    ProduceSun {
        /// Identifier of the producing sunflower.
        plant: PlantId,
    },
    /// Requests that a peashooter fires a projectile.
    FireProjectile {
        /// Identifier of the firing peashooter.
        plant: PlantId,
    },
    /// Moves zombies, projectiles and suns, resolves collisions and prunes.
    AdvanceEntities {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a plant in the provided grid cell.
    PlacePlant {
        /// Kind of plant to grow.
        kind: PlantKind,
        /// Cell the plant should occupy.
        cell: CellCoord,
    },
    /// Attempts to collect a sun under the provided field position.
    CollectSun {
        /// Pointer position expressed in field coordinates.
        point: FieldPoint,
    },
    /// Accepts a pending offer to advance to the next difficulty tier.
    AcceptLevelUp,
    /// Declines a pending offer and keeps playing on the current tier.
    DeclineLevelUp,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms the difficulty tier chosen for the next run.
    DifficultySelected {
        /// Tier that became active.
        difficulty: Difficulty,
    },
    /// Announces that a run began.
    RunStarted {
        /// Tier the run is played on.
        difficulty: Difficulty,
    },
    /// Reports that a start request was refused.
    StartRejected {
        /// Specific reason the start failed.
        reason: StartError,
    },
    /// Announces that the run was paused or resumed.
    PauseToggled {
        /// Indicates whether the run is paused after the toggle.
        paused: bool,
    },
    /// Confirms that the session returned to difficulty selection.
    SessionReset,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a zombie entered the lawn.
    ZombieSpawned {
        /// Identifier assigned to the zombie.
        zombie: ZombieId,
        /// Row the zombie walks along.
        row: u32,
    },
    /// Confirms that a sun appeared on the lawn.
    SunSpawned {
        /// Identifier assigned to the sun.
        sun: SunId,
        /// Source that created the sun.
        origin: SunOrigin,
    },
    /// Confirms that a peashooter fired.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Identifier of the firing peashooter.
        plant: PlantId,
    },
    /// Reports that a zombie was killed by projectile damage.
    ZombieKilled {
        /// Identifier of the zombie that died.
        zombie: ZombieId,
    },
    /// Reports that a plant was eaten.
    PlantDestroyed {
        /// Identifier of the plant that was removed.
        plant: PlantId,
    },
    /// Confirms that a plant was placed on the lawn.
    PlantPlaced {
        /// Identifier assigned to the plant by the world.
        plant: PlantId,
        /// Kind of plant that was placed.
        kind: PlantKind,
        /// Cell occupied by the plant.
        cell: CellCoord,
    },
    /// Reports that a plant placement request was rejected.
    PlantPlacementRejected {
        /// Kind of plant requested for placement.
        kind: PlantKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a sun was collected and credited.
    SunCollected {
        /// Identifier of the collected sun.
        sun: SunId,
        /// Amount credited to the sun balance.
        value: u32,
    },
    /// Announces that the level-up condition was met and a decision is pending.
    LevelUpOffered {
        /// Tier that accepting the offer would activate.
        next: Difficulty,
        /// Play time accumulated on the current tier.
        elapsed: Duration,
        /// Zombies killed on the current tier.
        kills: u32,
    },
    /// Confirms that the session moved to the next tier.
    LevelAdvanced {
        /// Tier that became active.
        difficulty: Difficulty,
        /// Sun balance carried over from the previous tier.
        carried_sun: u32,
    },
    /// Confirms that a pending offer was declined.
    LevelUpDeclined,
    /// Announces that the final tier was cleared.
    CampaignCompleted {
        /// Play time accumulated on the final tier.
        elapsed: Duration,
        /// Zombies killed on the final tier.
        kills: u32,
    },
    /// Announces that a zombie crossed the lawn and the run was lost.
    HouseBreached {
        /// Identifier of the zombie that reached the house.
        zombie: ZombieId,
    },
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a plant.
    PlantId
);
entity_id!(
    /// Unique identifier assigned to a zombie.
    ZombieId
);
entity_id!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);
entity_id!(
    /// Unique identifier assigned to a sun.
    SunId
);

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Position on the lawn expressed in pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    /// Horizontal coordinate growing towards the zombie side.
    pub x: f32,
    /// Vertical coordinate growing downwards.
    pub y: f32,
}

impl FieldPoint {
    /// Creates a new field position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle expressed in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> FieldPoint {
        FieldPoint::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Reports whether two rectangles share interior area.
    ///
    /// Touching edges do not count as an overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: FieldPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns the rectangle shifted by the provided offsets.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Types of plants that can be grown on the lawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantKind {
    /// Produces sun at a fixed cadence.
    Sunflower,
    /// Fires projectiles at zombies ahead in its row.
    Peashooter,
    /// Absorbs damage to hold zombies back.
    WallNut,
}

impl PlantKind {
    /// Every plant kind in menu order.
    pub const ALL: [PlantKind; 3] = [Self::Sunflower, Self::Peashooter, Self::WallNut];

    /// Sun required to grow the plant.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Sunflower => 50,
            Self::Peashooter => 100,
            Self::WallNut => 50,
        }
    }

    /// Health the plant starts with.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Sunflower => 100.0,
            Self::Peashooter => 100.0,
            Self::WallNut => 300.0,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunflower => "sunflower",
            Self::Peashooter => "peashooter",
            Self::WallNut => "wall-nut",
        }
    }
}

impl FromStr for PlantKind {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sunflower" => Ok(Self::Sunflower),
            "peashooter" => Ok(Self::Peashooter),
            "wallnut" | "wall-nut" | "wall_nut" => Ok(Self::WallNut),
            other => Err(ParseNameError::new("plant kind", other)),
        }
    }
}

/// Difficulty tiers ordered from the first to the last level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Slow spawns and generous sun.
    Easy,
    /// Balanced tier.
    Normal,
    /// Frequent, sturdy zombies and scarce sun.
    Hard,
}

impl Difficulty {
    /// Every tier in progression order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Tier that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Easy => Some(Self::Normal),
            Self::Normal => Some(Self::Hard),
            Self::Hard => None,
        }
    }

    /// Numeric parameters governing the tier.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                name: "Easy",
                starting_sun: 200,
                zombie_speed: 0.35,
                zombie_health: 80.0,
                zombie_spawn_interval: Duration::from_millis(8_000),
                sun_spawn_interval: Duration::from_millis(6_000),
                sun_value: 30,
            },
            Self::Normal => DifficultyProfile {
                name: "Normal",
                starting_sun: 100,
                zombie_speed: 0.3,
                zombie_health: 100.0,
                zombie_spawn_interval: Duration::from_millis(5_000),
                sun_spawn_interval: Duration::from_millis(8_000),
                sun_value: 25,
            },
            Self::Hard => DifficultyProfile {
                name: "Hard",
                starting_sun: 50,
                zombie_speed: 0.4,
                zombie_health: 120.0,
                zombie_spawn_interval: Duration::from_millis(3_000),
                sun_spawn_interval: Duration::from_millis(10_000),
                sun_value: 20,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().name)
    }
}

impl FromStr for Difficulty {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" | "medium" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            other => Err(ParseNameError::new("difficulty", other)),
        }
    }
}

/// Immutable parameters of a difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    /// Display name of the tier.
    pub name: &'static str,
    /// Sun balance granted when the tier is selected.
    pub starting_sun: u32,
    /// Pixels a zombie walks per tick.
    pub zombie_speed: f32,
    /// Health a zombie spawns with.
    pub zombie_health: f32,
    /// Time that must be exceeded between zombie spawns.
    pub zombie_spawn_interval: Duration,
    /// Time that must be exceeded between sky sun drops.
    pub sun_spawn_interval: Duration,
    /// Sun credited per collected sun.
    pub sun_value: u32,
}

/// Error produced when a textual name does not match any known variant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {category} '{value}'")]
pub struct ParseNameError {
    category: &'static str,
    value: String,
}

impl ParseNameError {
    fn new(category: &'static str, value: &str) -> Self {
        Self {
            category,
            value: value.to_owned(),
        }
    }
}

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// No difficulty chosen yet.
    AwaitingDifficulty,
    /// Difficulty chosen, waiting for the start request.
    Ready,
    /// Frames advance the simulation.
    Running,
    /// Frames are ignored until the run is resumed.
    Paused,
    /// Level-up condition met; waiting for the player's decision.
    LevelTransition {
        /// Tier offered to the player.
        next: Difficulty,
    },
    /// A zombie reached the house; only a reset leaves this phase.
    Lost,
}

impl RunPhase {
    /// Reports whether frames currently advance the simulation.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Origin of a sun.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SunOrigin {
    /// Dropped from the sky by the spawner.
    Sky,
    /// Released by a sunflower.
    Plant(PlantId),
}

/// Reasons a plant placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The run is not in progress, so placement is disabled.
    #[error("plants can only be placed while the run is in progress")]
    InvalidPhase,
    /// The requested cell lies beyond the configured grid bounds.
    #[error("cell lies outside the lawn")]
    OutOfBounds,
    /// The requested cell already holds a plant.
    #[error("cell already holds a plant")]
    Occupied,
    /// The sun balance does not cover the plant's cost.
    #[error("not enough sun: {cost} required, {balance} available")]
    InsufficientSun {
        /// Cost of the requested plant.
        cost: u32,
        /// Balance at the time of the request.
        balance: u32,
    },
}

/// Reasons a start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum StartError {
    /// No difficulty has been selected yet.
    #[error("select a difficulty before starting")]
    NoDifficulty,
    /// A run is already in progress or paused.
    #[error("a run is already in progress")]
    AlreadyRunning,
    /// A level-up decision is pending.
    #[error("a level-up decision is pending")]
    DecisionPending,
    /// The run was lost and must be reset first.
    #[error("the run is over; reset to play again")]
    RunOver,
}

/// Immutable representation of a single plant's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantSnapshot {
    /// Identifier allocated to the plant by the world.
    pub id: PlantId,
    /// Kind of plant.
    pub kind: PlantKind,
    /// Cell occupied by the plant.
    pub cell: CellCoord,
    /// Pixel bounds of the plant body.
    pub bounds: Rect,
    /// Remaining health.
    pub health: f32,
    /// Health the plant started with.
    pub max_health: f32,
    /// Time accumulated towards the plant's next action.
    pub action_timer: Duration,
}

impl PlantSnapshot {
    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        health_ratio(self.health, self.max_health)
    }
}

/// Immutable representation of a single zombie's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Identifier allocated to the zombie by the world.
    pub id: ZombieId,
    /// Row the zombie walks along.
    pub row: u32,
    /// Pixel bounds of the zombie body.
    pub bounds: Rect,
    /// Remaining health.
    pub health: f32,
    /// Health the zombie spawned with.
    pub max_health: f32,
    /// Pixels walked per tick.
    pub speed: f32,
    /// Indicates whether the zombie is eating a plant.
    pub attacking: bool,
    /// Time accumulated in the current attack cycle.
    pub attack_timer: Duration,
}

impl ZombieSnapshot {
    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        health_ratio(self.health, self.max_health)
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Peashooter that fired the projectile.
    pub plant: PlantId,
    /// Pixel bounds of the projectile.
    pub bounds: Rect,
    /// Health removed from the zombie that is hit.
    pub damage: f32,
}

/// Immutable representation of a single sun's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunSnapshot {
    /// Identifier allocated to the sun by the world.
    pub id: SunId,
    /// Source that created the sun.
    pub origin: SunOrigin,
    /// Pixel bounds of the sun.
    pub bounds: Rect,
    /// Indicates whether the sun was collected or expired.
    pub collected: bool,
    /// Time the sun has existed.
    pub age: Duration,
    /// Time after which the sun expires.
    pub lifetime: Duration,
}

macro_rules! snapshot_view {
    ($(#[$meta:meta])* $view:ident, $snapshot:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default)]
        pub struct $view {
            snapshots: Vec<$snapshot>,
        }

        impl $view {
            /// Creates a new view from the provided snapshots.
            #[must_use]
            pub fn from_snapshots(mut snapshots: Vec<$snapshot>) -> Self {
                snapshots.sort_by_key(|snapshot| snapshot.id);
                Self { snapshots }
            }

            /// Iterator over the captured snapshots in collection order.
            pub fn iter(&self) -> impl Iterator<Item = &$snapshot> {
                self.snapshots.iter()
            }

            /// Number of captured snapshots.
            #[must_use]
            pub fn len(&self) -> usize {
                self.snapshots.len()
            }

            /// Reports whether the view is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.snapshots.is_empty()
            }

            /// Consumes the view, yielding the underlying snapshots.
            #[must_use]
            pub fn into_vec(self) -> Vec<$snapshot> {
                self.snapshots
            }
        }
    };
}

snapshot_view!(
    /// Read-only snapshot describing all plants on the lawn.
    PlantView,
    PlantSnapshot
);
snapshot_view!(
    /// Read-only snapshot describing all zombies on the lawn.
    ZombieView,
    ZombieSnapshot
);
snapshot_view!(
    /// Read-only snapshot describing all projectiles in flight.
    ProjectileView,
    ProjectileSnapshot
);
snapshot_view!(
    /// Read-only snapshot describing all suns on the lawn.
    SunView,
    SunSnapshot
);

/// Session counters exposed for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunStats {
    /// Current lifecycle phase.
    pub phase: RunPhase,
    /// Selected tier, if any.
    pub difficulty: Option<Difficulty>,
    /// Spendable sun balance.
    pub sun: u32,
    /// Zombies killed on the current tier.
    pub kills: u32,
    /// One-based wave number on the current tier.
    pub wave: u32,
    /// Play time accumulated on the current tier.
    pub elapsed: Duration,
}

fn health_ratio(health: f32, max_health: f32) -> f32 {
    if max_health <= 0.0 {
        return 0.0;
    }
    (health / max_health).clamp(0.0, 1.0)
}
