#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that wires the authoritative world to its pure systems.
//!
//! [`Simulation`] owns the [`World`] together with the spawning, plant action
//! and pointer systems. Hosts call [`Simulation::tick`] once per frame with a
//! monotonically increasing timestamp, or [`Simulation::advance`] with a fixed
//! delta, and issue player intents through the facade methods. Every frame
//! runs synchronously on the caller's thread.

mod clock;

use std::time::Duration;

use lawn_defence_core::{
    CellCoord, Command, Difficulty, Event, FieldPoint, PlacementError, PlantId, PlantKind,
    PlantView, ProjectileView, Rules, RunPhase, RunStats, StartError, SunId, SunView, ZombieView,
};
use lawn_defence_system_plant_actions::PlantActions;
use lawn_defence_system_pointer::Pointer;
use lawn_defence_system_spawning::{Config as SpawningConfig, Spawning};
use lawn_defence_world::{self as world, query, World};

use clock::FrameClock;

/// Configuration parameters required to construct a simulation.
#[derive(Clone, Debug, Default)]
pub struct Config {
    rng_seed: u64,
    rules: Rules,
}

impl Config {
    /// Creates a configuration with the shipped rules and the provided seed.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            rules: Rules::default(),
        }
    }

    /// Replaces the rule set used by the world and its systems.
    #[must_use]
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }
}

/// Single-threaded session driver.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    plant_actions: PlantActions,
    pointer: Pointer,
    clock: FrameClock,
    events: Vec<Event>,
    commands: Vec<Command>,
    journal: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation that awaits a difficulty choice.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            world: World::with_rules(config.rules),
            spawning: Spawning::new(SpawningConfig::new(config.rng_seed)),
            plant_actions: PlantActions::new(),
            pointer: Pointer::new(),
            clock: FrameClock::default(),
            events: Vec::new(),
            commands: Vec::new(),
            journal: Vec::new(),
        }
    }

    /// Chooses the tier for the next run. Ignored once a run has started.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.dispatch(Command::SelectDifficulty { difficulty });
    }

    /// Starts the prepared run.
    ///
    /// # Errors
    ///
    /// Returns the reason reported by the world when the session is not ready.
    pub fn start(&mut self) -> Result<(), StartError> {
        let first = self.events.len();
        self.execute(Command::Start);
        let rejection = self.events[first..].iter().find_map(|event| match event {
            Event::StartRejected { reason } => Some(*reason),
            _ => None,
        });
        self.settle();

        match rejection {
            Some(reason) => {
                log::warn!("start refused: {reason}");
                Err(reason)
            }
            None => {
                self.clock.reset();
                Ok(())
            }
        }
    }

    /// Flips between running and paused and returns the resulting phase.
    pub fn toggle_pause(&mut self) -> RunPhase {
        self.dispatch(Command::TogglePause);
        self.clock.reset();
        self.phase()
    }

    /// Discards the session and returns to difficulty selection.
    pub fn reset(&mut self) {
        self.dispatch(Command::Reset);
        self.clock.reset();
    }

    /// Accepts a pending offer to advance to the next tier.
    pub fn accept_level_up(&mut self) {
        self.dispatch(Command::AcceptLevelUp);
        self.clock.reset();
    }

    /// Declines a pending offer and keeps playing on the current tier.
    pub fn decline_level_up(&mut self) {
        self.dispatch(Command::DeclineLevelUp);
        self.clock.reset();
    }

    /// Chooses the plant kind grown by subsequent pointer presses.
    pub fn select_plant(&mut self, kind: PlantKind) {
        self.pointer.select(kind);
    }

    /// Plant kind grown by the next pointer press on an empty spot.
    #[must_use]
    pub fn selected_plant(&self) -> PlantKind {
        self.pointer.selected()
    }

    /// Places a plant in the provided cell.
    ///
    /// # Errors
    ///
    /// Returns the reason the world rejected the placement; state is untouched.
    pub fn place_plant(
        &mut self,
        kind: PlantKind,
        cell: CellCoord,
    ) -> Result<PlantId, PlacementError> {
        let first = self.events.len();
        self.execute(Command::PlacePlant { kind, cell });
        let result = self.events[first..]
            .iter()
            .find_map(|event| match event {
                Event::PlantPlaced { plant, .. } => Some(Ok(*plant)),
                Event::PlantPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::InvalidPhase));
        self.settle();
        result
    }

    /// Collects the first uncollected sun under the provided point.
    pub fn collect_sun(&mut self, point: FieldPoint) -> Option<SunId> {
        let first = self.events.len();
        self.execute(Command::CollectSun { point });
        let collected = self.events[first..].iter().find_map(|event| match event {
            Event::SunCollected { sun, .. } => Some(*sun),
            _ => None,
        });
        self.settle();
        collected
    }

    /// Routes a pointer press through the pointer system.
    pub fn press(&mut self, point: FieldPoint) {
        self.commands.clear();
        let field = &query::rules(&self.world).field;
        self.pointer.handle(
            query::phase(&self.world),
            Some(point),
            &query::sun_view(&self.world),
            field,
            &mut self.commands,
        );
        self.flush_commands();
        self.settle();
    }

    /// Submits a raw command, bypassing the facade.
    pub fn submit(&mut self, command: Command) {
        self.dispatch(command);
    }

    /// Advances the simulation to the provided host timestamp.
    ///
    /// Frames outside a running session are ignored. The first frame after a
    /// start, resume or level decision has zero delta.
    pub fn tick(&mut self, now: Duration) {
        if !query::phase(&self.world).is_running() {
            self.clock.reset();
            return;
        }

        let dt = self.clock.delta(now);
        self.advance(dt);
    }

    /// Runs one frame with a fixed delta.
    pub fn advance(&mut self, dt: Duration) {
        self.execute(Command::Tick { dt });
        if !query::phase(&self.world).is_running() {
            self.settle();
            return;
        }

        self.run_spawning();
        self.run_plant_actions();
        self.execute(Command::AdvanceEntities { dt });

        if query::phase(&self.world) == RunPhase::Lost {
            log::info!("run lost after {:?}", query::stats(&self.world).elapsed);
        }
        self.publish();
    }

    /// Removes and returns every event produced since the previous call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.journal)
    }

    /// Read-only access to the authoritative world for additional queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Rule set the session runs under.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        query::rules(&self.world)
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        query::phase(&self.world)
    }

    /// Counters displayed by the HUD.
    #[must_use]
    pub fn stats(&self) -> RunStats {
        query::stats(&self.world)
    }

    /// Snapshot of the plants on the lawn.
    #[must_use]
    pub fn plant_view(&self) -> PlantView {
        query::plant_view(&self.world)
    }

    /// Snapshot of the zombies on the lawn.
    #[must_use]
    pub fn zombie_view(&self) -> ZombieView {
        query::zombie_view(&self.world)
    }

    /// Snapshot of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Snapshot of the suns on the lawn.
    #[must_use]
    pub fn sun_view(&self) -> SunView {
        query::sun_view(&self.world)
    }

    fn execute(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn dispatch(&mut self, command: Command) {
        self.execute(command);
        self.settle();
    }

    /// Lets the spawner observe lifecycle events outside a frame, then publishes.
    fn settle(&mut self) {
        self.run_spawning();
        self.publish();
    }

    fn run_spawning(&mut self) {
        self.commands.clear();
        let rules = query::rules(&self.world);
        self.spawning.handle(
            &self.events,
            query::phase(&self.world),
            query::profile(&self.world),
            &rules.field,
            &rules.suns,
            &mut self.commands,
        );
        self.flush_commands();
    }

    fn run_plant_actions(&mut self) {
        self.commands.clear();
        self.plant_actions.handle(
            query::phase(&self.world),
            &query::plant_view(&self.world),
            &query::zombie_view(&self.world),
            &query::rules(&self.world).plants,
            &mut self.commands,
        );
        self.flush_commands();
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn publish(&mut self) {
        self.journal.append(&mut self.events);
    }
}
