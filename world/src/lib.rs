#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lawn Defence.

mod plants;
mod progression;
mod projectiles;
mod suns;
mod zombies;

use std::time::Duration;

use lawn_defence_core::{
    CellCoord, Command, Difficulty, DifficultyProfile, Event, FieldPoint, PlacementError, PlantId,
    PlantKind, ProjectileId, Rect, Rules, RunPhase, StartError, SunId, SunOrigin, ZombieId,
    WELCOME_BANNER,
};
use lawn_defence_system_collision::{
    Collision, CollisionOutcome, PlantBody, ProjectileBody, ZombieBody,
};

use plants::PlantRegistry;
use progression::Progression;
use projectiles::Projectile;
use suns::Sun;
use zombies::Zombie;

/// Represents the authoritative Lawn Defence session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    phase: RunPhase,
    difficulty: Option<Difficulty>,
    sun: u32,
    progression: Progression,
    plants: PlantRegistry,
    zombies: Vec<Zombie>,
    projectiles: Vec<Projectile>,
    suns: Vec<Sun>,
    next_zombie_id: ZombieId,
    next_projectile_id: ProjectileId,
    next_sun_id: SunId,
    collision: Collision,
    contacts: ContactScratch,
}

#[derive(Debug, Default)]
struct ContactScratch {
    projectiles: Vec<ProjectileBody>,
    zombies: Vec<ZombieBody>,
    plants: Vec<PlantBody>,
    outcome: CollisionOutcome,
}

impl World {
    /// Creates a new world using the shipped rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a new world that awaits a difficulty choice under the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        Self {
            banner: WELCOME_BANNER,
            rules,
            phase: RunPhase::AwaitingDifficulty,
            difficulty: None,
            sun: 0,
            progression: Progression::default(),
            plants: PlantRegistry::new(),
            zombies: Vec::new(),
            projectiles: Vec::new(),
            suns: Vec::new(),
            next_zombie_id: ZombieId::new(0),
            next_projectile_id: ProjectileId::new(0),
            next_sun_id: SunId::new(0),
            collision: Collision::new(),
            contacts: ContactScratch::default(),
        }
    }

    fn profile(&self) -> Option<DifficultyProfile> {
        self.difficulty.map(Difficulty::profile)
    }

    fn clear_lawn(&mut self) {
        self.plants.clear();
        self.zombies.clear();
        self.projectiles.clear();
        self.suns.clear();
    }

    fn reset_session(&mut self) {
        self.clear_lawn();
        self.progression.reset();
        self.phase = RunPhase::AwaitingDifficulty;
        self.difficulty = None;
        self.sun = 0;
    }

    fn allocate_zombie_id(&mut self) -> ZombieId {
        let id = self.next_zombie_id;
        self.next_zombie_id = ZombieId::new(id.get().wrapping_add(1));
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        id
    }

    fn allocate_sun_id(&mut self) -> SunId {
        let id = self.next_sun_id;
        self.next_sun_id = SunId::new(id.get().wrapping_add(1));
        id
    }

    fn select_difficulty(&mut self, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        if !matches!(self.phase, RunPhase::AwaitingDifficulty | RunPhase::Ready) {
            log::debug!("ignoring difficulty selection during {:?}", self.phase);
            return;
        }

        self.difficulty = Some(difficulty);
        self.sun = difficulty.profile().starting_sun;
        self.phase = RunPhase::Ready;
        log::info!("difficulty {difficulty} selected with {} sun", self.sun);
        out_events.push(Event::DifficultySelected { difficulty });
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        let rejection = match self.phase {
            RunPhase::Ready => None,
            RunPhase::AwaitingDifficulty => Some(StartError::NoDifficulty),
            RunPhase::Running | RunPhase::Paused => Some(StartError::AlreadyRunning),
            RunPhase::LevelTransition { .. } => Some(StartError::DecisionPending),
            RunPhase::Lost => Some(StartError::RunOver),
        };

        match (rejection, self.difficulty) {
            (None, Some(difficulty)) => {
                self.progression.reset();
                self.phase = RunPhase::Running;
                log::info!("run started on {difficulty}");
                out_events.push(Event::RunStarted { difficulty });
            }
            (Some(reason), _) => {
                log::debug!("start rejected: {reason}");
                out_events.push(Event::StartRejected { reason });
            }
            (None, None) => {
                out_events.push(Event::StartRejected {
                    reason: StartError::NoDifficulty,
                });
            }
        }
    }

    fn toggle_pause(&mut self, out_events: &mut Vec<Event>) {
        let paused = match self.phase {
            RunPhase::Running => true,
            RunPhase::Paused => false,
            _ => return,
        };

        self.phase = if paused {
            RunPhase::Paused
        } else {
            RunPhase::Running
        };
        out_events.push(Event::PauseToggled { paused });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }
        let Some(difficulty) = self.difficulty else {
            return;
        };

        self.progression.advance(dt);

        if self.progression.level_up_due(&self.rules.progression) {
            let elapsed = self.progression.elapsed;
            let kills = self.progression.kills;
            match difficulty.next() {
                Some(next) => {
                    self.phase = RunPhase::LevelTransition { next };
                    log::info!("level-up to {next} offered after {elapsed:?} and {kills} kills");
                    out_events.push(Event::LevelUpOffered {
                        next,
                        elapsed,
                        kills,
                    });
                }
                None => {
                    log::info!("campaign completed after {elapsed:?} and {kills} kills");
                    out_events.push(Event::CampaignCompleted { elapsed, kills });
                    self.reset_session();
                    out_events.push(Event::SessionReset);
                }
            }
            return;
        }

        for plant in self.plants.iter_mut() {
            plant.accrue(dt);
        }
        out_events.push(Event::TimeAdvanced { dt });
    }

    fn spawn_zombie(&mut self, row: u32, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }
        let Some(profile) = self.profile() else {
            return;
        };
        if row >= self.rules.field.rows {
            log::warn!("discarding zombie spawn on missing row {row}");
            return;
        }

        let rules = &self.rules.zombies;
        let bounds = Rect::new(
            self.rules.field.width(),
            self.rules.field.row_top(row) + rules.row_inset,
            rules.width,
            rules.height,
        );
        let id = self.allocate_zombie_id();
        self.zombies.push(Zombie {
            id,
            row,
            bounds,
            health: profile.zombie_health,
            max_health: profile.zombie_health,
            speed: profile.zombie_speed,
            attacking: false,
            attack_timer: Duration::ZERO,
        });
        self.progression.record_spawn();
        log::debug!("zombie {} entered row {row}", id.get());
        out_events.push(Event::ZombieSpawned { zombie: id, row });
    }

    fn spawn_sun(&mut self, x: f32, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }

        let rules = &self.rules.suns;
        let bounds = Rect::new(x, rules.spawn_y, rules.size, rules.size);
        let fall_speed = rules.fall_speed;
        let lifetime = rules.lifetime();
        self.push_sun(SunOrigin::Sky, bounds, fall_speed, lifetime, out_events);
    }

    fn produce_sun(&mut self, plant_id: PlantId, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }

        let interval = self.rules.plants.production_interval();
        let offset = self.rules.plants.produced_sun_offset;
        let Some(plant) = self.plants.get_mut(plant_id) else {
            return;
        };
        if plant.kind != PlantKind::Sunflower || plant.action_timer < interval {
            return;
        }
        plant.action_timer = Duration::ZERO;
        let origin = plant.bounds.translated(offset, offset);

        let size = self.rules.suns.size;
        let lifetime = self.rules.suns.produced_lifetime();
        let bounds = Rect::new(origin.x, origin.y, size, size);
        self.push_sun(SunOrigin::Plant(plant_id), bounds, 0.0, lifetime, out_events);
    }

    fn push_sun(
        &mut self,
        origin: SunOrigin,
        bounds: Rect,
        fall_speed: f32,
        lifetime: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_sun_id();
        self.suns.push(Sun {
            id,
            origin,
            bounds,
            fall_speed,
            collected: false,
            age: Duration::ZERO,
            lifetime,
        });
        out_events.push(Event::SunSpawned { sun: id, origin });
    }

    fn fire_projectile(&mut self, plant_id: PlantId, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }

        let interval = self.rules.plants.shoot_interval();
        let muzzle_x = self.rules.plants.muzzle_offset_x;
        let muzzle_y = self.rules.plants.muzzle_offset_y;
        let Some(plant) = self.plants.get_mut(plant_id) else {
            return;
        };
        if plant.kind != PlantKind::Peashooter || plant.action_timer < interval {
            return;
        }
        plant.action_timer = Duration::ZERO;
        let muzzle = plant.bounds.translated(muzzle_x, muzzle_y);

        let rules = &self.rules.projectiles;
        let bounds = Rect::new(muzzle.x, muzzle.y, rules.size, rules.size);
        let speed = rules.speed;
        let damage = rules.damage;
        let id = self.allocate_projectile_id();
        self.projectiles.push(Projectile {
            id,
            plant: plant_id,
            bounds,
            speed,
            damage,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            plant: plant_id,
        });
    }

    fn advance_entities(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }

        for zombie in &mut self.zombies {
            zombie.advance(dt, &self.rules.zombies);
        }
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
        for sun in &mut self.suns {
            sun.advance(dt);
        }

        self.resolve_contacts(out_events);
        self.prune();
        self.check_breach(out_events);
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let contacts = &mut self.contacts;
        contacts.projectiles.clear();
        contacts
            .projectiles
            .extend(self.projectiles.iter().map(|projectile| ProjectileBody {
                id: projectile.id,
                bounds: projectile.bounds,
                damage: projectile.damage,
            }));
        contacts.zombies.clear();
        contacts
            .zombies
            .extend(self.zombies.iter().map(|zombie| ZombieBody {
                id: zombie.id,
                bounds: zombie.bounds,
                health: zombie.health,
            }));
        contacts.plants.clear();
        contacts
            .plants
            .extend(self.plants.iter().map(|plant| PlantBody {
                id: plant.id,
                bounds: plant.bounds,
                health: plant.health,
            }));

        self.collision.resolve(
            &contacts.projectiles,
            &contacts.zombies,
            &contacts.plants,
            self.rules.zombies.bite_damage,
            &mut contacts.outcome,
        );

        let outcome = &contacts.outcome;
        self.projectiles
            .retain(|projectile| !outcome.spent_projectiles.contains(&projectile.id));

        self.zombies
            .retain(|zombie| !outcome.killed_zombies.contains(&zombie.id));
        for (zombie, state) in self.zombies.iter_mut().zip(&outcome.zombies) {
            zombie.health = state.health;
            if zombie.attacking && !state.attacking {
                zombie.attack_timer = Duration::ZERO;
            }
            zombie.attacking = state.attacking;
        }
        self.progression.record_kills(outcome.killed_zombies.len());
        for zombie in &outcome.killed_zombies {
            log::debug!("zombie {} killed", zombie.get());
            out_events.push(Event::ZombieKilled { zombie: *zombie });
        }

        for (plant_id, health) in &outcome.bitten_plants {
            if let Some(plant) = self.plants.get_mut(*plant_id) {
                plant.health = *health;
            }
        }
        for plant_id in &outcome.destroyed_plants {
            if self.plants.remove(*plant_id).is_some() {
                log::debug!("plant {} eaten", plant_id.get());
                out_events.push(Event::PlantDestroyed { plant: *plant_id });
            }
        }
    }

    fn prune(&mut self) {
        let width = self.rules.field.width();
        let sun_floor = self.rules.field.height() + self.rules.suns.despawn_margin;
        let despawn_x = self.rules.zombies.despawn_x;

        self.projectiles
            .retain(|projectile| projectile.in_flight(width));
        self.suns
            .retain(|sun| sun.is_live() && sun.bounds.y < sun_floor);
        self.zombies
            .retain(|zombie| zombie.bounds.x > despawn_x && zombie.health > 0.0);
    }

    fn check_breach(&mut self, out_events: &mut Vec<Event>) {
        let Some(zombie) = self.zombies.iter().find(|zombie| zombie.bounds.x < 0.0) else {
            return;
        };

        let zombie = zombie.id;
        self.phase = RunPhase::Lost;
        log::info!("zombie {} reached the house; run lost", zombie.get());
        out_events.push(Event::HouseBreached { zombie });
    }

    fn place_plant(&mut self, kind: PlantKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.validate_placement(kind, cell) {
            Ok(()) => {
                let bounds = self.rules.plants.bounds_for(&self.rules.field, cell);
                let plant = self.plants.insert(kind, cell, bounds);
                self.sun -= kind.cost();
                log::debug!(
                    "{} planted at ({}, {})",
                    kind.label(),
                    cell.column(),
                    cell.row()
                );
                out_events.push(Event::PlantPlaced { plant, kind, cell });
            }
            Err(reason) => {
                log::debug!("placement of {} rejected: {reason}", kind.label());
                out_events.push(Event::PlantPlacementRejected { kind, cell, reason });
            }
        }
    }

    fn validate_placement(&self, kind: PlantKind, cell: CellCoord) -> Result<(), PlacementError> {
        if !self.phase.is_running() {
            return Err(PlacementError::InvalidPhase);
        }
        if !self.rules.field.contains_cell(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.plants.is_occupied(cell) {
            return Err(PlacementError::Occupied);
        }
        let cost = kind.cost();
        if self.sun < cost {
            return Err(PlacementError::InsufficientSun {
                cost,
                balance: self.sun,
            });
        }
        Ok(())
    }

    fn collect_sun(&mut self, point: FieldPoint, out_events: &mut Vec<Event>) {
        if !self.phase.is_running() {
            return;
        }
        let Some(profile) = self.profile() else {
            return;
        };
        let Some(sun) = self.suns.iter_mut().find(|sun| sun.hit(point)) else {
            return;
        };

        sun.collected = true;
        let value = profile.sun_value;
        self.sun = self.sun.saturating_add(value);
        out_events.push(Event::SunCollected { sun: sun.id, value });
    }

    fn accept_level_up(&mut self, out_events: &mut Vec<Event>) {
        let RunPhase::LevelTransition { next } = self.phase else {
            return;
        };

        let carried_sun = self.rules.progression.carried_sun(self.sun);
        self.clear_lawn();
        self.progression.reset();
        self.difficulty = Some(next);
        self.sun = carried_sun;
        self.phase = RunPhase::Running;
        log::info!("advanced to {next} carrying {carried_sun} sun");
        out_events.push(Event::LevelAdvanced {
            difficulty: next,
            carried_sun,
        });
    }

    fn decline_level_up(&mut self, out_events: &mut Vec<Event>) {
        if !matches!(self.phase, RunPhase::LevelTransition { .. }) {
            return;
        }

        self.progression.decline(&self.rules.progression);
        self.phase = RunPhase::Running;
        log::info!("level-up declined");
        out_events.push(Event::LevelUpDeclined);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectDifficulty { difficulty } => {
            world.select_difficulty(difficulty, out_events);
        }
        Command::Start => world.start(out_events),
        Command::TogglePause => world.toggle_pause(out_events),
        Command::Reset => {
            world.reset_session();
            log::info!("session reset");
            out_events.push(Event::SessionReset);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnZombie { row } => world.spawn_zombie(row, out_events),
        Command::SpawnSun { x } => world.spawn_sun(x, out_events),
        Command::ProduceSun { plant } => world.produce_sun(plant, out_events),
        Command::FireProjectile { plant } => world.fire_projectile(plant, out_events),
        Command::AdvanceEntities { dt } => world.advance_entities(dt, out_events),
        Command::PlacePlant { kind, cell } => world.place_plant(kind, cell, out_events),
        Command::CollectSun { point } => world.collect_sun(point, out_events),
        Command::AcceptLevelUp => world.accept_level_up(out_events),
        Command::DeclineLevelUp => world.decline_level_up(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use lawn_defence_core::{
        CellCoord, Difficulty, DifficultyProfile, PlantId, PlantView, ProjectileView, Rules,
        RunPhase, RunStats, SunView, ZombieView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the rule set the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> RunPhase {
        world.phase
    }

    /// Selected difficulty tier, if any.
    #[must_use]
    pub fn difficulty(world: &World) -> Option<Difficulty> {
        world.difficulty
    }

    /// Parameters of the active tier, if any.
    #[must_use]
    pub fn profile(world: &World) -> Option<DifficultyProfile> {
        world.profile()
    }

    /// Spendable sun balance.
    #[must_use]
    pub fn sun_balance(world: &World) -> u32 {
        world.sun
    }

    /// Captures the counters displayed by the HUD.
    #[must_use]
    pub fn stats(world: &World) -> RunStats {
        RunStats {
            phase: world.phase,
            difficulty: world.difficulty,
            sun: world.sun,
            kills: world.progression.kills,
            wave: world.progression.wave(&world.rules.progression),
            elapsed: world.progression.elapsed,
        }
    }

    /// Captures a read-only view of the plants on the lawn.
    #[must_use]
    pub fn plant_view(world: &World) -> PlantView {
        PlantView::from_snapshots(world.plants.iter().map(|plant| plant.snapshot()).collect())
    }

    /// Captures a read-only view of the zombies on the lawn.
    #[must_use]
    pub fn zombie_view(world: &World) -> ZombieView {
        ZombieView::from_snapshots(world.zombies.iter().map(|zombie| zombie.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the suns on the lawn.
    #[must_use]
    pub fn sun_view(world: &World) -> SunView {
        SunView::from_snapshots(world.suns.iter().map(|sun| sun.snapshot()).collect())
    }

    /// Returns the plant rooted in the provided cell, if any.
    #[must_use]
    pub fn plant_at(world: &World, cell: CellCoord) -> Option<PlantId> {
        world.plants.at(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_world(difficulty: Difficulty) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SelectDifficulty { difficulty },
            &mut events,
        );
        apply(&mut world, Command::Start, &mut events);
        events.clear();
        (world, events)
    }

    fn frame(world: &mut World, dt: Duration, events: &mut Vec<Event>) {
        apply(world, Command::Tick { dt }, events);
        if world.phase.is_running() {
            apply(world, Command::AdvanceEntities { dt }, events);
        }
    }

    #[test]
    fn new_world_awaits_difficulty() {
        let world = World::new();
        assert_eq!(query::phase(&world), RunPhase::AwaitingDifficulty);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::sun_balance(&world), 0);
    }

    #[test]
    fn selecting_difficulty_grants_starting_sun() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SelectDifficulty {
                difficulty: Difficulty::Easy,
            },
            &mut events,
        );

        assert_eq!(query::phase(&world), RunPhase::Ready);
        assert_eq!(query::sun_balance(&world), 200);
        assert_eq!(
            events,
            vec![Event::DifficultySelected {
                difficulty: Difficulty::Easy
            }]
        );
    }

    #[test]
    fn start_without_difficulty_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);

        assert_eq!(
            events,
            vec![Event::StartRejected {
                reason: StartError::NoDifficulty
            }]
        );
        assert_eq!(query::phase(&world), RunPhase::AwaitingDifficulty);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(&mut world, Command::Start, &mut events);
        assert_eq!(
            events,
            vec![Event::StartRejected {
                reason: StartError::AlreadyRunning
            }]
        );
    }

    #[test]
    fn paused_world_ignores_ticks() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(&mut world, Command::TogglePause, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::PauseToggled { paused: true }]);
        assert_eq!(query::stats(&world).elapsed, Duration::ZERO);
    }

    #[test]
    fn placement_debits_cost_and_blocks_cell() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        let cell = CellCoord::new(1, 1);
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::WallNut,
                cell,
            },
            &mut events,
        );

        assert_eq!(query::sun_balance(&world), 50);
        assert!(query::plant_at(&world, cell).is_some());
        assert_eq!(
            events[1],
            Event::PlantPlacementRejected {
                kind: PlantKind::WallNut,
                cell,
                reason: PlacementError::Occupied,
            }
        );
    }

    #[test]
    fn placement_outside_grid_is_rejected() {
        let (mut world, mut events) = running_world(Difficulty::Easy);
        let cell = CellCoord::new(12, 0);
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlantPlacementRejected {
                kind: PlantKind::Sunflower,
                cell,
                reason: PlacementError::OutOfBounds,
            }]
        );
        assert_eq!(query::sun_balance(&world), 200);
    }

    #[test]
    fn placement_before_start_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SelectDifficulty {
                difficulty: Difficulty::Easy,
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );

        assert!(matches!(
            events.as_slice(),
            [Event::PlantPlacementRejected {
                reason: PlacementError::InvalidPhase,
                ..
            }]
        ));
    }

    #[test]
    fn zombie_spawns_at_far_edge_of_row() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(&mut world, Command::SpawnZombie { row: 3 }, &mut events);

        let zombies = query::zombie_view(&world).into_vec();
        assert_eq!(zombies.len(), 1);
        assert_eq!(zombies[0].bounds, Rect::new(900.0, 235.0, 50.0, 60.0));
        assert_eq!(zombies[0].health, 100.0);
        assert_eq!(zombies[0].speed, 0.3);
    }

    #[test]
    fn zombie_on_missing_row_is_discarded() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(&mut world, Command::SpawnZombie { row: 8 }, &mut events);
        assert!(events.is_empty());
        assert!(query::zombie_view(&world).is_empty());
    }

    #[test]
    fn sunflower_cannot_produce_before_interval() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );
        let plant = query::plant_at(&world, CellCoord::new(0, 0)).expect("planted");

        apply(&mut world, Command::ProduceSun { plant }, &mut events);
        assert!(query::sun_view(&world).is_empty());

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(5_000),
            },
            &mut events,
        );
        apply(&mut world, Command::ProduceSun { plant }, &mut events);

        let suns = query::sun_view(&world).into_vec();
        assert_eq!(suns.len(), 1);
        assert_eq!(suns[0].bounds, Rect::new(22.0, 22.0, 30.0, 30.0));
        assert_eq!(suns[0].origin, SunOrigin::Plant(plant));
        assert_eq!(suns[0].lifetime, Duration::from_millis(8_000));
    }

    #[test]
    fn peashooter_fires_from_muzzle() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Peashooter,
                cell: CellCoord::new(0, 2),
            },
            &mut events,
        );
        let plant = query::plant_at(&world, CellCoord::new(0, 2)).expect("planted");
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(2_000),
            },
            &mut events,
        );
        apply(&mut world, Command::FireProjectile { plant }, &mut events);
        apply(&mut world, Command::FireProjectile { plant }, &mut events);

        let projectiles = query::projectile_view(&world).into_vec();
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].bounds, Rect::new(60.0, 180.0, 10.0, 10.0));
    }

    #[test]
    fn collected_sun_is_credited_and_pruned() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(&mut world, Command::SpawnSun { x: 100.0 }, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::CollectSun {
                point: FieldPoint::new(115.0, -5.0),
            },
            &mut events,
        );
        assert_eq!(query::sun_balance(&world), 125);
        assert!(matches!(
            events.as_slice(),
            [Event::SunCollected { value: 25, .. }]
        ));
        assert_eq!(query::sun_view(&world).len(), 1);

        frame(&mut world, Duration::from_millis(16), &mut events);
        assert!(query::sun_view(&world).is_empty());
    }

    #[test]
    fn falling_sun_is_pruned_below_the_lawn() {
        let mut rules = Rules::default();
        rules.suns.lifetime_ms = 10_000_000;
        let mut world = World::with_rules(rules);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SelectDifficulty {
                difficulty: Difficulty::Normal,
            },
            &mut events,
        );
        apply(&mut world, Command::Start, &mut events);
        apply(&mut world, Command::SpawnSun { x: 100.0 }, &mut events);

        for _ in 0..669 {
            frame(&mut world, Duration::from_millis(1), &mut events);
        }
        let suns = query::sun_view(&world).into_vec();
        assert_eq!(suns.len(), 1);
        assert_eq!(suns[0].bounds.y, 649.0);
        assert!(!suns[0].collected);

        frame(&mut world, Duration::from_millis(1), &mut events);
        assert!(query::sun_view(&world).is_empty());
        assert_eq!(query::sun_balance(&world), 100);
    }

    #[test]
    fn projectile_is_pruned_at_the_far_edge() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Peashooter,
                cell: CellCoord::new(0, 2),
            },
            &mut events,
        );
        let plant = query::plant_at(&world, CellCoord::new(0, 2)).expect("planted");
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(2_000),
            },
            &mut events,
        );
        apply(&mut world, Command::FireProjectile { plant }, &mut events);

        for _ in 0..167 {
            frame(&mut world, Duration::from_millis(16), &mut events);
        }
        let projectiles = query::projectile_view(&world).into_vec();
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].bounds.x, 895.0);

        frame(&mut world, Duration::from_millis(16), &mut events);
        assert!(query::projectile_view(&world).is_empty());
    }

    #[test]
    fn offer_frame_does_not_reach_plant_timers() {
        let (mut world, mut events) = running_world(Difficulty::Easy);
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(300_000),
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::LevelUpOffered { .. }]
        ));
        let timer = |world: &World| query::plant_view(world).into_vec()[0].action_timer;
        assert_eq!(timer(&world), Duration::ZERO);

        events.clear();
        apply(&mut world, Command::DeclineLevelUp, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert_eq!(
            events.last(),
            Some(&Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            })
        );
        assert_eq!(timer(&world), Duration::from_millis(16));
        assert_eq!(
            query::stats(&world).elapsed,
            Duration::from_millis(300_016)
        );
    }

    #[test]
    fn zombie_crossing_the_lawn_loses_the_run() {
        let (mut world, mut events) = running_world(Difficulty::Hard);
        apply(&mut world, Command::SpawnZombie { row: 0 }, &mut events);

        let mut frames = 0;
        while query::phase(&world) == RunPhase::Running {
            frame(&mut world, Duration::from_millis(16), &mut events);
            frames += 1;
            assert!(frames < 10_000, "zombie never reached the house");
        }

        assert_eq!(query::phase(&world), RunPhase::Lost);
        assert!(matches!(events.last(), Some(Event::HouseBreached { .. })));
    }

    #[test]
    fn zombie_eats_plant_and_resumes_walking() {
        let (mut world, mut events) = running_world(Difficulty::Easy);
        apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(11, 0),
            },
            &mut events,
        );
        apply(&mut world, Command::SpawnZombie { row: 0 }, &mut events);

        let mut frames = 0;
        while query::plant_at(&world, CellCoord::new(11, 0)).is_some() {
            frame(&mut world, Duration::from_millis(16), &mut events);
            frames += 1;
            assert!(frames < 1_000, "plant was never eaten");
        }

        assert!(events.contains(&Event::PlantDestroyed {
            plant: PlantId::new(0)
        }));
        let zombie = query::zombie_view(&world).into_vec()[0];
        assert!(!zombie.attacking);

        let before = zombie.bounds.x;
        frame(&mut world, Duration::from_millis(16), &mut events);
        let after = query::zombie_view(&world).into_vec()[0].bounds.x;
        assert!(after < before);
    }

    #[test]
    fn kill_threshold_offers_next_tier() {
        let (mut world, mut events) = running_world(Difficulty::Easy);
        world.progression.record_kills(30);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        assert_eq!(
            query::phase(&world),
            RunPhase::LevelTransition {
                next: Difficulty::Normal
            }
        );
        assert!(matches!(
            events.as_slice(),
            [Event::LevelUpOffered {
                next: Difficulty::Normal,
                kills: 30,
                ..
            }]
        ));
    }

    #[test]
    fn accepting_level_up_carries_sun_and_clears_lawn() {
        let (mut world, mut events) = running_world(Difficulty::Easy);
        apply(&mut world, Command::SpawnZombie { row: 1 }, &mut events);
        world.progression.record_kills(30);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::AcceptLevelUp, &mut events);

        assert_eq!(
            events,
            vec![Event::LevelAdvanced {
                difficulty: Difficulty::Normal,
                carried_sun: 160,
            }]
        );
        let stats = query::stats(&world);
        assert_eq!(stats.phase, RunPhase::Running);
        assert_eq!(stats.sun, 160);
        assert_eq!(stats.kills, 0);
        assert_eq!(stats.wave, 1);
        assert!(query::zombie_view(&world).is_empty());
    }

    #[test]
    fn clearing_hard_tier_completes_campaign() {
        let (mut world, mut events) = running_world(Difficulty::Hard);
        world.progression.record_kills(30);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        assert!(matches!(
            events.as_slice(),
            [
                Event::CampaignCompleted { kills: 30, .. },
                Event::SessionReset
            ]
        ));
        assert_eq!(query::phase(&world), RunPhase::AwaitingDifficulty);
        assert_eq!(query::difficulty(&world), None);
    }

    #[test]
    fn reset_returns_to_difficulty_selection() {
        let (mut world, mut events) = running_world(Difficulty::Normal);
        apply(&mut world, Command::SpawnZombie { row: 0 }, &mut events);
        apply(&mut world, Command::Reset, &mut events);

        assert_eq!(query::phase(&world), RunPhase::AwaitingDifficulty);
        assert_eq!(query::sun_balance(&world), 0);
        assert!(query::zombie_view(&world).is_empty());
        assert_eq!(events.last(), Some(&Event::SessionReset));
    }
}
