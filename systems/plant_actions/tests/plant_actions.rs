use std::time::Duration;

use lawn_defence_core::{CellCoord, Command, Difficulty, Event, PlantKind, SunOrigin};
use lawn_defence_system_plant_actions::PlantActions;
use lawn_defence_world::{self as world, query, World};

struct Harness {
    world: World,
    system: PlantActions,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Harness {
    fn running(difficulty: Difficulty) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SelectDifficulty { difficulty },
            &mut events,
        );
        world::apply(&mut world, Command::Start, &mut events);
        Self {
            world,
            system: PlantActions::new(),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn place(&mut self, kind: PlantKind, cell: CellCoord) {
        self.apply(Command::PlacePlant { kind, cell });
    }

    fn frame(&mut self, dt: Duration) {
        self.apply(Command::Tick { dt });

        self.commands.clear();
        let rules = query::rules(&self.world).plants.clone();
        self.system.handle(
            query::phase(&self.world),
            &query::plant_view(&self.world),
            &query::zombie_view(&self.world),
            &rules,
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        self.apply(Command::AdvanceEntities { dt });
    }

    fn fired(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileFired { .. }))
            .count()
    }
}

#[test]
fn sunflower_fed_five_seconds_emits_exactly_one_sun() {
    let mut harness = Harness::running(Difficulty::Normal);
    harness.place(PlantKind::Sunflower, CellCoord::new(0, 0));

    for _ in 0..50 {
        harness.frame(Duration::from_millis(100));
    }

    let suns = query::sun_view(&harness.world).into_vec();
    assert_eq!(suns.len(), 1);
    assert!(matches!(suns[0].origin, SunOrigin::Plant(_)));
    assert_eq!(suns[0].bounds.x, 22.0);
    assert_eq!(suns[0].bounds.y, 22.0, "produced suns do not fall");
}

#[test]
fn sunflower_stays_idle_just_below_interval() {
    let mut harness = Harness::running(Difficulty::Normal);
    harness.place(PlantKind::Sunflower, CellCoord::new(0, 0));

    for _ in 0..49 {
        harness.frame(Duration::from_millis(100));
    }

    assert!(query::sun_view(&harness.world).is_empty());
}

#[test]
fn peashooter_holds_fire_without_target() {
    let mut harness = Harness::running(Difficulty::Normal);
    harness.place(PlantKind::Peashooter, CellCoord::new(2, 0));
    harness.apply(Command::SpawnZombie { row: 1 });

    for _ in 0..30 {
        harness.frame(Duration::from_millis(100));
    }

    assert_eq!(harness.fired(), 0);
    let plant = query::plant_view(&harness.world).into_vec()[0];
    assert_eq!(plant.action_timer, Duration::from_millis(3_000));
}

#[test]
fn peashooter_fires_on_cadence_at_zombie_in_row() {
    let mut harness = Harness::running(Difficulty::Normal);
    harness.place(PlantKind::Peashooter, CellCoord::new(2, 0));
    harness.apply(Command::SpawnZombie { row: 0 });

    for _ in 0..20 {
        harness.frame(Duration::from_millis(100));
    }
    assert_eq!(harness.fired(), 1);

    for _ in 0..20 {
        harness.frame(Duration::from_millis(100));
    }
    assert_eq!(harness.fired(), 2);
}

#[test]
fn peashooter_ignores_zombie_beyond_range() {
    let mut harness = Harness::running(Difficulty::Normal);
    harness.place(PlantKind::Peashooter, CellCoord::new(0, 0));
    harness.apply(Command::SpawnZombie { row: 0 });

    for _ in 0..20 {
        harness.frame(Duration::from_millis(100));
    }

    assert_eq!(harness.fired(), 0, "zombie at 900 is 890 px ahead of the plant");
}
