use lawn_defence_core::{
    CellCoord, Command, Difficulty, Event, FieldPoint, PlacementError, PlantKind,
};
use lawn_defence_system_pointer::Pointer;
use lawn_defence_world::{self as world, query, World};

fn running_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SelectDifficulty {
            difficulty: Difficulty::Normal,
        },
        &mut events,
    );
    world::apply(&mut world, Command::Start, &mut events);
    world
}

fn press(world: &mut World, pointer: &mut Pointer, point: FieldPoint) -> Vec<Event> {
    let mut commands = Vec::new();
    let rules = query::rules(world).field.clone();
    pointer.handle(
        query::phase(world),
        Some(point),
        &query::sun_view(world),
        &rules,
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn press_plants_selected_kind_in_cell_under_pointer() {
    let mut world = running_world();
    let mut pointer = Pointer::new();
    pointer.select(PlantKind::Peashooter);

    let events = press(&mut world, &mut pointer, FieldPoint::new(160.0, 80.0));

    assert!(matches!(
        events.as_slice(),
        [Event::PlantPlaced {
            kind: PlantKind::Peashooter,
            ..
        }]
    ));
    assert!(query::plant_at(&world, CellCoord::new(2, 1)).is_some());
    assert_eq!(query::sun_balance(&world), 0);
}

#[test]
fn press_beyond_the_lawn_is_rejected_by_the_world() {
    let mut world = running_world();
    let mut pointer = Pointer::new();

    let events = press(&mut world, &mut pointer, FieldPoint::new(950.0, 10.0));

    assert_eq!(
        events,
        vec![Event::PlantPlacementRejected {
            kind: PlantKind::Sunflower,
            cell: CellCoord::new(12, 0),
            reason: PlacementError::OutOfBounds,
        }]
    );
}

#[test]
fn press_on_sun_collects_instead_of_planting() {
    let mut world = running_world();
    let mut pointer = Pointer::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::SpawnSun { x: 300.0 }, &mut events);

    let events = press(&mut world, &mut pointer, FieldPoint::new(330.0, 10.0));

    assert!(matches!(
        events.as_slice(),
        [Event::SunCollected { value: 25, .. }]
    ));
    assert!(query::plant_view(&world).is_empty());
    assert_eq!(query::sun_balance(&world), 125);
}
