#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Lawn Defence headlessly.

mod autopilot;
mod text;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lawn_defence_core::{Difficulty, Rules, WELCOME_BANNER};
use lawn_defence_rendering::{
    Color, FrameInput, Hud, LawnPresentation, Presentation, RenderingBackend, Scene,
};
use lawn_defence_simulation::{Config, Simulation};

use autopilot::{to_field, Autopilot};
use text::TextBackend;

/// Command-line arguments accepted by the headless host.
#[derive(Debug, Parser)]
#[command(name = "lawn-defence", about = "Plays Lawn Defence in the terminal")]
struct Args {
    /// Difficulty tier of the first level (easy, normal or hard).
    #[arg(long, default_value = "normal", value_parser = parse_difficulty)]
    difficulty: Difficulty,
    /// Seed for zombie rows and sky sun placement.
    #[arg(long, default_value_t = 0x1a57)]
    seed: u64,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 20_000)]
    frames: u64,
    /// Simulated duration of a single frame in milliseconds.
    #[arg(long = "frame-ms", default_value_t = 16)]
    frame_ms: u64,
    /// Optional TOML file overriding the default rules.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Let the built-in autopilot collect sun and plant.
    #[arg(long)]
    autoplay: bool,
    /// Accept level-up offers instead of declining them.
    #[arg(long)]
    accept_level_ups: bool,
    /// Print the lawn every N frames.
    #[arg(long, default_value_t = 600)]
    render_every: u64,
}

/// Entry point for the Lawn Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let rules = load_rules(args.rules.as_ref())?;

    let lawn = LawnPresentation::new(
        rules.field.columns,
        rules.field.rows,
        rules.field.grid_size,
        Color::from_rgb_u8(0x22, 0x8b, 0x22),
    )
    .context("invalid lawn geometry in rules")?;

    let mut simulation = Simulation::new(Config::new(args.seed).with_rules(rules));
    simulation.select_difficulty(args.difficulty);
    simulation
        .start()
        .with_context(|| format!("failed to start a {} run", args.difficulty))?;
    log::info!(
        "{WELCOME_BANNER} Playing {} with seed {:#x}",
        args.difficulty,
        args.seed
    );

    let scene = Scene::new(
        lawn,
        Hud {
            stats: simulation.stats(),
            selected_plant: simulation.selected_plant(),
        },
    );
    let presentation = Presentation::new(
        format!("Lawn Defence ({})", args.difficulty),
        Color::from_rgb_u8(0x7c, 0xfc, 0x00),
        scene,
    );

    let autopilot = args
        .autoplay
        .then(|| Autopilot::new(args.accept_level_ups));
    let backend = TextBackend::new(
        args.frames,
        Duration::from_millis(args.frame_ms),
        args.render_every,
        autopilot,
    );

    let mut now = Duration::ZERO;
    backend.run(presentation, move |dt, input, scene| {
        now += dt;
        apply_input(&mut simulation, input);
        simulation.tick(now);

        let events = simulation.take_events();
        scene.note_events(&events);
        scene.refresh(
            &simulation.plant_view(),
            &simulation.zombie_view(),
            &simulation.projectile_view(),
            &simulation.sun_view(),
            Hud {
                stats: simulation.stats(),
                selected_plant: simulation.selected_plant(),
            },
        );
    })
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    value.parse().map_err(|error| {
        let tiers: Vec<String> = Difficulty::ALL
            .iter()
            .map(|tier| tier.to_string().to_ascii_lowercase())
            .collect();
        format!("{error}; expected one of {}", tiers.join(", "))
    })
}

fn load_rules(path: Option<&PathBuf>) -> Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse rules in {}", path.display()))
}

fn apply_input(simulation: &mut Simulation, input: FrameInput) {
    if let Some(difficulty) = input.select_difficulty {
        simulation.select_difficulty(difficulty);
    }
    if input.start {
        if let Err(error) = simulation.start() {
            log::warn!("{error}");
        }
    }
    if input.toggle_pause {
        let _ = simulation.toggle_pause();
    }
    if input.reset {
        simulation.reset();
    }
    if input.accept_level_up {
        simulation.accept_level_up();
    }
    if input.decline_level_up {
        simulation.decline_level_up();
    }
    if let Some(kind) = input.select_plant {
        simulation.select_plant(kind);
    }
    if let Some(position) = input.press {
        simulation.press(to_field(position));
    }
}
