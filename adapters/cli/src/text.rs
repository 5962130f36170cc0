//! Headless rendering backend that reports scenes as text.

use std::{
    io::{self, Write},
    time::Duration,
};

use anyhow::{Context, Result as AnyResult};
use lawn_defence_core::{PlantKind, RunPhase};
use lawn_defence_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

use crate::autopilot::Autopilot;

/// Drives a fixed number of frames and prints a summary every few frames.
#[derive(Debug)]
pub(crate) struct TextBackend {
    frames: u64,
    frame_interval: Duration,
    render_every: u64,
    autopilot: Option<Autopilot>,
}

impl TextBackend {
    pub(crate) fn new(
        frames: u64,
        frame_interval: Duration,
        render_every: u64,
        autopilot: Option<Autopilot>,
    ) -> Self {
        Self {
            frames,
            frame_interval,
            render_every: render_every.max(1),
            autopilot,
        }
    }
}

impl RenderingBackend for TextBackend {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{window_title}").context("failed to write to stdout")?;

        for frame in 1..=self.frames {
            let input = self
                .autopilot
                .as_mut()
                .map(|autopilot| autopilot.next_input(&scene))
                .unwrap_or_default();
            update_scene(self.frame_interval, input, &mut scene);

            if frame % self.render_every == 0 {
                write_frame(&mut out, frame, &scene)?;
            }

            match scene.hud.stats.phase {
                RunPhase::Lost | RunPhase::AwaitingDifficulty => {
                    write_frame(&mut out, frame, &scene)?;
                    return Ok(());
                }
                _ => {}
            }
        }

        write_frame(&mut out, self.frames, &scene)
    }
}

fn write_frame(out: &mut impl Write, frame: u64, scene: &Scene) -> AnyResult<()> {
    writeln!(out, "frame {frame:>6}: {}", scene.hud.summary())
        .context("failed to write to stdout")?;
    writeln!(out, "  {}", scene.hud.seed_bar()).context("failed to write to stdout")?;
    for row in lawn_rows(scene) {
        writeln!(out, "  {row}").context("failed to write to stdout")?;
    }
    if let Some(feedback) = scene.feedback {
        writeln!(out, "  last: {feedback}").context("failed to write to stdout")?;
    }
    Ok(())
}

/// Renders the lawn as one line of glyphs per row.
///
/// Plants occupy their cell; zombies, suns and projectiles are drawn in the
/// cell containing their centre and override plants.
pub(crate) fn lawn_rows(scene: &Scene) -> Vec<String> {
    let columns = scene.lawn.columns as usize;
    let rows = scene.lawn.rows as usize;
    let mut grid = vec![vec!['.'; columns]; rows];

    let mut mark = |position: glam::Vec2, glyph: char| {
        if let Some(cell) = scene.lawn.cell_at(position) {
            grid[cell.row() as usize][cell.column() as usize] = glyph;
        }
    };

    for plant in &scene.plants {
        let glyph = match plant.kind {
            PlantKind::Sunflower => 'S',
            PlantKind::Peashooter => 'P',
            PlantKind::WallNut if plant.cracked() => 'w',
            PlantKind::WallNut => 'W',
        };
        mark(plant.position + plant.size * 0.5, glyph);
    }
    for projectile in &scene.projectiles {
        mark(projectile.center, '-');
    }
    for sun in &scene.suns {
        mark(sun.center, '*');
    }
    for zombie in &scene.zombies {
        let glyph = if zombie.attacking { 'X' } else { 'Z' };
        mark(zombie.position + zombie.size * 0.5, glyph);
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}
