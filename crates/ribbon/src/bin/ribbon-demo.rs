//! Draws a synthetic helical stroke through a ribbon brush and reports the
//! segments it produced. Useful for eyeballing logs and timing the hot path.

use std::time::Instant;

use glam::{Quat, Vec3};
use ribbon::{BrushConfig, Hsv, RibbonBrush};
use tracing::{error, info};

const SAMPLES: usize = 25_000;

fn configure_tracing() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let max_level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(max_level)
            .finish(),
    )
}

/// Controller sample `i` of a helix wound around the Y axis
fn helix_sample(i: usize) -> (Vec3, Quat, f32) {
    let t = i as f32 * 0.01;
    let position = Vec3::new(t.cos(), t * 0.05, t.sin());
    let orientation = Quat::from_rotation_y(-t);
    let pressure = 0.5 + 0.5 * (t * 0.7).sin();
    (position, orientation, pressure)
}

fn run(config: BrushConfig) -> Result<(), ribbon::ConfigError> {
    let label = config.material_id.clone();
    let mut brush = RibbonBrush::new(config)?;
    brush.set_color(Hsv::new(0.08, 0.8, 0.6));

    let started = Instant::now();
    let mut accepted = 0usize;
    for i in 0..SAMPLES {
        if brush.needs_new_mesh() {
            brush.create_mesh();
        }
        let (position, orientation, pressure) = helix_sample(i);
        match brush.add_point(position, orientation, pressure) {
            Ok(outcome) if outcome.is_accepted() => accepted += 1,
            Ok(_) => {}
            Err(e) => error!("add_point failed: {}", e),
        }
        brush.update();
    }
    let elapsed = started.elapsed();

    info!(
        "{}: {} of {} samples accepted into {} meshes in {:?}",
        label,
        accepted,
        SAMPLES,
        brush.mesh_count(),
        elapsed
    );
    for mesh in brush.meshes() {
        info!(
            "  {:?}: {} rungs, draw range {:?}, {} bytes of positions",
            mesh.handle,
            mesh.segment.rung_count(),
            mesh.segment.draw_range(),
            mesh.segment.position_bytes().len()
        );
    }

    brush.dispose();
    Ok(())
}

fn main() {
    if let Err(e) = configure_tracing() {
        eprintln!("Failed to configure tracing: {e}");
    }

    for config in [
        BrushConfig::pressure_ribbon().with_delta(0.005),
        BrushConfig::textured_ribbon().with_delta(0.005).with_capacity(2_000),
    ] {
        if let Err(e) = run(config) {
            error!("Invalid brush config: {}", e);
        }
    }
}
