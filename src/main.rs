/// Headless dam-break runner
/// Usage: sph-sim [CONFIG] [--3d] [--steps N] [--dt SECONDS]
/// Drops a block of fluid into a box and logs density statistics.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sph_engine::{BoundaryDescriptor, FluidSystem, SimulationConfig, SphVector};

const DEFAULT_STEPS: u64 = 500;
const DEFAULT_DT: f32 = 0.005;
const REPORT_INTERVAL: u64 = 100;
/// Lattice jitter as a fraction of the spacing
const JITTER: f32 = 0.05;

struct Args {
    config: Option<PathBuf>,
    three_d: bool,
    steps: u64,
    dt: f32,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        three_d: false,
        steps: DEFAULT_STEPS,
        dt: DEFAULT_DT,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--3d" => args.three_d = true,
            "--steps" => {
                let value = iter.next().context("--steps needs a value")?;
                args.steps = value.parse().with_context(|| format!("invalid step count '{}'", value))?;
            }
            "--dt" => {
                let value = iter.next().context("--dt needs a value")?;
                args.dt = value.parse().with_context(|| format!("invalid time step '{}'", value))?;
            }
            other if other.starts_with("--") => bail!("unknown option {}", other),
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn run<V: SphVector>(config: &SimulationConfig, args: &Args) -> Result<()> {
    let mut system = FluidSystem::<V>::from_config(config).context("failed to build fluid system")?;
    if system.boundaries().is_empty() {
        let descriptor = BoundaryDescriptor::domain_box(&system.extents().to_vec());
        system.add_boundary(sph_engine::build_boundary(&descriptor)?);
    }

    // Fluid column in the low corner: a quarter of the domain wide, half high
    let extents = system.extents();
    let spacing = system.smoothing_length() * 0.5;
    let mut max = extents * 0.5;
    max.set_component(0, extents.component(0) * 0.25);
    let min = V::splat(spacing);
    let spawned = system.spawn_block(min, max, spacing, V::ZERO);
    if spawned == 0 {
        bail!("no particles spawned; domain too small for smoothing length {}", system.smoothing_length());
    }

    // Break the lattice symmetry so the column collapses naturally
    let mut rng = StdRng::seed_from_u64(7);
    let jittered: Vec<(V, V)> = system
        .particles()
        .iter()
        .map(|p| {
            let mut offset = V::ZERO;
            for axis in 0..V::DIM {
                offset.set_component(axis, rng.gen_range(-JITTER..JITTER) * spacing);
            }
            (p.position + offset, p.velocity)
        })
        .collect();
    system.clear_particles();
    for (position, velocity) in jittered {
        system.spawn_particle(position, velocity);
    }

    system.log_parameters();

    let mut unstable_steps = 0u64;
    for step in 1..=args.steps {
        let report = system.step(args.dt);
        if !report.is_stable() {
            unstable_steps += 1;
        }
        if step % REPORT_INTERVAL == 0 || step == args.steps {
            let count = system.particle_count() as f32;
            let (min_density, max_density, sum) = system.densities().fold(
                (f32::INFINITY, f32::NEG_INFINITY, 0.0f32),
                |(lo, hi, sum), d| (lo.min(d), hi.max(d), sum + d),
            );
            log::info!(
                "Step {:>5}: {} pairs, density min {:.4} / mean {:.4} / max {:.4}",
                step,
                report.pairs,
                min_density,
                sum / count,
                max_density
            );
        }
    }

    if unstable_steps > 0 {
        log::warn!("{} of {} steps reported non-finite particle state", unstable_steps, args.steps);
    }
    log::info!("Finished {} steps with {} particles", system.step_count(), system.particle_count());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    log::info!("Starting {}D dam break, {} steps at dt {}", if args.three_d { 3 } else { 2 }, args.steps, args.dt);
    if args.three_d {
        run::<Vec3>(&config, &args)
    } else {
        run::<Vec2>(&config, &args)
    }
}
