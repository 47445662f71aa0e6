// SPH neighbour search benchmarks
//
// Compares the uniform-grid half-stencil search against the all-pairs scan,
// and times a full simulation step on the grid path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use sph_engine::spatial::{brute_force_pairs, grid_pairs};
use sph_engine::{FluidParams, FluidSystem3d, NeighbourPair, Particle, SpatialGrid};

const PARTICLE_COUNTS: &[usize] = &[500, 2000, 8000];
const EXTENT: f32 = 8.0;
const SMOOTHING_LENGTH: f32 = 0.5;

fn random_particles(count: usize) -> Vec<Particle<Vec3>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let position = Vec3::new(
                rng.gen_range(0.0..EXTENT),
                rng.gen_range(0.0..EXTENT),
                rng.gen_range(0.0..EXTENT),
            );
            Particle::new(position, Vec3::ZERO, 1.0, 0.1)
        })
        .collect()
}

fn bench_neighbour_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbour_search");
    group.measurement_time(Duration::from_secs(5));

    for &count in PARTICLE_COUNTS {
        let particles = random_particles(count);
        let mut grid = SpatialGrid::new(Vec3::splat(EXTENT), SMOOTHING_LENGTH).expect("valid grid");
        grid.rebuild(particles.iter().map(|p| p.position));
        let mut pairs: Vec<NeighbourPair<Vec3>> = Vec::new();

        group.bench_with_input(BenchmarkId::new("grid", count), &count, |b, _| {
            b.iter(|| {
                grid_pairs(&grid, black_box(&particles), SMOOTHING_LENGTH, &mut pairs);
                black_box(pairs.len())
            })
        });

        // The quadratic scan gets slow quickly; skip the largest set
        if count <= 2000 {
            group.bench_with_input(BenchmarkId::new("brute_force", count), &count, |b, _| {
                b.iter(|| {
                    brute_force_pairs(black_box(&particles), SMOOTHING_LENGTH, &mut pairs);
                    black_box(pairs.len())
                })
            });
        }
    }

    group.finish();
}

fn bench_full_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("fluid_step");
    group.measurement_time(Duration::from_secs(5));

    for &count in PARTICLE_COUNTS {
        group.bench_with_input(BenchmarkId::new("grid", count), &count, |b, &count| {
            let mut system = FluidSystem3d::new(Vec3::splat(EXTENT), FluidParams::default()).expect("valid domain");
            for particle in random_particles(count) {
                system.spawn_particle(particle.position, Vec3::ZERO);
            }
            b.iter(|| black_box(system.step(0.001)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_neighbour_search, bench_full_step);
criterion_main!(benches);
