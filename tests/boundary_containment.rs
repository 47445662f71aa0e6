// Boundary containment tests
//
// After every step no particle may sit outside the box, under either face
// sign convention, and escaped particles are reflected with dampening.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sph_engine::fluid::integration::enforce_boundaries;
use sph_engine::{
    build_boundary, BoundaryDescriptor, BoundaryInteractor, BoxBoundary, FaceSign, FluidParams, FluidSystem2d,
    FluidSystem3d, Particle, SphVector,
};

#[test]
fn test_particles_stay_in_box_under_both_face_signs() {
    println!("🧪 Testing boundary containment...");
    for face_sign in [FaceSign::AsWritten, FaceSign::InvertMaxFace] {
        let extents = Vec2::new(4.0, 3.0);
        let mut system = FluidSystem2d::new(extents, FluidParams::default()).expect("valid domain");
        system.add_boundary(Box::new(BoxBoundary::domain(extents).with_face_sign(face_sign)));

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..150 {
            let position = Vec2::new(rng.gen_range(0.0..4.0), rng.gen_range(0.0..3.0));
            let velocity = Vec2::new(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0));
            system.spawn_particle(position, velocity);
        }

        for step in 0..60 {
            system.step(0.005);
            for (index, position) in system.positions().enumerate() {
                assert!(
                    position.is_within(Vec2::ZERO, extents),
                    "{:?} step {}: particle {} escaped to {:?}",
                    face_sign,
                    step,
                    index,
                    position
                );
            }
        }
    }
    println!("✅ Containment holds");
}

#[test]
fn test_inner_box_from_descriptor_contains_3d() {
    let descriptor: BoundaryDescriptor = toml::from_str(
        r#"
        kind = "box"
        min = [1.0, 1.0, 1.0]
        max = [3.0, 3.0, 3.0]
        dampening = 0.3
        "#,
    )
    .expect("descriptor parses");

    let mut system = FluidSystem3d::new(Vec3::splat(4.0), FluidParams::default()).expect("valid domain");
    system.add_boundary(build_boundary(&descriptor).expect("valid box"));
    system.spawn_block(Vec3::splat(1.2), Vec3::new(2.0, 2.0, 2.8), 0.2, Vec3::new(3.0, 0.0, 0.0));

    for _ in 0..40 {
        system.step(0.005);
        assert!(system.positions().all(|p| p.is_within(Vec3::splat(1.0), Vec3::splat(3.0))));
    }
}

#[test]
fn test_escaped_particle_reflected_with_dampening() {
    let dampening = 0.25;
    let boundary = BoxBoundary::new(Vec2::ZERO, Vec2::splat(2.0)).with_dampening(dampening);
    let boundaries: Vec<Box<dyn BoundaryInteractor<Vec2>>> = vec![Box::new(boundary)];

    let mut particles = vec![
        Particle::new(Vec2::new(2.4, 1.0), Vec2::new(3.0, 0.5), 1.0, 0.1),
        Particle::new(Vec2::new(1.0, -0.3), Vec2::new(0.2, -2.0), 1.0, 0.1),
        Particle::new(Vec2::new(1.0, 1.0), Vec2::new(-1.0, 1.0), 1.0, 0.1),
    ];
    enforce_boundaries(&mut particles, &boundaries);

    assert_eq!(particles[0].position, Vec2::new(2.0, 1.0));
    assert_eq!(particles[0].velocity, Vec2::new(-3.0 * dampening, 0.5));

    assert_eq!(particles[1].position, Vec2::new(1.0, 0.0));
    assert_eq!(particles[1].velocity, Vec2::new(0.2, 2.0 * dampening));

    // Inside: untouched
    assert_eq!(particles[2].velocity, Vec2::new(-1.0, 1.0));

    // A second pass changes nothing
    let once = particles.clone();
    enforce_boundaries(&mut particles, &boundaries);
    assert_eq!(particles, once);
}
