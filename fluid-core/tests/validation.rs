// tests/validation.rs
//
// Whole-solver checks: boundary policy, the two identities, boundedness,
// projection, and the small reference scenarios.
// Run with: cargo test --test validation

use fluid_core::advect::advect;
use fluid_core::diagnostics::{all_finite, divergence, max_abs_divergence};
use fluid_core::diffuse::diffuse;
use fluid_core::project::project;
use fluid_core::{BoundaryKind, Field, Grid, SimParams, Simulation, Sources, set_boundary};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::mem::swap;

fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

fn random_field(grid: Grid, rng: &mut ChaCha8Rng, lo: f32, hi: f32) -> Field {
    let mut f = Field::zeros(grid);
    for j in 0..grid.height() {
        for i in 0..grid.width() {
            f.set(i, j, rng.gen_range(lo..hi));
        }
    }
    f
}

fn interior_max(f: &Field) -> f32 {
    f.interior().map(|(_, _, x)| x).fold(f32::MIN, f32::max)
}

#[test]
fn boundary_mirrors_scalar_and_negates_normal_velocity() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let grid = Grid::new(12, 9).unwrap();

    let mut s = random_field(grid, &mut rng, -1.0, 1.0);
    set_boundary(BoundaryKind::None, &mut s);
    let mut h = random_field(grid, &mut rng, -1.0, 1.0);
    set_boundary(BoundaryKind::HorizontalVelocity, &mut h);

    for j in 1..=9 {
        assert_eq!(s.get(0, j), s.get(1, j));
        assert_eq!(h.get(0, j), -h.get(1, j));
        assert_eq!(h.get(13, j), -h.get(12, j));
    }
    for f in [&s, &h] {
        assert_eq!(f.get(0, 0), 0.5 * (f.get(1, 0) + f.get(0, 1)));
    }
}

#[test]
fn zero_rate_diffusion_is_identity() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let grid = Grid::new(10, 14).unwrap();
    let x0 = random_field(grid, &mut rng, -5.0, 5.0);
    let mut x = random_field(grid, &mut rng, -5.0, 5.0);

    diffuse(BoundaryKind::VerticalVelocity, &mut x, &x0, 0.0, 0.3);

    for (i, j, v) in x0.interior() {
        assert_eq!(x.get(i, j), v);
    }
}

#[test]
fn zero_velocity_advection_is_identity() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let grid = Grid::new(7, 11).unwrap();
    let d0 = random_field(grid, &mut rng, 0.0, 100.0);
    let zero = Field::zeros(grid);
    let mut d = Field::zeros(grid);

    advect(BoundaryKind::None, &mut d, &d0, &zero, &zero, 0.25);

    for (i, j, v) in d0.interior() {
        assert_eq!(d.get(i, j), v);
    }
}

#[test]
fn density_never_exceeds_its_initial_maximum() {
    let params = SimParams {
        n: 16,
        m: 16,
        dt: 0.1,
        viscosity: 0.001,
        diffusion: 0.0005,
    };
    let grid = Grid::new(16, 16).unwrap();

    let peak = 10.0;
    let d = Field::from_fn(grid, |i, j| {
        if (6..10).contains(&i) && (6..12).contains(&j) { peak } else { 0.0 }
    });

    // solid-body swirl
    let u = Field::from_fn(grid, |_, j| 3.0 * (j as f32 - 8.5));
    let v = Field::from_fn(grid, |i, _| -3.0 * (i as f32 - 8.5));

    let mut sim = Simulation::with_initial(params, &u, &v, &d).unwrap();

    let sources = Sources::new(sim.grid());
    for tick in 0..30 {
        sim.step(&sources);
        let max = sim.density().data().iter().copied().fold(f32::MIN, f32::max);
        assert!(max <= peak || approx_eq(max, peak, 1e-4), "tick {tick}: density peaked at {max}");
    }
}

#[test]
fn projection_reduces_divergence_of_random_field() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let grid = Grid::new(16, 16).unwrap();
    let mut u = random_field(grid, &mut rng, -1.0, 1.0);
    let mut v = random_field(grid, &mut rng, -1.0, 1.0);
    set_boundary(BoundaryKind::HorizontalVelocity, &mut u);
    set_boundary(BoundaryKind::VerticalVelocity, &mut v);

    let before_max = max_abs_divergence(&u, &v);
    let before_l2: f32 = divergence(&u, &v).interior().map(|(_, _, d)| d * d).sum();

    let mut p = Field::zeros(grid);
    let mut div = Field::zeros(grid);
    project(&mut u, &mut v, &mut p, &mut div);

    let after_max = max_abs_divergence(&u, &v);
    let after_l2: f32 = divergence(&u, &v).interior().map(|(_, _, d)| d * d).sum();
    assert!(after_max < before_max, "max |div| {before_max} -> {after_max}");
    assert!(after_l2 < before_l2, "sum div^2 {before_l2} -> {after_l2}");
}

#[test]
fn single_dye_source_without_flow_stays_put() {
    let params = SimParams {
        n: 4,
        m: 4,
        dt: 0.1,
        viscosity: 0.0,
        diffusion: 0.0,
    };
    let mut sim = Simulation::new(params).unwrap();
    let mut sources = Sources::new(sim.grid());
    sources.add_density(2, 2, 100.0).unwrap();

    sim.step(&sources);

    let d = sim.density();
    assert_eq!(d.get(2, 2), 100.0);
    for (i, j, x) in d.interior() {
        if (i, j) != (2, 2) {
            assert_eq!(x, 0.0, "cell ({i}, {j})");
        }
    }
    let (u, v) = sim.velocity();
    assert!(u.data().iter().chain(v.data()).all(|&x| x == 0.0));
}

#[test]
fn repeated_force_stays_bounded() {
    let params = SimParams {
        n: 4,
        m: 4,
        dt: 0.1,
        viscosity: 0.0008,
        diffusion: 0.0,
    };
    let mut sim = Simulation::new(params).unwrap();
    let mut sources = Sources::new(sim.grid());
    sources.add_force(2, 2, 50.0, 50.0).unwrap();

    for tick in 0..100 {
        sim.step(&sources);
        let (u, v) = sim.velocity();
        assert!(all_finite(&[u, v, sim.density()]), "non-finite value at tick {tick}");
        let peak = u.data().iter().chain(v.data()).map(|x| x.abs()).fold(0.0, f32::max);
        assert!(peak < 50.0, "tick {tick}: velocity blew up to {peak}");
    }
}

#[test]
fn larger_run_with_dye_and_force_stays_finite() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let params = SimParams {
        n: 32,
        m: 24,
        ..SimParams::default()
    };
    let mut sim = Simulation::new(params).unwrap();
    let mut sources = Sources::new(sim.grid());

    for _ in 0..50 {
        sources.clear();
        let i = rng.gen_range(2..31);
        let j = rng.gen_range(2..23);
        sources.add_density(i, j, 10.0).unwrap();
        sources.add_force(i, j, rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)).unwrap();
        sim.step(&sources);
    }

    let (u, v) = sim.velocity();
    assert!(all_finite(&[u, v, sim.density()]));
    assert!(interior_max(sim.density()) > 0.0);
    assert!(sim.density().interior().all(|(_, _, x)| x >= -1e-4));
}

#[test]
fn step_matches_hand_composed_passes() {
    let params = SimParams {
        n: 8,
        m: 6,
        dt: 0.1,
        viscosity: 0.01,
        diffusion: 0.002,
    };
    let grid = Grid::new(8, 6).unwrap();
    let mut sim = Simulation::new(params).unwrap();
    let mut sources = Sources::new(grid);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let (mut u, mut v, mut d) = (Field::zeros(grid), Field::zeros(grid), Field::zeros(grid));
    let (mut u0, mut v0, mut d0) = (Field::zeros(grid), Field::zeros(grid), Field::zeros(grid));
    let (dt, visc, diff) = (params.dt, params.viscosity, params.diffusion);

    for tick in 0..3 {
        sources.clear();
        for _ in 0..5 {
            let i = rng.gen_range(1..=8);
            let j = rng.gen_range(1..=6);
            sources.add_density(i, j, rng.gen_range(1.0..50.0)).unwrap();
            sources.add_force(i, j, rng.gen_range(-30.0..30.0), rng.gen_range(-30.0..30.0)).unwrap();
        }
        sim.step(&sources);

        u0.copy_from(sources.u());
        v0.copy_from(sources.v());
        d0.copy_from(sources.d());

        // velocity: add forces, diffuse, project, self-advect on the projected field, project
        u.add_scaled(&u0, dt);
        v.add_scaled(&v0, dt);
        swap(&mut u, &mut u0);
        diffuse(BoundaryKind::HorizontalVelocity, &mut u, &u0, visc, dt);
        swap(&mut v, &mut v0);
        diffuse(BoundaryKind::VerticalVelocity, &mut v, &v0, visc, dt);
        project(&mut u, &mut v, &mut u0, &mut v0);
        swap(&mut u, &mut u0);
        swap(&mut v, &mut v0);
        advect(BoundaryKind::HorizontalVelocity, &mut u, &u0, &u0, &v0, dt);
        advect(BoundaryKind::VerticalVelocity, &mut v, &v0, &u0, &v0, dt);
        project(&mut u, &mut v, &mut u0, &mut v0);

        // density: deposit, diffuse, advect along the final velocity
        d.add_scaled(&d0, 1.0);
        swap(&mut d, &mut d0);
        diffuse(BoundaryKind::None, &mut d, &d0, diff, dt);
        swap(&mut d, &mut d0);
        advect(BoundaryKind::None, &mut d, &d0, &u, &v, dt);

        let (su, sv) = sim.velocity();
        assert_eq!(su.data(), u.data(), "u differs at tick {tick}");
        assert_eq!(sv.data(), v.data(), "v differs at tick {tick}");
        assert_eq!(sim.density().data(), d.data(), "d differs at tick {tick}");
    }
    assert!(sim.density().interior().any(|(_, _, x)| x > 0.0));
    assert!(sim.velocity().0.interior().any(|(_, _, x)| x != 0.0));
}
