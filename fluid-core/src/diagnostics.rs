use serde::Serialize;

use crate::field::Field;
use crate::project::compute_divergence;
use crate::sim::Simulation;

/// Divergence of `(u, v)` on the interior, with the projection's stencil.
pub fn divergence(u: &Field, v: &Field) -> Field {
    let mut div = Field::zeros(u.grid());
    compute_divergence(u, v, &mut div);
    div
}

pub fn max_abs_divergence(u: &Field, v: &Field) -> f32 {
    divergence(u, v).interior().map(|(_, _, d)| d.abs()).fold(0.0, f32::max)
}

/// Sum of the interior cells of a density field.
pub fn total_density(d: &Field) -> f32 {
    d.interior().map(|(_, _, x)| x).sum()
}

/// Volume-averaged kinetic energy: 0.5 * <u^2 + v^2> over the interior.
pub fn kinetic_energy(u: &Field, v: &Field) -> f32 {
    let grid = u.grid();
    let count = (grid.n() * grid.m()) as f32;
    let sum: f32 = u.interior().map(|(i, j, x)| x * x + v.get(i, j).powi(2)).sum();
    0.5 * sum / count
}

pub fn max_speed(u: &Field, v: &Field) -> f32 {
    u.interior().map(|(i, j, x)| x.hypot(v.get(i, j))).fold(0.0, f32::max)
}

/// True when no cell (ghosts included) holds NaN or infinity.
pub fn all_finite(fields: &[&Field]) -> bool {
    fields.iter().all(|f| f.data().iter().all(|x| x.is_finite()))
}

/// One-line health summary of a simulation, as written per frame by the CLI.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameStats {
    pub total_density: f32,
    pub max_density: f32,
    pub kinetic_energy: f32,
    pub max_speed: f32,
    pub max_divergence: f32,
    pub finite: bool,
}

impl FrameStats {
    pub fn measure(sim: &Simulation) -> Self {
        let (u, v) = sim.velocity();
        let d = sim.density();
        Self {
            total_density: total_density(d),
            max_density: d.interior().map(|(_, _, x)| x).fold(f32::MIN, f32::max),
            kinetic_energy: kinetic_energy(u, v),
            max_speed: max_speed(u, v),
            max_divergence: max_abs_divergence(u, v),
            finite: all_finite(&[u, v, d]),
        }
    }
}
