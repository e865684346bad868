use crate::boundary::{BoundaryKind, set_boundary};
use crate::field::Field;

/// Gauss-Seidel sweeps per linear solve (diffusion and pressure alike).
pub const RELAX_ITERATIONS: usize = 20;

/// In-place Gauss-Seidel relaxation of
/// `x(i,j) = (x0(i,j) + a * (sum of the 4 neighbours of x)) / c`.
///
/// Sweeps run `i` outer, `j` inner, both ascending, and read neighbours from
/// the buffer being written, so the result depends on that order. The
/// boundary pass runs after every sweep.
pub(crate) fn relax(kind: BoundaryKind, x: &mut Field, x0: &Field, a: f32, c: f32, iterations: usize) {
    let grid = x.grid();
    let (n, m, w) = (grid.n(), grid.m(), grid.width());
    let c_inv = 1.0 / c;

    for _ in 0..iterations {
        let xs = x.data_mut();
        let x0s = x0.data();
        for i in 1..=n {
            for j in 1..=m {
                let k = i + w * j;
                let neighbours = xs[k - 1] + xs[k + 1] + xs[k - w] + xs[k + w];
                xs[k] = (x0s[k] + a * neighbours) * c_inv;
            }
        }
        set_boundary(kind, x);
    }
}

/// Implicit diffusion of `x0` into `x`: solves `x - a * lap(x) = x0` with
/// `a = dt * rate * n * m` by a fixed number of relaxation sweeps.
///
/// `x` doubles as the initial guess, so whatever it held before the call
/// seeds the first sweep.
pub fn diffuse(kind: BoundaryKind, x: &mut Field, x0: &Field, rate: f32, dt: f32) {
    let grid = x.grid();
    let a = dt * rate * grid.n() as f32 * grid.m() as f32;
    relax(kind, x, x0, a, 1.0 + 4.0 * a, RELAX_ITERATIONS);
}
