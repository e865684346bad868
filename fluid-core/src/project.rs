use crate::boundary::{BoundaryKind, set_boundary};
use crate::diffuse::{RELAX_ITERATIONS, relax};
use crate::field::Field;

/// Writes `-0.5 * dx * (du/di + dv/dj)` (central differences, `dx = 1/n`)
/// into the interior of `div`. Ghost cells of `div` are left alone.
pub fn compute_divergence(u: &Field, v: &Field, div: &mut Field) {
    let grid = div.grid();
    let (n, w) = (grid.n(), grid.width());
    let dx = 1.0 / n as f32;
    let (us, vs) = (u.data(), v.data());

    div.for_each_interior_row(|j, row| {
        for (i, cell) in row.iter_mut().enumerate().take(n + 1).skip(1) {
            let k = i + w * j;
            *cell = -0.5 * dx * (us[k + 1] - us[k - 1] + vs[k + w] - vs[k - w]);
        }
    });
}

/// Makes `(u, v)` approximately divergence free.
///
/// `p` and `div` are scratch: on return `p` holds the pressure-like
/// potential whose gradient was subtracted and `div` the divergence of the
/// input field.
pub fn project(u: &mut Field, v: &mut Field, p: &mut Field, div: &mut Field) {
    project_with(u, v, p, div, RELAX_ITERATIONS);
}

pub(crate) fn project_with(u: &mut Field, v: &mut Field, p: &mut Field, div: &mut Field, iterations: usize) {
    let grid = u.grid();
    let (n, w) = (grid.n(), grid.width());
    let dx = 1.0 / n as f32;

    compute_divergence(u, v, div);
    p.fill(0.0);
    set_boundary(BoundaryKind::None, div);
    set_boundary(BoundaryKind::None, p);

    relax(BoundaryKind::None, p, div, 1.0, 4.0, iterations);

    let ps = p.data();
    u.for_each_interior_row(|j, row| {
        for (i, cell) in row.iter_mut().enumerate().take(n + 1).skip(1) {
            let k = i + w * j;
            *cell -= 0.5 * (ps[k + 1] - ps[k - 1]) / dx;
        }
    });
    v.for_each_interior_row(|j, row| {
        for (i, cell) in row.iter_mut().enumerate().take(n + 1).skip(1) {
            let k = i + w * j;
            *cell -= 0.5 * (ps[k + w] - ps[k - w]) / dx;
        }
    });

    set_boundary(BoundaryKind::HorizontalVelocity, u);
    set_boundary(BoundaryKind::VerticalVelocity, v);
}
