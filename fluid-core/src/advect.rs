use crate::boundary::{BoundaryKind, set_boundary};
use crate::field::Field;

/// Semi-Lagrangian transport of `d0` into `d` along `(u, v)`.
///
/// Each interior cell traces back `dt` grid units along its own velocity,
/// clamps the foot point into `[0.5, n + 0.5] x [0.5, m + 0.5]`, and takes
/// the bilinear blend of the four surrounding cells of `d0`. The blend is a
/// convex combination, so the output never leaves the range of `d0`.
pub fn advect(kind: BoundaryKind, d: &mut Field, d0: &Field, u: &Field, v: &Field, dt: f32) {
    let grid = d.grid();
    let (n, m, w) = (grid.n(), grid.m(), grid.width());
    let (x_max, y_max) = (n as f32 + 0.5, m as f32 + 0.5);
    let (d0s, us, vs) = (d0.data(), u.data(), v.data());

    d.for_each_interior_row(|j, row| {
        for (i, cell) in row.iter_mut().enumerate().take(n + 1).skip(1) {
            let k = i + w * j;

            let x = (i as f32 - dt * us[k]).clamp(0.5, x_max);
            let y = (j as f32 - dt * vs[k]).clamp(0.5, y_max);

            let i0 = x.floor() as usize;
            let j0 = y.floor() as usize;
            let s1 = x - i0 as f32;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f32;
            let t0 = 1.0 - t1;

            let k00 = i0 + w * j0;
            let k01 = k00 + w;
            *cell = s0 * (t0 * d0s[k00] + t1 * d0s[k01]) + s1 * (t0 * d0s[k00 + 1] + t1 * d0s[k01 + 1]);
        }
    });

    set_boundary(kind, d);
}
