use crate::field::Field;

/// Which quantity a field holds, for wall sign-mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Scalars (density, pressure, divergence): copied at every wall.
    None,
    /// x-velocity: negated at the left/right walls.
    HorizontalVelocity,
    /// y-velocity: negated at the bottom/top walls.
    VerticalVelocity,
}

/// Rewrites the ghost border of `x` from its interior.
///
/// Each wall copies the adjacent interior cell, negating the velocity
/// component normal to that wall. Corners are the mean of their two edge
/// neighbours and are written last.
pub fn set_boundary(kind: BoundaryKind, x: &mut Field) {
    let grid = x.grid();
    let (n, m) = (grid.n(), grid.m());

    let flip_x = if kind == BoundaryKind::HorizontalVelocity { -1.0 } else { 1.0 };
    let flip_y = if kind == BoundaryKind::VerticalVelocity { -1.0 } else { 1.0 };

    for i in 1..=n {
        x.set(i, 0, flip_y * x.get(i, 1));
        x.set(i, m + 1, flip_y * x.get(i, m));
    }
    for j in 1..=m {
        x.set(0, j, flip_x * x.get(1, j));
        x.set(n + 1, j, flip_x * x.get(n, j));
    }

    x.set(0, 0, 0.5 * (x.get(1, 0) + x.get(0, 1)));
    x.set(0, m + 1, 0.5 * (x.get(1, m + 1) + x.get(0, m)));
    x.set(n + 1, 0, 0.5 * (x.get(n, 0) + x.get(n + 1, 1)));
    x.set(n + 1, m + 1, 0.5 * (x.get(n, m + 1) + x.get(n + 1, m)));
}
