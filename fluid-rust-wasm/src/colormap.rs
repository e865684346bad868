use fluid_core::Field;

/// Writes one RGBA pixel per interior cell, top row first (grid `j = m` is
/// the first canvas row and `j = 1` the last, so screen-up is grid-up).
///
/// Plain mode is grey `d`; fire mode maps `d` to `(d^2, 0, (2 - d) d)`.
pub fn density_rgba(d: &Field, fire: bool, out: &mut Vec<u8>) {
    let grid = d.grid();
    let (n, m) = (grid.n(), grid.m());
    out.clear();
    out.reserve(n * m * 4);

    for j in (1..=m).rev() {
        for i in 1..=n {
            let x = d.get(i, j).clamp(0.0, 1.0);
            let (r, g, b) = if fire {
                (x * x, 0.0, (2.0 - x) * x)
            } else {
                (x, x, x)
            };
            out.extend_from_slice(&[to_byte(r), to_byte(g), to_byte(b), 255]);
        }
    }
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
