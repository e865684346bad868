use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("grid must have at least one interior cell per axis (got n={n}, m={m})")]
    InvalidGrid { n: usize, m: usize },

    #[error("timestep must be finite and > 0 (got {0})")]
    InvalidTimestep(f32),

    #[error("{name} must be finite and >= 0 (got {value})")]
    InvalidRate { name: &'static str, value: f32 },

    #[error("field is on a {}x{} grid, expected {}x{}", .got.0, .got.1, .expected.0, .expected.1)]
    GridMismatch { expected: (usize, usize), got: (usize, usize) },

    /// A caller addressed a cell outside the interior `1..=n` x `1..=m`.
    #[error("cell ({i}, {j}) is outside the interior of a {n}x{m} grid")]
    OutOfBounds { i: usize, j: usize, n: usize, m: usize },
}
