//! Grid-based stable-fluids solver: implicit diffusion, semi-Lagrangian
//! advection and pressure projection of a 2D velocity field carrying a
//! passive dye density, on an `n x m` grid with a one-cell ghost border.

pub mod advect;
pub mod boundary;
pub mod diagnostics;
pub mod diffuse;
pub mod error;
pub mod field;
pub mod input;
pub mod project;
pub mod sim;

pub use boundary::{BoundaryKind, set_boundary};
pub use diagnostics::FrameStats;
pub use diffuse::RELAX_ITERATIONS;
pub use error::SimError;
pub use field::{Field, FieldPair, Grid};
pub use input::{Button, InputConfig, InputEvent, InputState, Orientation, Sources};
pub use sim::{FieldKind, FieldView, SimParams, Simulation, StepPhase};
