use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::advect::advect;
use crate::boundary::{BoundaryKind, set_boundary};
use crate::diffuse::diffuse;
use crate::error::SimError;
use crate::field::{Field, FieldPair, Grid};
use crate::input::Sources;
use crate::project::project;

/// Run configuration. Fixed for the lifetime of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Interior columns.
    pub n: usize,
    /// Interior rows.
    pub m: usize,
    pub dt: f32,
    /// Diffusion rate of the velocity field.
    pub viscosity: f32,
    /// Diffusion rate of the density field; 0 keeps dye from spreading.
    pub diffusion: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            n: 100,
            m: 100,
            dt: 0.1,
            viscosity: 0.0008,
            diffusion: 0.0,
        }
    }
}

impl SimParams {
    pub fn validate(&self) -> Result<Grid, SimError> {
        let grid = Grid::new(self.n, self.m)?;
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidTimestep(self.dt));
        }
        for (name, value) in [("viscosity", self.viscosity), ("diffusion", self.diffusion)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidRate { name, value });
            }
        }
        Ok(grid)
    }
}

/// Where a tick currently is. A finished tick always rests in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    Idle,
    Sourcing,
    DiffusingVelocity,
    Projecting1,
    AdvectingVelocity,
    Projecting2,
    DiffusingDensity,
    AdvectingDensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Velocity,
    Density,
}

/// Read-only view of the current buffers, for rendering.
#[derive(Debug, Clone, Copy)]
pub enum FieldView<'a> {
    Velocity { u: &'a Field, v: &'a Field },
    Density(&'a Field),
}

/// Stable-fluids solver state: velocity `(u, v)` and dye density `d`, each
/// with a scratch buffer.
#[derive(Debug, Clone)]
pub struct Simulation {
    params: SimParams,
    grid: Grid,
    u: FieldPair,
    v: FieldPair,
    d: FieldPair,
    phase: StepPhase,
}

impl Simulation {
    pub fn new(params: SimParams) -> Result<Simulation, SimError> {
        let grid = params.validate()?;
        debug!(
            "allocating {}x{} simulation (dt={}, viscosity={}, diffusion={})",
            grid.n(),
            grid.m(),
            params.dt,
            params.viscosity,
            params.diffusion
        );
        Ok(Simulation {
            params,
            grid,
            u: FieldPair::zeros(grid),
            v: FieldPair::zeros(grid),
            d: FieldPair::zeros(grid),
            phase: StepPhase::Idle,
        })
    }

    /// Starts from the given velocity and density instead of rest.
    ///
    /// Each field must be on the grid described by `params`; the wall
    /// conditions are applied to the copies before the first tick.
    pub fn with_initial(params: SimParams, u: &Field, v: &Field, d: &Field) -> Result<Simulation, SimError> {
        let mut sim = Simulation::new(params)?;
        for field in [u, v, d] {
            let got = field.grid();
            if got != sim.grid {
                return Err(SimError::GridMismatch {
                    expected: (sim.grid.n(), sim.grid.m()),
                    got: (got.n(), got.m()),
                });
            }
        }
        sim.u.current.copy_from(u);
        sim.v.current.copy_from(v);
        sim.d.current.copy_from(d);
        set_boundary(BoundaryKind::HorizontalVelocity, &mut sim.u.current);
        set_boundary(BoundaryKind::VerticalVelocity, &mut sim.v.current);
        set_boundary(BoundaryKind::None, &mut sim.d.current);
        Ok(sim)
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Zeroes every buffer. Parameters are kept.
    pub fn reset(&mut self) {
        debug!("reset");
        self.u.clear();
        self.v.clear();
        self.d.clear();
        self.phase = StepPhase::Idle;
    }

    pub fn sample(&self, kind: FieldKind) -> FieldView<'_> {
        match kind {
            FieldKind::Velocity => FieldView::Velocity {
                u: &self.u.current,
                v: &self.v.current,
            },
            FieldKind::Density => FieldView::Density(&self.d.current),
        }
    }

    pub fn velocity(&self) -> (&Field, &Field) {
        (&self.u.current, &self.v.current)
    }

    pub fn density(&self) -> &Field {
        &self.d.current
    }

    /// Advances one tick, merging this tick's `sources`.
    ///
    /// Panics if `sources` was built for a different grid.
    pub fn step(&mut self, sources: &Sources) {
        self.step_observed(sources, |_| {});
    }

    /// Like [`Simulation::step`], calling `on_phase` as each phase begins
    /// and once more with `Idle` when the tick completes.
    pub fn step_observed(&mut self, sources: &Sources, mut on_phase: impl FnMut(StepPhase)) {
        assert_eq!(sources.grid(), self.grid, "sources built for a different grid");
        let SimParams {
            dt,
            viscosity,
            diffusion,
            ..
        } = self.params;

        self.enter(StepPhase::Sourcing, &mut on_phase);
        self.u.scratch.copy_from(sources.u());
        self.v.scratch.copy_from(sources.v());
        self.d.scratch.copy_from(sources.d());

        // velocity
        self.u.current.add_scaled(&self.u.scratch, dt);
        self.v.current.add_scaled(&self.v.scratch, dt);

        self.enter(StepPhase::DiffusingVelocity, &mut on_phase);
        self.u.swap();
        diffuse(
            BoundaryKind::HorizontalVelocity,
            &mut self.u.current,
            &self.u.scratch,
            viscosity,
            dt,
        );
        self.v.swap();
        diffuse(
            BoundaryKind::VerticalVelocity,
            &mut self.v.current,
            &self.v.scratch,
            viscosity,
            dt,
        );

        self.enter(StepPhase::Projecting1, &mut on_phase);
        project(
            &mut self.u.current,
            &mut self.v.current,
            &mut self.u.scratch,
            &mut self.v.scratch,
        );

        self.enter(StepPhase::AdvectingVelocity, &mut on_phase);
        self.u.swap();
        self.v.swap();
        // both components ride on the pre-advection field held in the scratch buffers
        advect(
            BoundaryKind::HorizontalVelocity,
            &mut self.u.current,
            &self.u.scratch,
            &self.u.scratch,
            &self.v.scratch,
            dt,
        );
        advect(
            BoundaryKind::VerticalVelocity,
            &mut self.v.current,
            &self.v.scratch,
            &self.u.scratch,
            &self.v.scratch,
            dt,
        );

        self.enter(StepPhase::Projecting2, &mut on_phase);
        project(
            &mut self.u.current,
            &mut self.v.current,
            &mut self.u.scratch,
            &mut self.v.scratch,
        );

        // density
        self.enter(StepPhase::DiffusingDensity, &mut on_phase);
        self.d.current.add_scaled(&self.d.scratch, 1.0);
        self.d.swap();
        diffuse(BoundaryKind::None, &mut self.d.current, &self.d.scratch, diffusion, dt);

        self.enter(StepPhase::AdvectingDensity, &mut on_phase);
        self.d.swap();
        advect(
            BoundaryKind::None,
            &mut self.d.current,
            &self.d.scratch,
            &self.u.current,
            &self.v.current,
            dt,
        );

        self.enter(StepPhase::Idle, &mut on_phase);
    }

    fn enter(&mut self, phase: StepPhase, on_phase: &mut impl FnMut(StepPhase)) {
        trace!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        on_phase(phase);
    }
}
