//! Per-tick source injection and the pointer/keyboard state that feeds it.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::field::{Field, Grid};

/// Forces and dye injected during one tick. The simulation copies these
/// into its scratch buffers at the start of [`crate::Simulation::step`];
/// velocity sources are scaled by `dt`, density is deposited as-is.
#[derive(Debug, Clone)]
pub struct Sources {
    grid: Grid,
    u: Field,
    v: Field,
    d: Field,
}

impl Sources {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            u: Field::zeros(grid),
            v: Field::zeros(grid),
            d: Field::zeros(grid),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn u(&self) -> &Field {
        &self.u
    }

    pub fn v(&self) -> &Field {
        &self.v
    }

    pub fn d(&self) -> &Field {
        &self.d
    }

    pub fn clear(&mut self) {
        self.u.fill(0.0);
        self.v.fill(0.0);
        self.d.fill(0.0);
    }

    pub fn add_density(&mut self, i: usize, j: usize, amount: f32) -> Result<(), SimError> {
        self.grid.check_interior(i, j)?;
        self.d.add(i, j, amount);
        Ok(())
    }

    pub fn set_density(&mut self, i: usize, j: usize, amount: f32) -> Result<(), SimError> {
        self.grid.check_interior(i, j)?;
        self.d.set(i, j, amount);
        Ok(())
    }

    pub fn add_force(&mut self, i: usize, j: usize, fx: f32, fy: f32) -> Result<(), SimError> {
        self.grid.check_interior(i, j)?;
        self.u.add(i, j, fx);
        self.v.add(i, j, fy);
        Ok(())
    }

    /// Sets dye on cells `1..n` of column `index` (vertical) or row `index`
    /// (horizontal). The last interior cell of the line is left out.
    pub fn add_density_line(&mut self, orientation: Orientation, index: usize, amount: f32) -> Result<(), SimError> {
        let (n, m) = (self.grid.n(), self.grid.m());
        match orientation {
            Orientation::Vertical => {
                self.grid.check_interior(index, 1)?;
                for j in 1..m {
                    self.d.set(index, j, amount);
                }
            }
            Orientation::Horizontal => {
                self.grid.check_interior(1, index)?;
                for i in 1..n {
                    self.d.set(i, index, amount);
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Paints dye.
    Primary,
    /// Drags the fluid.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position in viewport pixels, y growing downward.
    PointerMoved { x: f32, y: f32 },
    PointerPressed(Button),
    PointerReleased(Button),
    Resized { width: f32, height: f32 },
    /// Turns the cell under the pointer into a permanent dye emitter.
    PinDensitySource,
    /// Draws a dye line through the pointer on the next tick.
    DensityLine(Orientation),
}

/// Injection strengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Force per pixel of pointer drag.
    pub force: f32,
    /// Dye written per painted cell per tick.
    pub source: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            force: 5.0,
            source: 100.0,
        }
    }
}

/// Turns a stream of [`InputEvent`]s into per-tick [`Sources`].
#[derive(Debug, Clone)]
pub struct InputState {
    grid: Grid,
    config: InputConfig,
    width: f32,
    height: f32,
    x: f32,
    y: f32,
    prev_x: f32,
    prev_y: f32,
    primary: bool,
    secondary: bool,
    emitters: Vec<(usize, usize)>,
    pending_lines: Vec<(Orientation, usize)>,
}

impl InputState {
    pub fn new(grid: Grid, config: InputConfig, width: f32, height: f32) -> Self {
        Self {
            grid,
            config,
            width: width.max(1.0),
            height: height.max(1.0),
            x: 0.0,
            y: 0.0,
            prev_x: 0.0,
            prev_y: 0.0,
            primary: false,
            secondary: false,
            emitters: Vec::new(),
            pending_lines: Vec::new(),
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn emitters(&self) -> &[(usize, usize)] {
        &self.emitters
    }

    /// Drops emitters and queued lines; pointer state is kept.
    pub fn reset(&mut self) {
        self.emitters.clear();
        self.pending_lines.clear();
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.x = x;
                self.y = y;
            }
            InputEvent::PointerPressed(button) | InputEvent::PointerReleased(button) => {
                let down = matches!(event, InputEvent::PointerPressed(_));
                // a press or release restarts the drag from here
                self.prev_x = self.x;
                self.prev_y = self.y;
                match button {
                    Button::Primary => self.primary = down,
                    Button::Secondary => self.secondary = down,
                }
            }
            InputEvent::Resized { width, height } => {
                self.width = width.max(1.0);
                self.height = height.max(1.0);
            }
            InputEvent::PinDensitySource => {
                if let Some((i, j)) = self.pointer_cell().filter(|&(i, j)| self.inset(i, j)) {
                    if !self.emitters.contains(&(i, j)) {
                        self.emitters.push((i, j));
                    }
                }
            }
            InputEvent::DensityLine(orientation) => {
                if let Some((i, j)) = self.pointer_cell() {
                    let (index, limit) = match orientation {
                        Orientation::Vertical => (i, self.grid.n()),
                        Orientation::Horizontal => (j, self.grid.m()),
                    };
                    if index > 1 && index < limit {
                        self.pending_lines.push((orientation, index));
                    }
                }
            }
        }
    }

    /// Grid cell under the pointer, if it lies on the interior.
    pub fn pointer_cell(&self) -> Option<(usize, usize)> {
        let fx = self.x / self.width * self.grid.n() as f32 + 1.0;
        let fy = (self.height - self.y) / self.height * self.grid.m() as f32 + 1.0;
        if fx < 1.0 || fy < 1.0 {
            return None;
        }
        let (i, j) = (fx as usize, fy as usize);
        self.grid.is_interior(i, j).then_some((i, j))
    }

    /// Rewrites `sources` with this tick's injections.
    pub fn collect(&mut self, sources: &mut Sources) -> Result<(), SimError> {
        sources.clear();
        let source = self.config.source;

        for &(i, j) in &self.emitters {
            sources.set_density(i, j, source)?;
        }

        for (orientation, index) in self.pending_lines.drain(..) {
            sources.add_density_line(orientation, index, source)?;
        }

        if self.primary || self.secondary {
            if let Some((i, j)) = self.pointer_cell() {
                if self.secondary {
                    let fx = self.config.force * (self.x - self.prev_x);
                    let fy = self.config.force * (self.prev_y - self.y);
                    sources.add_force(i, j, fx, fy)?;
                }
                if self.primary && self.inset(i, j) {
                    sources.set_density(i, j, source)?;
                }
            }
            self.prev_x = self.x;
            self.prev_y = self.y;
        }
        Ok(())
    }

    /// Interior cells one step in from the rim.
    fn inset(&self, i: usize, j: usize) -> bool {
        i > 1 && i < self.grid.n() && j > 1 && j < self.grid.m()
    }
}
