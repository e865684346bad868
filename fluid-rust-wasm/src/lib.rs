mod colormap;

use fluid_core::diagnostics::{max_speed, total_density};
use fluid_core::{Button, InputConfig, InputEvent, InputState, Orientation, SimParams, Simulation, Sources};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct Fluid {
    sim: Simulation,
    sources: Sources,
    input: InputState,
    fire_mode: bool,
    frames: FrameCounter,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl Fluid {
    #[wasm_bindgen(constructor)]
    pub fn new(n: usize, m: usize, dt: f32, viscosity: f32, diffusion: f32, width: f32, height: f32) -> Result<Fluid, JsValue> {
        let params = SimParams {
            n,
            m,
            dt,
            viscosity,
            diffusion,
        };
        let sim = Simulation::new(params).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let grid = sim.grid();
        Ok(Fluid {
            sim,
            sources: Sources::new(grid),
            input: InputState::new(grid, InputConfig::default(), width, height),
            fire_mode: false,
            frames: FrameCounter::new(now_ms()),
            pixels: Vec::new(),
        })
    }

    pub fn n(&self) -> usize { self.sim.grid().n() }
    pub fn m(&self) -> usize { self.sim.grid().m() }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.input.reset();
    }

    // Input
    pub fn resize(&mut self, width: f32, height: f32) {
        self.input.handle(InputEvent::Resized { width, height });
    }
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.handle(InputEvent::PointerMoved { x, y });
    }
    /// `button` follows `MouseEvent.button`: 0 paints dye, 2 drags the fluid.
    pub fn pointer_down(&mut self, button: i16) {
        if let Some(b) = to_button(button) {
            self.input.handle(InputEvent::PointerPressed(b));
        }
    }
    pub fn pointer_up(&mut self, button: i16) {
        if let Some(b) = to_button(button) {
            self.input.handle(InputEvent::PointerReleased(b));
        }
    }
    pub fn pin_source(&mut self) { self.input.handle(InputEvent::PinDensitySource); }
    pub fn density_line(&mut self, horizontal: bool) {
        let orientation = if horizontal { Orientation::Horizontal } else { Orientation::Vertical };
        self.input.handle(InputEvent::DensityLine(orientation));
    }
    pub fn toggle_fire_mode(&mut self) { self.fire_mode = !self.fire_mode; }

    // Step + timing (WASM-only)
    pub fn step(&mut self) -> Result<StepInfo, JsValue> {
        let t0 = now_ms();
        self.input
            .collect(&mut self.sources)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.sim.step(&self.sources);
        let t1 = now_ms();
        self.frames.tick(t1);

        let (u, v) = self.sim.velocity();
        Ok(StepInfo {
            compute_ms: t1 - t0,
            total_density: total_density(self.sim.density()),
            max_speed: max_speed(u, v),
        })
    }

    /// Frames per second over the last completed 5 s window (0 until then).
    pub fn frame_rate(&self) -> f64 { self.frames.fps() }

    // Copy-based JS access (reliable)
    pub fn density_rgba(&mut self) -> Vec<u8> {
        colormap::density_rgba(self.sim.density(), self.fire_mode, &mut self.pixels);
        self.pixels.clone()
    }
    pub fn density(&self) -> Vec<f32> { self.sim.density().data().to_vec() }
    pub fn velocity_u(&self) -> Vec<f32> { self.sim.velocity().0.data().to_vec() }
    pub fn velocity_v(&self) -> Vec<f32> { self.sim.velocity().1.data().to_vec() }
}

#[wasm_bindgen]
pub struct StepInfo {
    compute_ms: f64,
    total_density: f32,
    max_speed: f32,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
    pub fn total_density(&self) -> f32 { self.total_density }
    pub fn max_speed(&self) -> f32 { self.max_speed }
}

fn to_button(button: i16) -> Option<Button> {
    match button {
        0 => Some(Button::Primary),
        2 => Some(Button::Secondary),
        _ => None,
    }
}

const FPS_WINDOW_MS: f64 = 5000.0;

/// Counts frames and reports the rate once per 5 s window.
struct FrameCounter {
    window_start: f64,
    frames: u32,
    fps: f64,
}

impl FrameCounter {
    fn new(now: f64) -> Self {
        Self { window_start: now, frames: 0, fps: 0.0 }
    }

    fn tick(&mut self, now: f64) {
        self.frames += 1;
        let elapsed = now - self.window_start;
        if elapsed >= FPS_WINDOW_MS {
            self.fps = self.frames as f64 * 1000.0 / elapsed;
            self.window_start = now;
            self.frames = 0;
        }
    }

    fn fps(&self) -> f64 {
        self.fps
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
