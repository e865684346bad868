mod scenario;

use clap::Parser;
use fluid_core::{FrameStats, SimParams, Simulation, Sources};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scenario::{Scenario, Strength, inject};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// JSON file with simulation parameters; flags below override it
    #[arg(long)]
    params: Option<PathBuf>,

    /// Interior columns N
    #[arg(long)]
    n: Option<usize>,

    /// Interior rows M (defaults to N)
    #[arg(long)]
    m: Option<usize>,

    /// Timestep
    #[arg(long)]
    dt: Option<f32>,

    /// Velocity diffusion rate
    #[arg(long)]
    viscosity: Option<f32>,

    /// Dye diffusion rate
    #[arg(long)]
    diffusion: Option<f32>,

    /// Injection pattern
    #[arg(long, value_enum, default_value_t = Scenario::Plume)]
    scenario: Scenario,

    /// Number of ticks to run
    #[arg(long, default_value_t = 200)]
    ticks: usize,

    /// Write a frame every K ticks
    #[arg(long, default_value_t = 10)]
    frame_every: usize,

    /// Dye deposited per source cell per tick
    #[arg(long, default_value_t = 100.0)]
    source: f32,

    /// Force scale
    #[arg(long, default_value_t = 5.0)]
    force: f32,

    /// RNG seed (reproducibility)
    #[arg(long, default_value_t = 123)]
    seed: u64,
}

#[derive(Serialize)]
struct FrameRow<'a> {
    frame_idx: usize,
    tick: usize,

    scenario: &'a str,
    seed: u64,

    n: usize,
    m: usize,
    dt: f32,
    viscosity: f32,
    diffusion: f32,

    #[serde(flatten)]
    stats: FrameStats,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.frame_every == 0 {
        return Err("frame_every must be >= 1".into());
    }

    let params = resolve_params(&args)?;
    let mut sim = Simulation::new(params).map_err(|e| format!("Simulation::new: {e}"))?;
    let mut sources = Sources::new(sim.grid());
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let strength = Strength {
        source: args.source,
        force: args.force,
    };

    info!(
        "running {} for {} ticks on {}x{} (dt={}, viscosity={}, diffusion={})",
        args.scenario.as_str(),
        args.ticks,
        params.n,
        params.m,
        params.dt,
        params.viscosity,
        params.diffusion
    );

    fs::create_dir_all(&args.out)?;

    let mut frame_writer = BufWriter::new(File::create(args.out.join("density.bin"))?);
    let mut meta_file = BufWriter::new(
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(args.out.join("meta.jsonl"))?,
    );

    let mut frames = 0usize;
    let mut warned = false;

    for tick in 0..args.ticks {
        inject(args.scenario, &mut rng, tick, strength, &mut sources)?;
        sim.step(&sources);

        if (tick + 1) % args.frame_every != 0 {
            continue;
        }

        let stats = FrameStats::measure(&sim);
        if !stats.finite && !warned {
            warn!("non-finite values at tick {tick}; try a smaller dt");
            warned = true;
        }

        write_f32_vec(&mut frame_writer, sim.density().data())?;

        let row = FrameRow {
            frame_idx: frames,
            tick: tick + 1,
            scenario: args.scenario.as_str(),
            seed: args.seed,
            n: params.n,
            m: params.m,
            dt: params.dt,
            viscosity: params.viscosity,
            diffusion: params.diffusion,
            stats,
        };
        serde_json::to_writer(&mut meta_file, &row)?;
        meta_file.write_all(b"\n")?;

        info!(
            "tick {:>5}: density={:.3} ke={:.5} max|div|={:.2e}",
            tick + 1,
            stats.total_density,
            stats.kinetic_energy,
            stats.max_divergence
        );
        frames += 1;
    }

    frame_writer.flush()?;
    meta_file.flush()?;

    println!("Wrote frames to: {}", args.out.display());
    println!(
        "Frames: {} ({} values each, ticks={} / frame_every={})",
        frames,
        sim.grid().size(),
        args.ticks,
        args.frame_every
    );

    Ok(())
}

/// Defaults, then the `--params` file, then individual flags.
/// `m` follows `n` unless the file or `--m` names it.
fn resolve_params(args: &Args) -> Result<SimParams, Box<dyn std::error::Error>> {
    let (mut params, file_has_m) = match &args.params {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let value: serde_json::Value =
                serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?;
            let has_m = value.get("m").is_some();
            let params = serde_json::from_value::<SimParams>(value).map_err(|e| format!("{}: {e}", path.display()))?;
            (params, has_m)
        }
        None => (SimParams::default(), false),
    };

    if let Some(n) = args.n {
        params.n = n;
    }
    match args.m {
        Some(m) => params.m = m,
        None if !file_has_m => params.m = params.n,
        None => {}
    }
    if let Some(dt) = args.dt {
        params.dt = dt;
    }
    if let Some(viscosity) = args.viscosity {
        params.viscosity = viscosity;
    }
    if let Some(diffusion) = args.diffusion {
        params.diffusion = diffusion;
    }
    Ok(params)
}

fn write_f32_vec<W: Write>(w: &mut W, v: &[f32]) -> std::io::Result<()> {
    for &x in v {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}
