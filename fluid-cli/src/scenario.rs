use clap::ValueEnum;
use fluid_core::{Orientation, SimError, Sources};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Steady dye + upward push at the bottom centre.
    Plume,
    /// Random dye/force splats every few ticks.
    Splats,
    /// One horizontal and one vertical dye line, stirred by a corner force.
    Lines,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Plume => "plume",
            Scenario::Splats => "splats",
            Scenario::Lines => "lines",
        }
    }
}

/// Injection strengths shared by all scenarios.
#[derive(Clone, Copy, Debug)]
pub struct Strength {
    pub source: f32,
    pub force: f32,
}

/// Fill `sources` with this tick's injections. `sources` is cleared first.
pub fn inject<R: Rng>(
    scenario: Scenario,
    rng: &mut R,
    tick: usize,
    strength: Strength,
    sources: &mut Sources,
) -> Result<(), SimError> {
    sources.clear();
    let grid = sources.grid();
    let (n, m) = (grid.n(), grid.m());
    let ci = n.div_ceil(2);

    match scenario {
        Scenario::Plume => {
            let j = m.min(2);
            sources.add_density(ci, j, strength.source)?;
            sources.add_force(ci, j, 0.0, strength.force * 10.0)?;
        }

        Scenario::Splats => {
            // a burst every 8 ticks, 1..=3 splats per burst
            if tick % 8 == 0 {
                let splats = rng.gen_range(1..=3);
                for _ in 0..splats {
                    let i = rng.gen_range(1..=n);
                    let j = rng.gen_range(1..=m);
                    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                    let mag = strength.force * rng.gen_range(5.0..20.0);
                    sources.add_density(i, j, strength.source * rng.gen_range(0.5..1.0))?;
                    sources.add_force(i, j, mag * angle.cos(), mag * angle.sin())?;
                }
            }
        }

        Scenario::Lines => {
            if tick == 0 {
                sources.add_density_line(Orientation::Horizontal, m.div_ceil(2), strength.source)?;
                sources.add_density_line(Orientation::Vertical, ci, strength.source)?;
            }
            sources.add_force(1, 1, strength.force * 10.0, strength.force * 10.0)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluid_core::Grid;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const STRENGTH: Strength = Strength {
        source: 100.0,
        force: 5.0,
    };

    #[test]
    fn test_every_scenario_injects_on_small_grids() {
        for scenario in Scenario::value_variants() {
            for (n, m) in [(1, 1), (2, 3), (16, 9)] {
                let mut rng = ChaCha8Rng::seed_from_u64(1);
                let mut sources = Sources::new(Grid::new(n, m).unwrap());
                inject(*scenario, &mut rng, 0, STRENGTH, &mut sources).unwrap();
            }
        }
    }

    #[test]
    fn test_plume_pushes_upward() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sources = Sources::new(Grid::new(10, 10).unwrap());
        inject(Scenario::Plume, &mut rng, 3, STRENGTH, &mut sources).unwrap();
        assert_eq!(sources.d().get(5, 2), 100.0);
        assert_eq!(sources.v().get(5, 2), 50.0);
        assert_eq!(sources.u().get(5, 2), 0.0);
    }

    #[test]
    fn test_splats_are_quiet_between_bursts() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut sources = Sources::new(Grid::new(10, 10).unwrap());
        inject(Scenario::Splats, &mut rng, 3, STRENGTH, &mut sources).unwrap();
        assert!(sources.d().data().iter().all(|&x| x == 0.0));
        inject(Scenario::Splats, &mut rng, 8, STRENGTH, &mut sources).unwrap();
        assert!(sources.d().data().iter().any(|&x| x > 0.0));
    }
}
