use crate::error::SimError;
use crate::phase::Phase;
use crate::sim::simulation::Simulation;
use crate::sim::simulation_state::ThermalSnapshot;
use crate::sim_op::{SimOp, SimOpHandle};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub tick: u64,
    pub from: Phase,
    pub to: Phase,
    pub temperature: f64,
    pub energy: f64,
}

/// Records the temperature/energy curve of a run and every phase change on it.
/// Each `run` starts a fresh curve; the previous one is discarded in `init_sim`.
pub struct HeatingCurveOp {
    /// Keep one snapshot in every `sample_every` ticks; transitions are always kept
    sample_every: u64,
    samples: Vec<ThermalSnapshot>,
    transitions: Vec<PhaseTransition>,
    last_phase: Option<Phase>,
}

impl HeatingCurveOp {
    pub fn new(sample_every: u64) -> Self {
        Self {
            sample_every: sample_every.max(1),
            samples: Vec::new(),
            transitions: Vec::new(),
            last_phase: None,
        }
    }

    pub fn handle(sample_every: u64) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new(sample_every)))
    }

    pub fn sample_every(&self) -> u64 {
        self.sample_every
    }

    /// Zero is treated as 1 (keep every tick)
    pub fn set_sample_every(&mut self, sample_every: u64) {
        self.sample_every = sample_every.max(1);
    }

    pub fn samples(&self) -> &[ThermalSnapshot] {
        &self.samples
    }

    pub fn transitions(&self) -> &[PhaseTransition] {
        &self.transitions
    }

    pub const CSV_HEADER: &'static str = "tick,temperature_c,phase,energy_j,direction,saturation";

    pub fn to_csv_string(&self) -> String {
        let mut out = String::from(Self::CSV_HEADER);
        out.push('\n');
        for s in &self.samples {
            out.push_str(&Self::csv_row(s));
            out.push('\n');
        }
        out
    }

    pub fn write_csv<P: AsRef<Path>>(&self, file_path: P) -> Result<(), SimError> {
        let path = file_path.as_ref();
        let io_err = |source| SimError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        writeln!(writer, "{}", Self::CSV_HEADER).map_err(io_err)?;
        for s in &self.samples {
            writeln!(writer, "{}", Self::csv_row(s)).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;

        debug!(path = %path.display(), rows = self.samples.len(), "wrote heating curve");
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(&self.samples)?)
    }

    fn csv_row(s: &ThermalSnapshot) -> String {
        format!(
            "{},{:.3},{},{:.3},{},{:?}",
            s.tick, s.temperature, s.phase, s.energy, s.direction, s.saturation
        )
    }
}

impl SimOp for HeatingCurveOp {
    fn name(&self) -> &str {
        "HeatingCurve"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn init_sim(&mut self, sim: &mut Simulation) {
        let start = sim.snapshot();
        self.samples.clear();
        self.transitions.clear();
        self.last_phase = Some(start.phase);
        self.samples.push(start);
    }

    fn update_sim(&mut self, _sim: &mut Simulation, snapshot: &ThermalSnapshot) {
        if let Some(previous) = self.last_phase {
            if previous != snapshot.phase {
                self.transitions.push(PhaseTransition {
                    tick: snapshot.tick,
                    from: previous,
                    to: snapshot.phase,
                    temperature: snapshot.temperature,
                    energy: snapshot.energy,
                });
            }
        }
        self.last_phase = Some(snapshot.phase);

        if snapshot.tick % self.sample_every == 0 {
            self.samples.push(snapshot.clone());
        }
    }
}
