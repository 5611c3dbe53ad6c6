//! Data-collection hook invoked after every tick.

use crate::simulation::Simulation;
use symbiosis_core::PopulationSnapshot;

/// Receives read-only access to the model after each tick
pub trait DataCollector {
    fn collect(&mut self, sim: &Simulation);
}

impl<F> DataCollector for F
where
    F: FnMut(&Simulation),
{
    fn collect(&mut self, sim: &Simulation) {
        self(sim)
    }
}

/// In-memory series of population snapshots, one per collection
#[derive(Debug, Clone, Default)]
pub struct PopulationRecorder {
    snapshots: Vec<PopulationSnapshot>,
}

impl PopulationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[PopulationSnapshot] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&PopulationSnapshot> {
        self.snapshots.last()
    }
}

impl DataCollector for PopulationRecorder {
    fn collect(&mut self, sim: &Simulation) {
        self.snapshots.push(sim.snapshot());
    }
}
