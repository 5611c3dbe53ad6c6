//! Animal state shared by every species.

use serde::{Deserialize, Serialize};
use symbiosis_core::{AgentId, MutationConfig, NestId, Position, Species, SpeciesConfig};

/// A mobile agent in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: AgentId,
    pub species: Species,
    pub position: Position,
    /// The animal dies once this drops to zero or below
    pub energy: f64,
    pub p_reproduce: f64,
    pub energy_from_food: f64,
    /// Heritable symbiotic trait. Frogs read it as an approach (> 0) or
    /// avoid (< 0) bias towards spiders; spiders as their chance of chasing
    /// frogs. Ants and snakes carry it without using it.
    pub symbiotic_trait: f64,
    pub mutation: MutationConfig,
    /// Home nest, only set for spiders
    pub nest: Option<NestId>,
    pub birth_tick: u64,
    pub age: u64,
    pub offspring_count: u32,
    pub kills: u32,
}

impl Animal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AgentId,
        species: Species,
        position: Position,
        config: &SpeciesConfig,
        mutation: MutationConfig,
        symbiotic_trait: f64,
        birth_tick: u64,
    ) -> Self {
        Self {
            id,
            species,
            position,
            energy: config.initial_energy,
            p_reproduce: config.p_reproduce,
            energy_from_food: config.energy_from_food,
            symbiotic_trait,
            mutation,
            nest: None,
            birth_tick,
            age: 0,
            offspring_count: 0,
            kills: 0,
        }
    }

    pub fn with_nest(mut self, nest: NestId) -> Self {
        self.nest = Some(nest);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Pay the one-unit metabolic cost of a tick. Returns whether the
    /// animal survived it.
    pub fn metabolize(&mut self) -> bool {
        self.energy -= 1.0;
        self.age += 1;
        self.is_alive()
    }

    pub fn add_energy(&mut self, amount: f64) {
        self.energy += amount;
    }

    pub fn move_to(&mut self, new_position: Position) {
        self.position = new_position;
    }

    pub fn record_kill(&mut self) {
        self.kills += 1;
    }

    pub fn record_offspring(&mut self) {
        self.offspring_count += 1;
    }
}
