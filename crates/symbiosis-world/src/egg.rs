//! Spider eggs and their incubation.

use serde::{Deserialize, Serialize};
use symbiosis_core::{AgentId, EggConfig, NestId, Position};

/// Outcome of one incubation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EggState {
    Incubating,
    /// Incubation finished; the egg turns into a spider
    Hatched,
    /// Hit points ran out; the egg is gone
    Depleted,
}

/// A stationary egg laid by a spider inside a nest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Egg {
    pub id: AgentId,
    pub position: Position,
    pub hit_points: i32,
    pub laid_at: u64,
    pub nest: NestId,
    /// Trait handed to the spider that hatches
    pub symbiotic_trait: f64,
}

impl Egg {
    pub fn new(
        id: AgentId,
        position: Position,
        nest: NestId,
        symbiotic_trait: f64,
        laid_at: u64,
        config: &EggConfig,
    ) -> Self {
        Self {
            id,
            position,
            hit_points: config.hit_points,
            laid_at,
            nest,
            symbiotic_trait,
        }
    }

    /// Advance incubation by one tick.
    ///
    /// An adjacent ant costs one hit point. Depletion is checked before the
    /// hatch timer, so a fatally damaged egg never hatches.
    pub fn incubate(&mut self, ant_adjacent: bool, tick: u64, config: &EggConfig) -> EggState {
        if ant_adjacent {
            self.hit_points -= 1;
        }

        if self.hit_points <= 0 {
            EggState::Depleted
        } else if tick.saturating_sub(self.laid_at) >= config.incubation_ticks {
            EggState::Hatched
        } else {
            EggState::Incubating
        }
    }
}
