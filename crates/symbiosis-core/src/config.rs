//! Configuration types for the simulation.

use crate::{Error, Result, Species};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
        }
    }
}

/// Initial population sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub ants: usize,
    pub snakes: usize,
    pub frogs: usize,
    /// Spiders seeded on the centre cell of every nest
    pub spiders_per_nest: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            ants: 10,
            snakes: 10,
            frogs: 10,
            spiders_per_nest: 1,
        }
    }
}

/// How the symbiotic trait of a freshly seeded animal is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitInit {
    Fixed(f64),
    /// Uniform over `[low, high)`
    Uniform { low: f64, high: f64 },
}

impl TraitInit {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            TraitInit::Fixed(value) => value,
            TraitInit::Uniform { low, high } if high > low => rng.gen_range(low..high),
            TraitInit::Uniform { low, .. } => low,
        }
    }
}

/// Per-species lifecycle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Energy of seeded, immigrating and hatched animals
    pub initial_energy: f64,
    /// Chance per tick of attempting reproduction
    pub p_reproduce: f64,
    /// Energy gained per successful feed
    pub energy_from_food: f64,
    pub initial_trait: TraitInit,
}

impl SpeciesConfig {
    pub fn for_species(species: Species) -> Self {
        let initial_trait = match species {
            Species::Frog => TraitInit::Uniform { low: -1.0, high: 1.0 },
            Species::Spider => TraitInit::Uniform { low: 0.0, high: 1.0 },
            Species::Ant | Species::Snake => TraitInit::Fixed(0.0),
        };

        Self {
            initial_energy: 50.0,
            p_reproduce: 0.04,
            energy_from_food: 50.0,
            initial_trait,
        }
    }
}

/// Heritable trait drift applied on every birth
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Probability that an offspring's trait drifts at all (0.0 to 1.0)
    pub chance: f64,
    /// Maximum absolute drift when a mutation happens
    pub effectiveness: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            chance: 0.5,
            effectiveness: 0.1,
        }
    }
}

/// Nest lattice parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NestConfig {
    /// Nest density (0.0 to 1.0); higher means tighter spacing and more nests
    pub density: f64,
    /// Side length of each square nest, also the wall margin
    pub size: i32,
}

impl NestConfig {
    /// Distance between neighbouring nest anchors along an axis of length `dimension`
    pub fn spacing(&self, dimension: i32) -> i32 {
        (dimension as f64 * (1.0 - self.density)).floor() as i32
    }

    /// Whether any lattice point fits between the margins of an axis of length `dimension`
    pub fn has_lattice_points(&self, dimension: i32) -> bool {
        self.size < dimension - self.size
    }
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            density: 0.75,
            size: 3,
        }
    }
}

/// Egg incubation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EggConfig {
    /// Hit points of a freshly laid egg
    pub hit_points: i32,
    /// Ticks between laying and hatching
    pub incubation_ticks: u64,
    /// Maximum eggs inside a spider's catchment for it to lay another
    pub max_per_nest: usize,
    /// Chebyshev radius of the catchment counted against `max_per_nest`
    pub catchment_radius: i32,
}

impl Default for EggConfig {
    fn default() -> Self {
        Self {
            hit_points: 5,
            incubation_ticks: 5,
            max_per_nest: 16,
            catchment_radius: 2,
        }
    }
}

/// Fixed odds used by the spider movement and feeding rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiderBehavior {
    /// Chance of chasing an adjacent ant when no snake is adjacent
    pub ant_pursuit_chance: f64,
    /// Chance of killing a co-located ant
    pub ant_hit_chance: f64,
    /// Larger values make spiders wander further from their nest
    pub explore_factor: f64,
}

impl Default for SpiderBehavior {
    fn default() -> Self {
        Self {
            ant_pursuit_chance: 0.5,
            ant_hit_chance: 0.4,
            explore_factor: 15.0,
        }
    }
}

/// Exogenous ant immigration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmigrationConfig {
    /// Ants dropped at random cells on every spawning tick
    pub ant_spawn_rate: usize,
    /// Spawning happens on ticks that are a multiple of this
    pub interval: u64,
}

impl Default for ImmigrationConfig {
    fn default() -> Self {
        Self {
            ant_spawn_rate: 2,
            interval: 2,
        }
    }
}

/// Complete model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks a runner should advance the model
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub ant: SpeciesConfig,
    pub snake: SpeciesConfig,
    pub frog: SpeciesConfig,
    pub spider: SpeciesConfig,
    pub mutation: MutationConfig,
    pub nests: NestConfig,
    pub eggs: EggConfig,
    pub spider_behavior: SpiderBehavior,
    pub immigration: ImmigrationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ticks: 500,
            seed: 0,
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
            ant: SpeciesConfig::for_species(Species::Ant),
            snake: SpeciesConfig::for_species(Species::Snake),
            frog: SpeciesConfig::for_species(Species::Frog),
            spider: SpeciesConfig::for_species(Species::Spider),
            mutation: MutationConfig::default(),
            nests: NestConfig::default(),
            eggs: EggConfig::default(),
            spider_behavior: SpiderBehavior::default(),
            immigration: ImmigrationConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn species(&self, species: Species) -> &SpeciesConfig {
        match species {
            Species::Ant => &self.ant,
            Species::Snake => &self.snake,
            Species::Frog => &self.frog,
            Species::Spider => &self.spider,
        }
    }

    pub fn species_mut(&mut self, species: Species) -> &mut SpeciesConfig {
        match species {
            Species::Ant => &mut self.ant,
            Species::Snake => &mut self.snake,
            Species::Frog => &mut self.frog,
            Species::Spider => &mut self.spider,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Check natural numeric bounds. Empty populations and nest-free
    /// layouts are valid configurations.
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::Validation(format!(
                "grid dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }

        for species in Species::SCHEDULE {
            let cfg = self.species(species);
            check_probability(&format!("{species}.p_reproduce"), cfg.p_reproduce)?;
            if let TraitInit::Uniform { low, high } = cfg.initial_trait {
                if low > high {
                    return Err(Error::Validation(format!(
                        "{species}.initial_trait range is empty: [{low}, {high})"
                    )));
                }
            }
        }

        check_probability("mutation.chance", self.mutation.chance)?;
        if !(self.mutation.effectiveness >= 0.0) {
            return Err(Error::Validation(format!(
                "mutation.effectiveness must be non-negative, got {}",
                self.mutation.effectiveness
            )));
        }

        if !(0.0..1.0).contains(&self.nests.density) {
            return Err(Error::Validation(format!(
                "nests.density must be in [0, 1), got {}",
                self.nests.density
            )));
        }
        if self.nests.size < 1 {
            return Err(Error::Validation(format!(
                "nests.size must be at least 1, got {}",
                self.nests.size
            )));
        }
        // Zero spacing only matters when lattice points fit between the margins
        let spacing_x = self.nests.spacing(self.world.width);
        let spacing_y = self.nests.spacing(self.world.height);
        let lattice_empty = !self.nests.has_lattice_points(self.world.width)
            || !self.nests.has_lattice_points(self.world.height);
        if !lattice_empty && (spacing_x <= 0 || spacing_y <= 0) {
            return Err(Error::Validation(format!(
                "nest spacing collapses to zero ({spacing_x}, {spacing_y}); lower nests.density"
            )));
        }

        if self.eggs.catchment_radius < 0 {
            return Err(Error::Validation(format!(
                "eggs.catchment_radius must be non-negative, got {}",
                self.eggs.catchment_radius
            )));
        }

        check_probability("spider_behavior.ant_pursuit_chance", self.spider_behavior.ant_pursuit_chance)?;
        check_probability("spider_behavior.ant_hit_chance", self.spider_behavior.ant_hit_chance)?;
        if !(self.spider_behavior.explore_factor > 0.0) {
            return Err(Error::Validation(format!(
                "spider_behavior.explore_factor must be positive, got {}",
                self.spider_behavior.explore_factor
            )));
        }

        if self.immigration.interval == 0 {
            return Err(Error::Validation(
                "immigration.interval must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{name} must be a probability in [0, 1], got {value}"
        )))
    }
}
