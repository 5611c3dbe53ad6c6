//! Simulation engine and tick scheduler.

use crate::animal::Animal;
use crate::collector::DataCollector;
use crate::egg::{Egg, EggState};
use crate::feeding;
use crate::grid::Grid;
use crate::movement::{self, MoveContext};
use crate::nest::{self, Nest};
use crate::reproduction;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use symbiosis_core::{
    mean_or_nan, AgentId, AgentKind, Error, NestId, Occupant, PopulationSnapshot, Position,
    Result, SimulationConfig, Species, Zone,
};
use tracing::{debug, info, instrument, trace};

/// Running totals of lifecycle events since construction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCounters {
    pub births: u64,
    pub eggs_laid: u64,
    pub hatches: u64,
    pub eggs_depleted: u64,
    pub starvations: u64,
    pub predations: u64,
    pub immigrants: u64,
}

pub struct Simulation {
    grid: Grid,
    nests: Vec<Nest>,
    animals: BTreeMap<AgentId, Animal>,
    eggs: BTreeMap<AgentId, Egg>,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    tick: u64,
    next_id: u64,
    counters: EventCounters,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut grid = Grid::new(config.world.width, config.world.height);
        let nests = nest::layout(&config.nests, config.world.width, config.world.height);
        nest::paint_zones(&mut grid, &nests);

        if nests.is_empty() {
            info!(
                width = config.world.width,
                height = config.world.height,
                density = config.nests.density,
                "Nest layout produced no nests; spiders cannot breed"
            );
        }

        let mut sim = Self {
            grid,
            nests,
            animals: BTreeMap::new(),
            eggs: BTreeMap::new(),
            config,
            rng,
            tick: 0,
            next_id: 0,
            counters: EventCounters::default(),
        };

        sim.seed_population();

        info!(
            nests = sim.nests.len(),
            ants = sim.population(Species::Ant),
            snakes = sim.population(Species::Snake),
            frogs = sim.population(Species::Frog),
            spiders = sim.population(Species::Spider),
            "Simulation initialized"
        );

        Ok(sim)
    }

    fn seed_population(&mut self) {
        let nest_centers: Vec<(NestId, Position)> =
            self.nests.iter().map(|n| (n.id, n.center())).collect();
        for (nest_id, center) in nest_centers {
            for _ in 0..self.config.population.spiders_per_nest {
                let spider = self.new_animal(Species::Spider, center).with_nest(nest_id);
                self.insert_animal(spider);
            }
        }

        let counts = [
            (Species::Frog, self.config.population.frogs),
            (Species::Snake, self.config.population.snakes),
            (Species::Ant, self.config.population.ants),
        ];
        for (species, count) in counts {
            for _ in 0..count {
                let pos = self.random_position();
                let animal = self.new_animal(species, pos);
                self.insert_animal(animal);
            }
        }
    }

    /// Run the simulation for `ticks` ticks, collecting the current state
    /// once up front and again after every tick
    #[instrument(skip(self, collector), fields(start_tick = self.tick))]
    pub fn run<C: DataCollector + ?Sized>(&mut self, ticks: u64, collector: &mut C) {
        info!("Starting simulation for {} ticks", ticks);
        collector.collect(self);

        for _ in 0..ticks {
            self.step_with(collector);
        }

        self.emit_run_summary();
    }

    /// Execute one tick, then hand the model to `collector`
    pub fn step_with<C: DataCollector + ?Sized>(&mut self, collector: &mut C) {
        self.step();
        collector.collect(self);
    }

    /// Execute one simulation tick.
    ///
    /// Species groups run in fixed order (ants, snakes, frogs, spiders), each
    /// in a fresh random order over the animals alive when its turn begins.
    /// Eggs present at the start of the tick run next, then immigrants arrive.
    pub fn step(&mut self) {
        self.tick += 1;
        let egg_ids: Vec<AgentId> = self.eggs.keys().copied().collect();

        for species in Species::SCHEDULE {
            let mut ids = self.ids_of(species);
            ids.shuffle(&mut self.rng);

            for id in ids {
                self.step_animal(id);
            }
        }

        self.step_eggs(egg_ids);
        self.immigrate();

        if self.tick % 100 == 0 {
            self.emit_population_metrics();
        }
    }

    fn step_animal(&mut self, id: AgentId) {
        // Might have been eaten earlier this tick
        let Some(animal) = self.animals.get_mut(&id) else {
            return;
        };

        if !animal.metabolize() {
            if let Some(dead) = self.remove_animal(id) {
                self.counters.starvations += 1;
                debug!(
                    event = "starvation",
                    agent = %id,
                    species = %dead.species,
                    age = dead.age,
                    x = dead.position.x,
                    y = dead.position.y,
                    tick = self.tick,
                    "Animal starved"
                );
            }
            return;
        }

        let destination = match self.animals.get(&id) {
            Some(animal) => {
                let ctx = MoveContext {
                    grid: &self.grid,
                    nests: &self.nests,
                    spider: &self.config.spider_behavior,
                };
                movement::choose_destination(animal, &ctx, &mut self.rng)
            }
            None => return,
        };
        self.relocate(id, destination);

        self.feed(id);

        let Some(p_reproduce) = self.animals.get(&id).map(|a| a.p_reproduce) else {
            return;
        };
        if self.rng.gen::<f64>() < p_reproduce {
            self.reproduce(id);
        }
    }

    fn relocate(&mut self, id: AgentId, destination: Position) {
        let Some(animal) = self.animals.get_mut(&id) else {
            return;
        };
        if animal.position == destination {
            return;
        }

        self.grid.remove(animal.position, id);
        self.grid.place(destination, Occupant::new(id, animal.species));
        animal.move_to(destination);
    }

    fn feed(&mut self, id: AgentId) {
        let meal = match self.animals.get(&id) {
            Some(animal) => {
                feeding::choose_meal(animal, &self.grid, &self.config.spider_behavior, &mut self.rng)
            }
            None => return,
        };
        let Some(meal) = meal else {
            return;
        };

        self.remove_animal(meal.prey);
        self.counters.predations += 1;

        if let Some(predator) = self.animals.get_mut(&id) {
            predator.add_energy(meal.energy_gain);
            predator.record_kill();
            debug!(
                event = "predation",
                predator = %id,
                predator_species = %predator.species,
                prey = %meal.prey,
                prey_species = %meal.prey_species,
                energy_gain = meal.energy_gain,
                tick = self.tick,
                "Prey eaten"
            );
        }
    }

    fn reproduce(&mut self, id: AgentId) {
        let Some(species) = self.animals.get(&id).map(|a| a.species) else {
            return;
        };
        if species == Species::Spider {
            self.lay_egg(id);
            return;
        }

        let child_id = self.next_agent_id();
        let Some(parent) = self.animals.get_mut(&id) else {
            return;
        };
        let child = reproduction::bud(parent, child_id, self.tick, &mut self.rng);

        debug!(
            event = "birth",
            parent = %id,
            child = %child_id,
            species = %species,
            energy = child.energy,
            symbiotic_trait = child.symbiotic_trait,
            tick = self.tick,
            "Animal reproduced"
        );

        self.insert_animal(child);
        self.counters.births += 1;
    }

    /// Spider reproduction: lay one egg on the current cell if it lies in a
    /// nest zone, no egg is already there and the catchment is not full.
    fn lay_egg(&mut self, id: AgentId) {
        let Some(spider) = self.animals.get(&id) else {
            return;
        };
        let pos = spider.position;

        let Zone::Nest(zone_nest) = self.grid.zone_at(pos) else {
            return;
        };

        if !self.egg_slot_free(pos) {
            trace!(
                agent = %id,
                x = pos.x,
                y = pos.y,
                tick = self.tick,
                "Egg laying skipped: catchment full or cell occupied"
            );
            return;
        }

        let nest = spider.nest.unwrap_or(zone_nest);
        let symbiotic_trait =
            reproduction::inherit_trait(spider.symbiotic_trait, &spider.mutation, &mut self.rng);

        let egg_id = self.next_agent_id();
        let egg = Egg::new(egg_id, pos, nest, symbiotic_trait, self.tick, &self.config.eggs);
        self.insert_egg(egg);
        self.counters.eggs_laid += 1;

        if let Some(spider) = self.animals.get_mut(&id) {
            spider.record_offspring();
        }

        debug!(
            event = "egg_laid",
            spider = %id,
            egg = %egg_id,
            nest = nest.0,
            x = pos.x,
            y = pos.y,
            tick = self.tick,
            "Egg laid"
        );
    }

    /// Whether a spider standing on `pos` may lay: no egg on the cell itself
    /// and fewer than `max_per_nest` eggs within the catchment radius
    fn egg_slot_free(&self, pos: Position) -> bool {
        let eggs = &self.config.eggs;
        !self.grid.has(pos, AgentKind::Egg)
            && self.grid.count_within(pos, eggs.catchment_radius, AgentKind::Egg) < eggs.max_per_nest
    }

    fn step_eggs(&mut self, mut ids: Vec<AgentId>) {
        ids.shuffle(&mut self.rng);

        for id in ids {
            let Some(position) = self.eggs.get(&id).map(|egg| egg.position) else {
                continue;
            };
            let ant_adjacent = !self.grid.neighbors_with(position, Species::Ant).is_empty();

            let state = match self.eggs.get_mut(&id) {
                Some(egg) => egg.incubate(ant_adjacent, self.tick, &self.config.eggs),
                None => continue,
            };

            match state {
                EggState::Incubating => {}
                EggState::Depleted => {
                    self.remove_egg(id);
                    self.counters.eggs_depleted += 1;
                    debug!(
                        event = "egg_depleted",
                        egg = %id,
                        x = position.x,
                        y = position.y,
                        tick = self.tick,
                        "Egg destroyed by ants"
                    );
                }
                EggState::Hatched => {
                    if let Some(egg) = self.remove_egg(id) {
                        self.hatch(egg);
                    }
                }
            }
        }
    }

    fn hatch(&mut self, egg: Egg) {
        let spider_id = self.next_agent_id();
        let spider = Animal::new(
            spider_id,
            Species::Spider,
            egg.position,
            &self.config.spider,
            self.config.mutation,
            egg.symbiotic_trait,
            self.tick,
        )
        .with_nest(egg.nest);

        debug!(
            event = "hatch",
            egg = %egg.id,
            spider = %spider_id,
            nest = egg.nest.0,
            hit_points = egg.hit_points,
            x = egg.position.x,
            y = egg.position.y,
            tick = self.tick,
            "Egg hatched"
        );

        self.insert_animal(spider);
        self.counters.hatches += 1;
    }

    /// Drop fresh ants at uniformly random cells on every spawning tick
    fn immigrate(&mut self) {
        if self.tick % self.config.immigration.interval != 0 {
            return;
        }

        for _ in 0..self.config.immigration.ant_spawn_rate {
            let pos = self.random_position();
            let ant = self.new_animal(Species::Ant, pos);
            self.insert_animal(ant);
            self.counters.immigrants += 1;
        }
    }

    /// Add an animal of `species` at `pos` with that species' configured
    /// parameters and a freshly drawn trait. Spiders placed inside a nest
    /// zone adopt that nest.
    pub fn spawn_animal(&mut self, species: Species, pos: Position) -> Result<AgentId> {
        if !self.grid.contains(pos) {
            return Err(Error::Validation(format!(
                "position {} is outside the {}x{} grid",
                pos, self.grid.width, self.grid.height
            )));
        }

        let mut animal = self.new_animal(species, pos);
        if species == Species::Spider {
            if let Zone::Nest(nest) = self.grid.zone_at(pos) {
                animal.nest = Some(nest);
            }
        }

        let id = animal.id;
        self.insert_animal(animal);
        Ok(id)
    }

    /// Place an egg directly, as if laid this tick by a spider of `nest`
    pub fn place_egg(&mut self, pos: Position, nest: NestId, symbiotic_trait: f64) -> Result<AgentId> {
        if !self.grid.contains(pos) {
            return Err(Error::Validation(format!(
                "position {} is outside the {}x{} grid",
                pos, self.grid.width, self.grid.height
            )));
        }
        if self.nests.get(nest.0).is_none() {
            return Err(Error::NotFound(format!("nest {}", nest.0)));
        }
        if self.grid.has(pos, AgentKind::Egg) {
            return Err(Error::InvalidState(format!("cell {} already holds an egg", pos)));
        }

        let id = self.next_agent_id();
        let egg = Egg::new(id, pos, nest, symbiotic_trait, self.tick, &self.config.eggs);
        self.insert_egg(egg);
        Ok(id)
    }

    fn new_animal(&mut self, species: Species, pos: Position) -> Animal {
        let id = self.next_agent_id();
        let config = self.config.species(species);
        let symbiotic_trait = config.initial_trait.sample(&mut self.rng);
        Animal::new(
            id,
            species,
            pos,
            config,
            self.config.mutation,
            symbiotic_trait,
            self.tick,
        )
    }

    fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    fn random_position(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.grid.width);
        let y = self.rng.gen_range(0..self.grid.height);
        Position::new(x, y)
    }

    fn insert_animal(&mut self, animal: Animal) {
        self.grid
            .place(animal.position, Occupant::new(animal.id, animal.species));
        self.animals.insert(animal.id, animal);
    }

    fn remove_animal(&mut self, id: AgentId) -> Option<Animal> {
        let animal = self.animals.remove(&id)?;
        self.grid.remove(animal.position, id);
        Some(animal)
    }

    fn insert_egg(&mut self, egg: Egg) {
        self.grid
            .place(egg.position, Occupant::new(egg.id, AgentKind::Egg));
        self.eggs.insert(egg.id, egg);
    }

    fn remove_egg(&mut self, id: AgentId) -> Option<Egg> {
        let egg = self.eggs.remove(&id)?;
        self.grid.remove(egg.position, id);
        Some(egg)
    }

    fn ids_of(&self, species: Species) -> Vec<AgentId> {
        self.animals
            .values()
            .filter(|a| a.species == species)
            .map(|a| a.id)
            .collect()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn nests(&self) -> &[Nest] {
        &self.nests
    }

    pub fn counters(&self) -> &EventCounters {
        &self.counters
    }

    pub fn animal(&self, id: AgentId) -> Option<&Animal> {
        self.animals.get(&id)
    }

    pub fn egg(&self, id: AgentId) -> Option<&Egg> {
        self.eggs.get(&id)
    }

    /// Live animals of one species, in creation order
    pub fn animals(&self, species: Species) -> impl Iterator<Item = &Animal> + '_ {
        self.animals.values().filter(move |a| a.species == species)
    }

    pub fn eggs(&self) -> impl Iterator<Item = &Egg> + '_ {
        self.eggs.values()
    }

    pub fn occupants(&self, pos: Position) -> &[Occupant] {
        self.grid.occupants(pos)
    }

    pub fn zone_at(&self, x: i32, y: i32) -> Zone {
        self.grid.zone_at(Position::new(x, y))
    }

    /// `"unmarked"` or the name of the nest covering `(x, y)`
    pub fn zone_label(&self, x: i32, y: i32) -> &str {
        match self.zone_at(x, y) {
            Zone::Unmarked => "unmarked",
            Zone::Nest(id) => self
                .nests
                .get(id.0)
                .map(|nest| nest.name.as_str())
                .unwrap_or("unmarked"),
        }
    }

    pub fn population(&self, species: Species) -> usize {
        self.animals(species).count()
    }

    pub fn egg_count(&self) -> usize {
        self.eggs.len()
    }

    /// Mean symbiotic trait of a species; NaN when it has no members
    pub fn mean_trait(&self, species: Species) -> f64 {
        mean_or_nan(self.animals(species).map(|a| a.symbiotic_trait))
    }

    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            tick: self.tick,
            ants: self.population(Species::Ant),
            snakes: self.population(Species::Snake),
            frogs: self.population(Species::Frog),
            spiders: self.population(Species::Spider),
            eggs: self.egg_count(),
            frog_mean_trait: self.mean_trait(Species::Frog),
            spider_mean_trait: self.mean_trait(Species::Spider),
        }
    }

    fn emit_population_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            event = "population_metrics",
            tick = snapshot.tick,
            ants = snapshot.ants,
            snakes = snapshot.snakes,
            frogs = snapshot.frogs,
            spiders = snapshot.spiders,
            eggs = snapshot.eggs,
            frog_mean_trait = snapshot.frog_mean_trait,
            spider_mean_trait = snapshot.spider_mean_trait,
            "Population metrics snapshot"
        );
    }

    fn emit_run_summary(&self) {
        let snapshot = self.snapshot();
        let counters = &self.counters;
        info!(
            event = "run_summary",
            final_tick = self.tick,
            total_animals = snapshot.total_animals(),
            eggs = snapshot.eggs,
            births = counters.births,
            eggs_laid = counters.eggs_laid,
            hatches = counters.hatches,
            eggs_depleted = counters.eggs_depleted,
            starvations = counters.starvations,
            predations = counters.predations,
            immigrants = counters.immigrants,
            "Simulation run complete"
        );
    }
}
