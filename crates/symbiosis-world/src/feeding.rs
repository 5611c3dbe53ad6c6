//! Per-species predation on co-located agents.

use crate::animal::Animal;
use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;
use symbiosis_core::{AgentId, Species, SpiderBehavior};

/// A prey item picked for consumption
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meal {
    pub prey: AgentId,
    pub prey_species: Species,
    /// Energy credited to the predator
    pub energy_gain: f64,
}

/// Pick at most one co-located prey for `animal` to eat this tick.
///
/// Frogs eat ants, snakes eat frogs. Spiders eat a snake if one is present
/// and otherwise kill an ant with fixed odds, gaining nothing from it.
/// Ants never feed.
pub fn choose_meal<R: Rng + ?Sized>(
    animal: &Animal,
    grid: &Grid,
    behavior: &SpiderBehavior,
    rng: &mut R,
) -> Option<Meal> {
    let pos = animal.position;

    match animal.species {
        Species::Ant => None,
        Species::Frog => catch(grid, animal, Species::Ant, animal.energy_from_food, rng),
        Species::Snake => catch(grid, animal, Species::Frog, animal.energy_from_food, rng),
        Species::Spider => {
            if grid.has(pos, Species::Snake) {
                return catch(grid, animal, Species::Snake, animal.energy_from_food, rng);
            }
            if grid.has(pos, Species::Ant) && rng.gen::<f64>() < behavior.ant_hit_chance {
                return catch(grid, animal, Species::Ant, 0.0, rng);
            }
            None
        }
    }
}

fn catch<R: Rng + ?Sized>(
    grid: &Grid,
    predator: &Animal,
    prey_species: Species,
    energy_gain: f64,
    rng: &mut R,
) -> Option<Meal> {
    let candidates = grid.ids_of(predator.position, prey_species);
    candidates.choose(rng).map(|&prey| Meal {
        prey,
        prey_species,
        energy_gain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use symbiosis_core::{AgentKind, MutationConfig, Occupant, Position, SpeciesConfig};

    const HERE: Position = Position { x: 4, y: 4 };

    fn predator(species: Species) -> Animal {
        Animal::new(
            AgentId(100),
            species,
            HERE,
            &SpeciesConfig::for_species(species),
            MutationConfig::default(),
            0.0,
            0,
        )
    }

    fn grid_with(occupants: &[(u64, AgentKind)]) -> Grid {
        let mut grid = Grid::new(8, 8);
        for &(id, kind) in occupants {
            grid.place(HERE, Occupant::new(AgentId(id), kind));
        }
        grid
    }

    fn meal(animal: &Animal, grid: &Grid, behavior: &SpiderBehavior, seed: u64) -> Option<Meal> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        choose_meal(animal, grid, behavior, &mut rng)
    }

    #[test]
    fn test_frog_eats_ant() {
        let grid = grid_with(&[(1, Species::Ant.into()), (2, Species::Spider.into())]);
        let frog = predator(Species::Frog);

        let meal = meal(&frog, &grid, &SpiderBehavior::default(), 0).unwrap();
        assert_eq!(meal.prey, AgentId(1));
        assert_eq!(meal.prey_species, Species::Ant);
        assert_eq!(meal.energy_gain, 50.0);
    }

    #[test]
    fn test_snake_eats_one_of_several_frogs() {
        let grid = grid_with(&[(1, Species::Frog.into()), (2, Species::Frog.into())]);
        let snake = predator(Species::Snake);

        for seed in 0..10 {
            let meal = meal(&snake, &grid, &SpiderBehavior::default(), seed).unwrap();
            assert!(meal.prey == AgentId(1) || meal.prey == AgentId(2));
        }
    }

    #[test]
    fn test_nothing_to_eat() {
        let grid = grid_with(&[(1, AgentKind::Egg)]);
        for species in Species::SCHEDULE {
            assert_eq!(meal(&predator(species), &grid, &SpiderBehavior::default(), 0), None);
        }
    }

    #[test]
    fn test_ants_never_feed() {
        let grid = grid_with(&[(1, Species::Frog.into()), (2, Species::Snake.into())]);
        assert_eq!(meal(&predator(Species::Ant), &grid, &SpiderBehavior::default(), 0), None);
    }

    #[test]
    fn test_spider_prefers_snake() {
        let grid = grid_with(&[(1, Species::Ant.into()), (2, Species::Snake.into())]);
        let behavior = SpiderBehavior {
            ant_hit_chance: 1.0,
            ..Default::default()
        };

        let meal = meal(&predator(Species::Spider), &grid, &behavior, 0).unwrap();
        assert_eq!(meal.prey, AgentId(2));
        assert_eq!(meal.energy_gain, 50.0);
    }

    #[test]
    fn test_spider_kills_ant_without_gain() {
        let grid = grid_with(&[(1, Species::Ant.into())]);
        let sure_hit = SpiderBehavior {
            ant_hit_chance: 1.0,
            ..Default::default()
        };
        let never_hit = SpiderBehavior {
            ant_hit_chance: 0.0,
            ..Default::default()
        };
        let spider = predator(Species::Spider);

        let meal_hit = meal(&spider, &grid, &sure_hit, 0).unwrap();
        assert_eq!(meal_hit.prey_species, Species::Ant);
        assert_eq!(meal_hit.energy_gain, 0.0);

        assert_eq!(meal(&spider, &grid, &never_hit, 0), None);
    }

    #[test]
    fn test_spider_ignores_frogs() {
        let grid = grid_with(&[(1, Species::Frog.into())]);
        let mut spider = predator(Species::Spider);
        spider.symbiotic_trait = 1.0;
        assert_eq!(meal(&spider, &grid, &SpiderBehavior::default(), 0), None);
    }
}
