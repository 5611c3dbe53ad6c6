//! Asexual reproduction with trait drift.

use crate::animal::Animal;
use rand::Rng;
use symbiosis_core::{AgentId, MutationConfig};

/// Trait value inherited by an offspring.
///
/// With probability `mutation.chance` the value drifts by a uniform offset in
/// `[-effectiveness, +effectiveness]`; otherwise it is copied unchanged. No
/// clamping is applied.
pub fn inherit_trait<R: Rng + ?Sized>(value: f64, mutation: &MutationConfig, rng: &mut R) -> f64 {
    if rng.gen::<f64>() < mutation.chance {
        let bound = mutation.effectiveness;
        value + rng.gen_range(-bound..=bound)
    } else {
        value
    }
}

/// Split the parent's energy in half and produce one offspring of the same
/// species on the parent's cell carrying the halved energy and an inherited
/// trait. All other parameters are copied from the parent.
pub fn bud<R: Rng + ?Sized>(parent: &mut Animal, child_id: AgentId, tick: u64, rng: &mut R) -> Animal {
    parent.energy /= 2.0;
    parent.record_offspring();

    Animal {
        id: child_id,
        symbiotic_trait: inherit_trait(parent.symbiotic_trait, &parent.mutation, rng),
        birth_tick: tick,
        age: 0,
        offspring_count: 0,
        kills: 0,
        ..parent.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use symbiosis_core::{Position, Species, SpeciesConfig};

    fn parent(mutation: MutationConfig) -> Animal {
        Animal::new(
            AgentId(1),
            Species::Snake,
            Position::new(2, 2),
            &SpeciesConfig::for_species(Species::Snake),
            mutation,
            0.3,
            0,
        )
    }

    #[test]
    fn test_energy_conserved() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut snake = parent(MutationConfig::default());
        snake.energy = 37.0;

        let child = bud(&mut snake, AgentId(2), 9, &mut rng);

        assert_eq!(snake.energy, 18.5);
        assert_eq!(child.energy, 18.5);
        assert_eq!(snake.energy + child.energy, 37.0);
        assert_eq!(child.position, snake.position);
        assert_eq!(child.species, Species::Snake);
        assert_eq!(child.birth_tick, 9);
        assert_eq!(child.id, AgentId(2));
        assert_eq!(snake.offspring_count, 1);
        assert_eq!(child.offspring_count, 0);
    }

    #[test]
    fn test_parameters_copied() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut snake = parent(MutationConfig::default());
        snake.p_reproduce = 0.7;
        snake.energy_from_food = 12.0;

        let child = bud(&mut snake, AgentId(2), 1, &mut rng);
        assert_eq!(child.p_reproduce, 0.7);
        assert_eq!(child.energy_from_food, 12.0);
        assert_eq!(child.mutation.chance, snake.mutation.chance);
    }

    #[test]
    fn test_never_mutates_at_zero_chance() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mutation = MutationConfig {
            chance: 0.0,
            effectiveness: 5.0,
        };
        for _ in 0..100 {
            assert_eq!(inherit_trait(0.3, &mutation, &mut rng), 0.3);
        }
    }

    #[test]
    fn test_always_mutates_at_full_chance() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mutation = MutationConfig {
            chance: 1.0,
            effectiveness: 0.1,
        };
        let drifted = (0..100)
            .map(|_| inherit_trait(0.3, &mutation, &mut rng))
            .filter(|&value| value != 0.3)
            .count();
        assert!(drifted > 90);
    }

    proptest! {
        #[test]
        fn trait_drift_is_bounded(
            seed in any::<u64>(),
            value in -2.0f64..2.0,
            chance in 0.0f64..=1.0,
            effectiveness in 0.0f64..1.0,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mutation = MutationConfig { chance, effectiveness };
            let child = inherit_trait(value, &mutation, &mut rng);
            prop_assert!((child - value).abs() <= effectiveness + 1e-12);
        }
    }
}
