//! Population statistics handed to data collectors.

use crate::Species;
use serde::{Deserialize, Serialize};

/// Arithmetic mean of `values`, or NaN when there are none.
///
/// NaN is the documented sentinel for "species currently extinct"; callers
/// that persist or plot means must handle it.
pub fn mean_or_nan(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Per-tick population counts and mean traits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub tick: u64,
    pub ants: usize,
    pub snakes: usize,
    pub frogs: usize,
    pub spiders: usize,
    pub eggs: usize,
    /// NaN (serialized as `null`) when there are no frogs
    pub frog_mean_trait: f64,
    /// NaN (serialized as `null`) when there are no spiders
    pub spider_mean_trait: f64,
}

impl PopulationSnapshot {
    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Ant => self.ants,
            Species::Snake => self.snakes,
            Species::Frog => self.frogs,
            Species::Spider => self.spiders,
        }
    }

    pub fn total_animals(&self) -> usize {
        Species::SCHEDULE.iter().map(|&species| self.count(species)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_values() {
        assert_eq!(mean_or_nan([1.0, 2.0, 3.0]), 2.0);
        assert_eq!(mean_or_nan([-0.5]), -0.5);
    }

    #[test]
    fn test_mean_of_nothing_is_nan() {
        assert!(mean_or_nan(std::iter::empty()).is_nan());
    }

    #[test]
    fn test_snapshot_counts() {
        let snapshot = PopulationSnapshot {
            tick: 4,
            ants: 3,
            snakes: 1,
            frogs: 2,
            spiders: 0,
            eggs: 5,
            frog_mean_trait: 0.1,
            spider_mean_trait: f64::NAN,
        };

        assert_eq!(snapshot.count(Species::Ant), 3);
        assert_eq!(snapshot.count(Species::Spider), 0);
        assert_eq!(snapshot.total_animals(), 6);
    }

    #[test]
    fn test_snapshot_serializes_nan_as_null() {
        let snapshot = PopulationSnapshot {
            tick: 0,
            ants: 0,
            snakes: 0,
            frogs: 0,
            spiders: 0,
            eggs: 0,
            frog_mean_trait: f64::NAN,
            spider_mean_trait: f64::NAN,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["frog_mean_trait"].is_null());
        assert!(json["spider_mean_trait"].is_null());
    }
}
