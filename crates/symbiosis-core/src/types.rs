//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an agent (animal or egg)
///
/// Ids are handed out in increasing order by the simulation, so ordered
/// collections keyed by `AgentId` iterate in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a nest in the simulation's nest list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NestId(pub usize);

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev (king-move) distance to another position
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Straight-line distance to another position
    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }

    /// Per-axis sign of the delta from `self` to `target`, each in {-1, 0, 1}
    pub fn direction_to(&self, target: &Position) -> (i32, i32) {
        ((target.x - self.x).signum(), (target.y - self.y).signum())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Mobile animal species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Ant,
    Snake,
    Frog,
    Spider,
}

impl Species {
    /// Order in which species groups are stepped within a tick
    pub const SCHEDULE: [Species; 4] = [Species::Ant, Species::Snake, Species::Frog, Species::Spider];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Ant => "ant",
            Species::Snake => "snake",
            Species::Frog => "frog",
            Species::Spider => "spider",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can occupy a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Animal(Species),
    Egg,
}

impl From<Species> for AgentKind {
    fn from(species: Species) -> Self {
        AgentKind::Animal(species)
    }
}

/// An entry in a cell's occupant list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    pub id: AgentId,
    pub kind: AgentKind,
}

impl Occupant {
    pub fn new(id: AgentId, kind: impl Into<AgentKind>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }

    pub fn is(&self, kind: impl Into<AgentKind>) -> bool {
        self.kind == kind.into()
    }
}

/// Zone label attached to a grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Zone {
    #[default]
    Unmarked,
    Nest(NestId),
}

impl Zone {
    pub fn is_nest(&self) -> bool {
        matches!(self, Zone::Nest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chebyshev_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, -4);
        assert_eq!(pos1.chebyshev_distance(&pos2), 4);
        assert_eq!(pos2.chebyshev_distance(&pos1), 4);
    }

    #[test]
    fn test_euclidean_distance() {
        let pos1 = Position::new(1, 1);
        let pos2 = Position::new(4, 5);
        assert!((pos1.euclidean_distance(&pos2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_to() {
        let origin = Position::new(5, 5);
        assert_eq!(origin.direction_to(&Position::new(9, 1)), (1, -1));
        assert_eq!(origin.direction_to(&Position::new(5, 7)), (0, 1));
        assert_eq!(origin.direction_to(&origin), (0, 0));
    }

    #[test]
    fn test_occupant_kind_matching() {
        let frog = Occupant::new(AgentId(3), Species::Frog);
        assert!(frog.is(Species::Frog));
        assert!(!frog.is(Species::Ant));
        assert!(!frog.is(AgentKind::Egg));

        let egg = Occupant::new(AgentId(4), AgentKind::Egg);
        assert!(egg.is(AgentKind::Egg));
    }

    #[test]
    fn test_schedule_order() {
        assert_eq!(
            Species::SCHEDULE,
            [Species::Ant, Species::Snake, Species::Frog, Species::Spider]
        );
    }
}
