//! 2D grid for the world.

use symbiosis_core::{AgentId, AgentKind, Occupant, Position, Zone};

/// A bounded, non-wrapping 2D grid of cells.
///
/// Each cell keeps the list of agents standing on it and the zone label it
/// belongs to. Cells have unbounded capacity.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Vec<Occupant>>,
    zones: Vec<Zone>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Vec::new(); size],
            zones: vec![Zone::Unmarked; size],
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Whether `pos` lies on the outermost ring of cells
    pub fn is_on_edge(&self, pos: Position) -> bool {
        pos.x == 0 || pos.x == self.width - 1 || pos.y == 0 || pos.y == self.height - 1
    }

    /// Cells within Chebyshev distance `radius` of `pos`, excluding `pos`
    /// itself and anything outside the grid.
    ///
    /// Cells are listed column by column: `x` ascending, then `y` ascending.
    pub fn neighborhood(&self, pos: Position, radius: i32) -> Vec<Position> {
        let mut neighbors = Vec::new();

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let neighbor_pos = pos.add(dx, dy);
                if self.contains(neighbor_pos) {
                    neighbors.push(neighbor_pos);
                }
            }
        }

        neighbors
    }

    /// Agents currently standing on `pos` (empty outside the grid)
    pub fn occupants(&self, pos: Position) -> &[Occupant] {
        match self.pos_to_index(pos) {
            Some(index) => &self.cells[index],
            None => &[],
        }
    }

    /// Whether any agent of `kind` stands on `pos`
    pub fn has(&self, pos: Position, kind: impl Into<AgentKind>) -> bool {
        let kind = kind.into();
        self.occupants(pos).iter().any(|occupant| occupant.is(kind))
    }

    /// Ids of the agents of `kind` standing on `pos`, in arrival order
    pub fn ids_of(&self, pos: Position, kind: impl Into<AgentKind>) -> Vec<AgentId> {
        let kind = kind.into();
        self.occupants(pos)
            .iter()
            .filter(|occupant| occupant.is(kind))
            .map(|occupant| occupant.id)
            .collect()
    }

    /// Neighbouring cells (radius 1) holding at least one agent of `kind`
    pub fn neighbors_with(&self, pos: Position, kind: impl Into<AgentKind>) -> Vec<Position> {
        let kind = kind.into();
        self.neighborhood(pos, 1)
            .into_iter()
            .filter(|&cell| self.has(cell, kind))
            .collect()
    }

    /// Number of agents of `kind` within `radius` of `pos`, `pos` included
    pub fn count_within(&self, pos: Position, radius: i32, kind: impl Into<AgentKind>) -> usize {
        let kind = kind.into();
        let count_at = |cell: Position| {
            self.occupants(cell)
                .iter()
                .filter(|occupant| occupant.is(kind))
                .count()
        };

        count_at(pos)
            + self
                .neighborhood(pos, radius)
                .into_iter()
                .map(count_at)
                .sum::<usize>()
    }

    /// Add an occupant to a cell. Returns false if `pos` is outside the grid.
    pub fn place(&mut self, pos: Position, occupant: Occupant) -> bool {
        match self.pos_to_index(pos) {
            Some(index) => {
                self.cells[index].push(occupant);
                true
            }
            None => false,
        }
    }

    /// Remove an occupant from a cell. Returns false if it was not there.
    pub fn remove(&mut self, pos: Position, id: AgentId) -> bool {
        let Some(index) = self.pos_to_index(pos) else {
            return false;
        };

        let cell = &mut self.cells[index];
        let before = cell.len();
        cell.retain(|occupant| occupant.id != id);
        cell.len() != before
    }

    pub fn zone_at(&self, pos: Position) -> Zone {
        self.pos_to_index(pos)
            .map(|index| self.zones[index])
            .unwrap_or_default()
    }

    pub fn set_zone(&mut self, pos: Position, zone: Zone) {
        if let Some(index) = self.pos_to_index(pos) {
            self.zones[index] = zone;
        }
    }

    fn pos_to_index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).map(move |i| self.index_to_pos(i))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use symbiosis_core::{NestId, Species};

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 8);
        assert_eq!(grid.cell_count(), 80);
        assert_eq!(grid.positions().count(), 80);
    }

    #[test]
    fn test_neighbors() {
        let grid = Grid::new(10, 10);
        let neighbors = grid.neighborhood(Position::new(5, 5), 1);

        // Should have 8 neighbors
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&Position::new(5, 5)));
        assert_eq!(neighbors[0], Position::new(4, 4));
        assert_eq!(neighbors[7], Position::new(6, 6));
    }

    #[test]
    fn test_neighbors_radius_two() {
        let grid = Grid::new(10, 10);
        assert_eq!(grid.neighborhood(Position::new(5, 5), 2).len(), 24);
    }

    #[test]
    fn test_corner_neighbors_are_clipped() {
        let grid = Grid::new(10, 10);
        let neighbors = grid.neighborhood(Position::new(0, 0), 1);

        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|&p| grid.contains(p)));
    }

    #[test]
    fn test_no_wraparound() {
        let grid = Grid::new(10, 10);
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(0, 10)));
        assert!(grid.occupants(Position::new(10, 10)).is_empty());
    }

    #[test]
    fn test_place_and_remove() {
        let mut grid = Grid::new(5, 5);
        let pos = Position::new(2, 3);

        assert!(grid.place(pos, Occupant::new(AgentId(1), Species::Frog)));
        assert!(grid.place(pos, Occupant::new(AgentId(2), AgentKind::Egg)));
        assert!(grid.has(pos, Species::Frog));
        assert!(grid.has(pos, AgentKind::Egg));
        assert_eq!(grid.ids_of(pos, Species::Frog), vec![AgentId(1)]);

        assert!(grid.remove(pos, AgentId(1)));
        assert!(!grid.remove(pos, AgentId(1)));
        assert!(!grid.has(pos, Species::Frog));
        assert_eq!(grid.occupants(pos).len(), 1);

        assert!(!grid.place(Position::new(5, 0), Occupant::new(AgentId(3), Species::Ant)));
    }

    #[test]
    fn test_neighbors_with_kind() {
        let mut grid = Grid::new(5, 5);
        grid.place(Position::new(1, 1), Occupant::new(AgentId(1), Species::Ant));
        grid.place(Position::new(3, 3), Occupant::new(AgentId(2), Species::Ant));
        grid.place(Position::new(4, 4), Occupant::new(AgentId(3), Species::Ant));

        let cells = grid.neighbors_with(Position::new(2, 2), Species::Ant);
        assert_eq!(cells, vec![Position::new(1, 1), Position::new(3, 3)]);
    }

    #[test]
    fn test_count_within_includes_center() {
        let mut grid = Grid::new(7, 7);
        let center = Position::new(3, 3);
        grid.place(center, Occupant::new(AgentId(1), AgentKind::Egg));
        grid.place(Position::new(5, 5), Occupant::new(AgentId(2), AgentKind::Egg));
        grid.place(Position::new(6, 6), Occupant::new(AgentId(3), AgentKind::Egg));

        assert_eq!(grid.count_within(center, 2, AgentKind::Egg), 2);
    }

    #[test]
    fn test_zones() {
        let mut grid = Grid::new(4, 4);
        assert_eq!(grid.zone_at(Position::new(1, 1)), Zone::Unmarked);

        grid.set_zone(Position::new(1, 1), Zone::Nest(NestId(0)));
        assert_eq!(grid.zone_at(Position::new(1, 1)), Zone::Nest(NestId(0)));
        assert_eq!(grid.zone_at(Position::new(-3, 9)), Zone::Unmarked);
    }

    proptest! {
        #[test]
        fn neighborhood_stays_in_bounds(
            width in 1i32..20,
            height in 1i32..20,
            x in 0i32..20,
            y in 0i32..20,
            radius in 1i32..4,
        ) {
            let grid = Grid::new(width, height);
            let pos = Position::new(x % width, y % height);
            let neighbors = grid.neighborhood(pos, radius);

            let side = (2 * radius + 1) as usize;
            prop_assert!(neighbors.len() < side * side);
            for neighbor in neighbors {
                prop_assert!(grid.contains(neighbor));
                prop_assert!(neighbor != pos);
                prop_assert!(neighbor.chebyshev_distance(&pos) <= radius);
            }
        }
    }
}
