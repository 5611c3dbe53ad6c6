//! Spider nests and the zone map they define.

use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use symbiosis_core::{NestConfig, NestId, Position, Zone};

/// A square nest zone owned by a spider sub-population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nest {
    pub id: NestId,
    pub name: String,
    /// Top-left corner of the nest square
    pub anchor: Position,
    pub size: i32,
}

impl Nest {
    /// Homing target for the nest's spiders
    pub fn center(&self) -> Position {
        self.anchor.add(self.size / 2, self.size / 2)
    }

    pub fn covers(&self, pos: Position) -> bool {
        pos.x >= self.anchor.x
            && pos.x < self.anchor.x + self.size
            && pos.y >= self.anchor.y
            && pos.y < self.anchor.y + self.size
    }

    /// Every cell of the nest square, whether or not it is on the grid
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |dx| (0..self.size).map(move |dy| self.anchor.add(dx, dy)))
    }
}

/// Lay out nests on a regular lattice.
///
/// Lattice points start one nest-width in from the walls and stop before the
/// opposite margin, spaced by `floor(dimension * (1 - density))`. Each point
/// becomes the centre of a nest. Nests are named `nest1`, `nest2`, ... in
/// column-major order. A layout with no nests is valid.
pub fn layout(config: &NestConfig, width: i32, height: i32) -> Vec<Nest> {
    let margin = config.size;
    let spacing_x = config.spacing(width);
    let spacing_y = config.spacing(height);
    if spacing_x <= 0 || spacing_y <= 0 {
        return Vec::new();
    }

    let mut nests = Vec::new();
    for x in (margin..width - margin).step_by(spacing_x as usize) {
        for y in (margin..height - margin).step_by(spacing_y as usize) {
            let id = NestId(nests.len());
            nests.push(Nest {
                id,
                name: format!("nest{}", id.0 + 1),
                anchor: Position::new(x - config.size / 2, y - config.size / 2),
                size: config.size,
            });
        }
    }

    nests
}

/// Label every on-grid cell covered by a nest. Later nests overwrite
/// earlier ones where squares overlap.
pub fn paint_zones(grid: &mut Grid, nests: &[Nest]) {
    for nest in nests {
        for cell in nest.cells() {
            if grid.contains(cell) {
                grid.set_zone(cell, Zone::Nest(nest.id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(density: f64) -> NestConfig {
        NestConfig { density, size: 3 }
    }

    #[test]
    fn test_single_nest_layout() {
        let nests = layout(&config(0.5), 10, 10);

        assert_eq!(nests.len(), 1);
        assert_eq!(nests[0].name, "nest1");
        assert_eq!(nests[0].anchor, Position::new(2, 2));
        assert_eq!(nests[0].center(), Position::new(3, 3));
    }

    #[test]
    fn test_reference_layout() {
        // 32x32 at density 0.75: spacing 8, lattice 3, 11, 19, 27 per axis
        let nests = layout(&config(0.75), 32, 32);
        assert_eq!(nests.len(), 16);
        assert_eq!(nests[0].center(), Position::new(3, 3));
        assert_eq!(nests[1].center(), Position::new(3, 11));
        assert_eq!(nests[15].center(), Position::new(27, 27));
        assert_eq!(nests[15].name, "nest16");
    }

    #[test]
    fn test_lower_density_means_fewer_nests() {
        let sparse = layout(&config(0.3), 32, 32);
        let dense = layout(&config(0.75), 32, 32);
        assert!(sparse.len() < dense.len());
    }

    #[test]
    fn test_zero_nests_is_valid() {
        let nests = layout(&NestConfig { density: 0.5, size: 5 }, 10, 10);
        assert!(nests.is_empty());
    }

    #[test]
    fn test_nests_stay_off_the_walls() {
        let nests = layout(&config(0.75), 32, 32);
        for nest in &nests {
            for cell in nest.cells() {
                assert!(cell.x > 0 && cell.x < 31);
                assert!(cell.y > 0 && cell.y < 31);
            }
        }
    }

    #[test]
    fn test_paint_zones() {
        let nests = layout(&config(0.5), 10, 10);
        let mut grid = Grid::new(10, 10);
        paint_zones(&mut grid, &nests);

        let marked: Vec<Position> = grid
            .positions()
            .filter(|&p| grid.zone_at(p).is_nest())
            .collect();
        assert_eq!(marked.len(), 9);
        assert!(marked.iter().all(|&p| nests[0].covers(p)));
        assert_eq!(grid.zone_at(Position::new(0, 0)), Zone::Unmarked);
        assert_eq!(grid.zone_at(Position::new(4, 4)), Zone::Nest(NestId(0)));
    }
}
