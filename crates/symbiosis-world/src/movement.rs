//! Per-species movement policies.
//!
//! Every policy picks one destination from the radius-1 neighbourhood (or a
//! subset of it) of the animal's current cell. Moving always succeeds; an
//! animal with no neighbouring cells at all stays where it is.

use crate::animal::Animal;
use crate::grid::Grid;
use crate::nest::Nest;
use rand::seq::SliceRandom;
use rand::Rng;
use symbiosis_core::{AgentKind, Position, Species, SpiderBehavior};

/// Read-only view of the world used to choose a destination
pub struct MoveContext<'a> {
    pub grid: &'a Grid,
    pub nests: &'a [Nest],
    pub spider: &'a SpiderBehavior,
}

/// Choose where `animal` moves this tick
pub fn choose_destination<R: Rng + ?Sized>(animal: &Animal, ctx: &MoveContext<'_>, rng: &mut R) -> Position {
    let candidates = match animal.species {
        Species::Ant => prefer_cells_with(ctx.grid, animal.position, AgentKind::Egg),
        Species::Snake => prefer_cells_with(ctx.grid, animal.position, Species::Frog),
        Species::Frog => return frog_destination(animal, ctx.grid, rng),
        Species::Spider => spider_candidates(animal, ctx, rng),
    };

    pick(&candidates, animal.position, rng)
}

/// Uniform choice among `cells`, staying at `current` if there are none
fn pick<R: Rng + ?Sized>(cells: &[Position], current: Position, rng: &mut R) -> Position {
    cells.choose(rng).copied().unwrap_or(current)
}

/// Neighbouring cells holding `kind`, or the whole neighbourhood if none do
fn prefer_cells_with(grid: &Grid, pos: Position, kind: impl Into<AgentKind>) -> Vec<Position> {
    let preferred = grid.neighbors_with(pos, kind);
    if preferred.is_empty() {
        grid.neighborhood(pos, 1)
    } else {
        preferred
    }
}

fn frog_destination<R: Rng + ?Sized>(frog: &Animal, grid: &Grid, rng: &mut R) -> Position {
    let pos = frog.position;

    let ant_cells = grid.neighbors_with(pos, Species::Ant);
    if !ant_cells.is_empty() {
        return pick(&ant_cells, pos, rng);
    }

    let neighbors = grid.neighborhood(pos, 1);
    if let Some(step) = frog_spider_step(frog.symbiotic_trait, pos, grid, &neighbors, rng) {
        return step;
    }

    pick(&neighbors, pos, rng)
}

/// One unit step towards (positive trait) or away from (negative trait) the
/// first spider sighted within radius 2, taken with probability `|trait|`.
///
/// Returns `None` when the roll fails, no spider is in sight, or the step
/// would leave the grid.
fn frog_spider_step<R: Rng + ?Sized>(
    symbiotic_trait: f64,
    pos: Position,
    grid: &Grid,
    neighbors: &[Position],
    rng: &mut R,
) -> Option<Position> {
    let toward = if symbiotic_trait > 0.0 {
        true
    } else if symbiotic_trait < 0.0 {
        false
    } else {
        return None;
    };
    if rng.gen::<f64>() >= symbiotic_trait.abs() {
        return None;
    }

    let spider_cell = grid
        .neighborhood(pos, 2)
        .into_iter()
        .find(|&cell| grid.has(cell, Species::Spider))?;

    let (dx, dy) = pos.direction_to(&spider_cell);
    let step = if toward {
        pos.add(dx, dy)
    } else {
        pos.add(-dx, -dy)
    };

    neighbors.contains(&step).then_some(step)
}

/// Candidate cells for a spider, first matching rule wins:
/// adjacent snake, adjacent ant (fixed odds), adjacent frog (trait odds),
/// homing towards the nest (odds grow with distance), anywhere adjacent.
fn spider_candidates<R: Rng + ?Sized>(spider: &Animal, ctx: &MoveContext<'_>, rng: &mut R) -> Vec<Position> {
    let grid = ctx.grid;
    let pos = spider.position;

    let snake_cells = grid.neighbors_with(pos, Species::Snake);
    if !snake_cells.is_empty() {
        return snake_cells;
    }

    let ant_cells = grid.neighbors_with(pos, Species::Ant);
    if rng.gen::<f64>() < ctx.spider.ant_pursuit_chance && !ant_cells.is_empty() {
        return ant_cells;
    }

    let frog_cells = grid.neighbors_with(pos, Species::Frog);
    if rng.gen::<f64>() < spider.symbiotic_trait && !frog_cells.is_empty() {
        return frog_cells;
    }

    let nest_center = spider
        .nest
        .and_then(|id| ctx.nests.get(id.0))
        .map(Nest::center);
    if let Some(center) = nest_center {
        let pull = pos.euclidean_distance(&center) / ctx.spider.explore_factor;
        if pull > rng.gen::<f64>() {
            return homing_cells(grid, pos, center);
        }
    }

    grid.neighborhood(pos, 1)
}

/// The three neighbouring cells facing `center`, or the full neighbourhood
/// when already there or standing on the grid edge.
pub fn homing_cells(grid: &Grid, pos: Position, center: Position) -> Vec<Position> {
    if grid.is_on_edge(pos) {
        return grid.neighborhood(pos, 1);
    }

    match homing_offsets(pos.direction_to(&center)) {
        Some(offsets) => offsets.iter().map(|&(dx, dy)| pos.add(dx, dy)).collect(),
        None => grid.neighborhood(pos, 1),
    }
}

/// Offsets of the three cells facing direction `(sx, sy)`, keyed by the sign
/// of the delta on each axis. `None` for the zero delta.
pub fn homing_offsets(direction: (i32, i32)) -> Option<[(i32, i32); 3]> {
    let offsets = match direction {
        (-1, -1) => [(-1, -1), (-1, 0), (0, -1)],
        (-1, 1) => [(-1, 0), (-1, 1), (0, 1)],
        (1, 1) => [(0, 1), (1, 1), (1, 0)],
        (1, -1) => [(1, 0), (1, -1), (0, -1)],
        (0, 1) => [(-1, 1), (0, 1), (1, 1)],
        (0, -1) => [(-1, -1), (1, -1), (0, -1)],
        (-1, 0) => [(-1, -1), (-1, 0), (-1, 1)],
        (1, 0) => [(1, 1), (1, 0), (1, -1)],
        _ => return None,
    };
    Some(offsets)
}
