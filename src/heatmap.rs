//! Field scanner: shot feasibility over a dense 2D grid of platform
//! positions, evaluated with a seed-and-propagate strategy.
//!
//! Evaluating the full sweep-plus-refinement pipeline independently at every
//! cell is expensive, and the feasibility surface varies smoothly with
//! position, so a neighboring cell's solution is a good starting point. The
//! scan therefore runs in four phases:
//!
//! 1. seed: full evaluation on a sparse sub-grid, feasible seeds enqueued;
//! 2. propagate: breadth-first traversal, each uncomputed 4-connected
//!    neighbor attempted with a refinement-only evaluation hinted from its
//!    parent; failures stay uncomputed;
//! 3. stragglers: every cell still uncomputed gets a full evaluation;
//! 4. neighbor recovery: each infeasible cell with a feasible 4-connected
//!    neighbor gets exactly one hinted retry, recovering cells where
//!    propagation converged to the wrong branch.
//!
//! The result classifies feasibility identically to an exhaustive per-cell
//! evaluation in the overwhelming majority of cells; the residual mismatch is
//! a known, bounded cost of the optimization.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::ShotConfig;
use crate::constants::SEED_SPACING_MAX_M;
use crate::evaluator::{evaluate_shot, evaluate_shot_with_hint};
use crate::validate::ShotResult;

/// Feasibility state of one grid cell.
///
/// `Uncomputed` and `Infeasible` are distinct states: a cell that has not
/// been evaluated is never conflated with one that was evaluated and
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Uncomputed,
    Infeasible,
    Feasible(ShotResult),
}

impl CellState {
    pub fn is_feasible(&self) -> bool {
        matches!(self, CellState::Feasible(_))
    }

    pub fn result(&self) -> Option<&ShotResult> {
        match self {
            CellState::Feasible(r) => Some(r),
            _ => None,
        }
    }
}

/// Closed min/max interval observed over feasible cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Aggregate statistics over the feasible cells of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridStats {
    pub feasible_count: usize,
    pub speed: Option<ValueRange>,
    pub angle: Option<ValueRange>,
}

impl GridStats {
    pub(crate) fn from_cells<'a>(cells: impl Iterator<Item = &'a CellState>) -> Self {
        let mut stats = GridStats::default();
        for result in cells.filter_map(|c| c.result()) {
            stats.feasible_count += 1;
            stats.speed = Some(match stats.speed {
                None => ValueRange { min: result.speed, max: result.speed },
                Some(r) => ValueRange {
                    min: r.min.min(result.speed),
                    max: r.max.max(result.speed),
                },
            });
            stats.angle = Some(match stats.angle {
                None => ValueRange { min: result.angle, max: result.angle },
                Some(r) => ValueRange {
                    min: r.min.min(result.angle),
                    max: r.max.max(result.angle),
                },
            });
        }
        stats
    }
}

/// Rectangular grid of per-position feasibility results.
///
/// Cells are row-major; cell (col, row) sits at
/// `(origin_x + col * resolution, origin_y + row * resolution)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub resolution: f64,
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<CellState>,
    pub stats: GridStats,
}

impl HeatmapGrid {
    fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    pub fn cell(&self, col: usize, row: usize) -> &CellState {
        &self.cells[self.index(col, row)]
    }

    /// Field position of a cell.
    pub fn position(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.resolution,
            self.origin_y + row as f64 * self.resolution,
        )
    }
}

/// 4-connected neighborhood, fixed scan order: up, down, left, right.
///
/// Recovery takes the first feasible neighbor in this order; which neighbor
/// that is depends on scan order, an acknowledged property of the algorithm.
const NEIGHBORS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

fn neighbor(col: usize, row: usize, delta: (isize, isize), cols: usize, rows: usize) -> Option<(usize, usize)> {
    let nc = col as isize + delta.0;
    let nr = row as isize + delta.1;
    if nc < 0 || nr < 0 || nc as usize >= cols || nr as usize >= rows {
        None
    } else {
        Some((nc as usize, nr as usize))
    }
}

/// Evaluate shot feasibility over the configured field extents, one cell per
/// `resolution` meters, using the seed-and-propagate scan. The grid is a
/// fresh, independent value; nothing is reused across configurations.
pub fn compute_heatmap(config: &ShotConfig) -> HeatmapGrid {
    let resolution = config.resolution;
    let cols = ((config.field_x_max - config.field_x_min) / resolution).floor() as usize + 1;
    let rows = ((config.field_y_max - config.field_y_min) / resolution).floor() as usize + 1;

    let mut grid = HeatmapGrid {
        origin_x: config.field_x_min,
        origin_y: config.field_y_min,
        resolution,
        cols,
        rows,
        cells: vec![CellState::Uncomputed; cols * rows],
        stats: GridStats::default(),
    };

    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    // Phase 1: full evaluation on a sparse sub-grid. Seeds are never farther
    // apart than SEED_SPACING_MAX_M.
    let stride = ((SEED_SPACING_MAX_M / resolution).floor() as usize).max(1);
    for row in (0..rows).step_by(stride) {
        for col in (0..cols).step_by(stride) {
            let (x, y) = grid.position(col, row);
            let idx = grid.index(col, row);
            match evaluate_shot(x, y, config) {
                Some(result) => {
                    grid.cells[idx] = CellState::Feasible(result);
                    queue.push_back((col, row));
                }
                None => grid.cells[idx] = CellState::Infeasible,
            }
        }
    }

    // Phase 2: breadth-first propagation. Each uncomputed neighbor is tried
    // with a refinement-only evaluation seeded from its parent's solution; a
    // failed attempt leaves the cell uncomputed for the straggler phase.
    while let Some((col, row)) = queue.pop_front() {
        let parent = match grid.cell(col, row) {
            CellState::Feasible(r) => *r,
            _ => continue,
        };
        for delta in NEIGHBORS {
            let Some((nc, nr)) = neighbor(col, row, delta, cols, rows) else {
                continue;
            };
            let idx = grid.index(nc, nr);
            if grid.cells[idx] != CellState::Uncomputed {
                continue;
            }
            let (x, y) = grid.position(nc, nr);
            if let Some(result) = evaluate_shot_with_hint(x, y, config, parent.speed, parent.angle)
            {
                grid.cells[idx] = CellState::Feasible(result);
                queue.push_back((nc, nr));
            }
        }
    }

    // Phase 3: stragglers the traversal never resolved get the full
    // brute-force evaluation.
    for row in 0..rows {
        for col in 0..cols {
            let idx = grid.index(col, row);
            if grid.cells[idx] != CellState::Uncomputed {
                continue;
            }
            let (x, y) = grid.position(col, row);
            grid.cells[idx] = match evaluate_shot(x, y, config) {
                Some(result) => CellState::Feasible(result),
                None => CellState::Infeasible,
            };
        }
    }

    // Phase 4: neighbor recovery. An infeasible cell beside a feasible one
    // gets exactly one hinted retry, against a snapshot of the grid as of the
    // end of phase 3 so recoveries do not cascade.
    let snapshot = grid.cells.clone();
    for row in 0..rows {
        for col in 0..cols {
            let idx = grid.index(col, row);
            if snapshot[idx] != CellState::Infeasible {
                continue;
            }
            let hint = NEIGHBORS.iter().find_map(|&delta| {
                let (nc, nr) = neighbor(col, row, delta, cols, rows)?;
                snapshot[nr * cols + nc].result().copied()
            });
            if let Some(parent) = hint {
                let (x, y) = grid.position(col, row);
                if let Some(result) =
                    evaluate_shot_with_hint(x, y, config, parent.speed, parent.angle)
                {
                    grid.cells[idx] = CellState::Feasible(result);
                }
            }
        }
    }

    grid.stats = GridStats::from_cells(grid.cells.iter());
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ShotConfig {
        let mut config = ShotConfig::default();
        config.speed_mode = crate::config::SpeedMode::Range { min: 7.0, max: 10.0 };
        // Straddles the feasibility ring: cells hard against the target are
        // too close to gain the required height, cells a few meters out work
        config.field_x_min = 3.75;
        config.field_x_max = 7.5;
        config.field_y_min = -2.0;
        config.field_y_max = 2.0;
        // Fine enough that the seed stride exceeds one cell and the
        // propagation phase does real work
        config.resolution = 0.25;
        config
    }

    #[test]
    fn test_grid_dimensions_match_extents() {
        let config = small_config();
        let grid = compute_heatmap(&config);
        assert_eq!(grid.cols, 16);
        assert_eq!(grid.rows, 17);
        assert_eq!(grid.cells.len(), 272);
        let (x0, y0) = grid.position(0, 0);
        assert_eq!((x0, y0), (3.75, -2.0));
    }

    #[test]
    fn test_no_cell_left_uncomputed() {
        let grid = compute_heatmap(&small_config());
        assert!(grid.cells.iter().all(|c| *c != CellState::Uncomputed));
    }

    #[test]
    fn test_feasible_count_matches_cells() {
        let grid = compute_heatmap(&small_config());
        let counted = grid.cells.iter().filter(|c| c.is_feasible()).count();
        assert_eq!(grid.stats.feasible_count, counted);
        assert!(counted > 0, "the default scenario has a feasible region");
    }

    #[test]
    fn test_stats_bound_every_feasible_cell() {
        let grid = compute_heatmap(&small_config());
        let speed = grid.stats.speed.unwrap();
        let angle = grid.stats.angle.unwrap();
        for result in grid.cells.iter().filter_map(|c| c.result()) {
            assert!(result.speed >= speed.min && result.speed <= speed.max);
            assert!(result.angle >= angle.min && result.angle <= angle.max);
        }
    }

    #[test]
    fn test_unreachable_ceiling_empties_grid() {
        let mut config = small_config();
        config.ceiling_height = 0.2;
        let grid = compute_heatmap(&config);
        assert_eq!(grid.stats.feasible_count, 0);
        assert!(grid.cells.iter().all(|c| *c == CellState::Infeasible));
    }

    #[test]
    fn test_scan_agrees_with_exhaustive_evaluation() {
        let config = small_config();
        let grid = compute_heatmap(&config);
        let mut mismatches = 0usize;
        let total = grid.cols * grid.rows;
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let (x, y) = grid.position(col, row);
                let exhaustive = evaluate_shot(x, y, &config).is_some();
                if exhaustive != grid.cell(col, row).is_feasible() {
                    mismatches += 1;
                }
            }
        }
        // The optimization's fidelity cost is bounded: at least 99% agreement
        assert!(
            mismatches * 100 <= total,
            "{mismatches} of {total} cells disagree with brute force"
        );
    }
}
