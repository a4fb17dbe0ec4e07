//! Range chart scanner: shot feasibility over an independent 3D sweep of
//! (distance, tangential velocity, radial velocity).
//!
//! The grid is small (a few thousand cells), so every combination gets a
//! direct full evaluation, with no spatial-coherence optimization.

use serde::{Deserialize, Serialize};

use crate::config::ShotConfig;
use crate::evaluator::evaluate_shot_at_range;
use crate::heatmap::{CellState, GridStats};

/// 3D feasibility grid over the configured chart axes.
///
/// Cells are indexed `[distance][tangential][radial]`, flattened row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeChartGrid {
    pub distances: Vec<f64>,
    pub tangential_velocities: Vec<f64>,
    pub radial_velocities: Vec<f64>,
    pub cells: Vec<CellState>,
    pub stats: GridStats,
}

impl RangeChartGrid {
    fn index(&self, di: usize, ti: usize, ri: usize) -> usize {
        (di * self.tangential_velocities.len() + ti) * self.radial_velocities.len() + ri
    }

    pub fn cell(&self, di: usize, ti: usize, ri: usize) -> &CellState {
        &self.cells[self.index(di, ti, ri)]
    }
}

/// Evaluate every (distance, tangential, radial) combination of the
/// configured axes. Each combination derives a synthetic platform position on
/// the firing line with the axis velocities substituted into a fresh
/// configuration.
pub fn compute_range_chart(config: &ShotConfig) -> RangeChartGrid {
    let distances = config.range_axis.values();
    let tangential_velocities = config.tangential_axis.values();
    let radial_velocities = config.radial_axis.values();

    let mut cells = Vec::with_capacity(
        distances.len() * tangential_velocities.len() * radial_velocities.len(),
    );
    for &distance in &distances {
        for &tangential in &tangential_velocities {
            for &radial in &radial_velocities {
                cells.push(match evaluate_shot_at_range(distance, tangential, radial, config) {
                    Some(result) => CellState::Feasible(result),
                    None => CellState::Infeasible,
                });
            }
        }
    }

    let stats = GridStats::from_cells(cells.iter());
    RangeChartGrid {
        distances,
        tangential_velocities,
        radial_velocities,
        cells,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxisSpec;

    fn small_config() -> ShotConfig {
        let mut config = ShotConfig::default();
        config.range_axis = AxisSpec::new(2.0, 6.0, 1.0);
        config.tangential_axis = AxisSpec::new(-1.0, 1.0, 1.0);
        config.radial_axis = AxisSpec::new(-1.0, 1.0, 1.0);
        config
    }

    #[test]
    fn test_dimensions_match_axes() {
        let config = small_config();
        let chart = compute_range_chart(&config);
        assert_eq!(chart.distances.len(), 5);
        assert_eq!(chart.tangential_velocities.len(), 3);
        assert_eq!(chart.radial_velocities.len(), 3);
        assert_eq!(chart.cells.len(), 45);
    }

    #[test]
    fn test_cells_match_direct_evaluation() {
        let config = small_config();
        let chart = compute_range_chart(&config);
        for (di, &d) in chart.distances.iter().enumerate() {
            for (ti, &t) in chart.tangential_velocities.iter().enumerate() {
                for (ri, &r) in chart.radial_velocities.iter().enumerate() {
                    let direct = evaluate_shot_at_range(d, t, r, &config);
                    match (chart.cell(di, ti, ri), direct) {
                        (CellState::Feasible(cell), Some(expected)) => {
                            assert_eq!(*cell, expected)
                        }
                        (CellState::Infeasible, None) => {}
                        (cell, direct) => {
                            panic!("cell {di},{ti},{ri} holds {cell:?}, direct gave {direct:?}")
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_original_configuration_untouched() {
        let config = small_config();
        let before = config.clone();
        let _ = compute_range_chart(&config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_stats_count_feasible_cells() {
        let chart = compute_range_chart(&small_config());
        let counted = chart.cells.iter().filter(|c| c.is_feasible()).count();
        assert_eq!(chart.stats.feasible_count, counted);
    }
}
