//! # shotmap
//!
//! Shot-feasibility solver and sweep engines for a projectile launched from a
//! moving platform toward a fixed target under gravity, with optional
//! quadratic aerodynamic drag.
//!
//! The crate answers one question: does a feasible launch speed, angle, and
//! azimuth correction exist satisfying the height, ceiling-clearance,
//! descent-rate, and lateral-drift constraints? It aggregates that answer
//! over dense sweeps:
//!
//! - [`evaluate_shot`] runs the full pipeline (coarse seed sweep, joint
//!   Newton refinement, validation gate) for one platform position;
//! - [`evaluate_shot_with_hint`] is the refinement-only fast path seeded from
//!   a known nearby solution;
//! - [`compute_heatmap`] evaluates a 2D field of platform positions with a
//!   seed-and-propagate grid scan;
//! - [`compute_range_chart`] brute-forces a 3D sweep over distance and
//!   platform velocities;
//! - [`compute_detailed_shot`] samples the flight path of a confirmed shot
//!   for rendering.
//!
//! Everything is a pure function of its configuration and inputs: no solver
//! state persists across calls, infeasibility is an absent result rather than
//! an error, and every scan allocates its grid fresh.

// Module declarations
mod config;
mod constants;
mod evaluator;
mod heatmap;
mod range_chart;
mod refine;
mod sampling;
mod sweep;
mod trajectory;
mod validate;

// Re-export the public surface
pub use config::{AngleMode, AxisSpec, ShotConfig, SpeedMode};
pub use constants::{DRAG_K, G_ACCEL_MPS2};
pub use evaluator::{evaluate_shot, evaluate_shot_at_range, evaluate_shot_with_hint};
pub use heatmap::{compute_heatmap, CellState, GridStats, HeatmapGrid, ValueRange};
pub use range_chart::{compute_range_chart, RangeChartGrid};
pub use sampling::{compute_detailed_shot, DetailedShot, TrajectorySample};
pub use trajectory::{simulate_to_range, RangeCrossing};
pub use validate::ShotResult;
