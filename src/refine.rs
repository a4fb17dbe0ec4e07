//! Joint Newton refinement of launch angle and azimuth correction.
//!
//! Starting from a coarse seed, drives the height-error and lateral-drift
//! residuals to zero with a two-variable Newton step (finite-difference
//! Jacobian, analytic 2×2 inverse). With the launch angle fixed only the
//! azimuth is solved, via 1D Newton on the drift residual. Residual
//! evaluations go through the drag-aware trajectory model when drag is
//! enabled.
//!
//! Non-convergence is not an error: the best iterate achieved is returned and
//! the validation gate decides. This can only reject feasible shots, never
//! accept infeasible ones.

use crate::config::ShotConfig;
use crate::constants::{
    AZIMUTH_LIMIT, MIN_EFFECTIVE_RADIAL_SPEED, NEWTON_CONVERGENCE_TOL,
    NEWTON_DEGENERATE_ANGLE_STEP, NEWTON_FD_STEP, NEWTON_MAX_ATTEMPTS, NEWTON_MAX_ITERATIONS,
    NEWTON_STEEPEN_ANGLE_STEP,
};
use crate::sweep::{geometric_azimuth, Seed};
use crate::trajectory::{simulate_to_range, RangeCrossing};

/// Refined launch solution (speed is carried unchanged from the seed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refined {
    pub angle: f64,
    pub azimuth: f64,
}

/// Crossing state for a full candidate (speed, angle, azimuth) under the
/// configuration's drag mode and platform velocities.
pub fn probe(
    config: &ShotConfig,
    range: f64,
    speed: f64,
    angle: f64,
    azimuth: f64,
) -> Option<RangeCrossing> {
    let horizontal = speed * angle.cos();
    let vx = horizontal * azimuth.cos() + config.radial_velocity;
    let vy = speed * angle.sin();
    let vz = horizontal * azimuth.sin() + config.tangential_velocity;
    simulate_to_range(vx, vy, vz, range, config.platform_height, config.drag_k())
}

fn residuals(
    config: &ShotConfig,
    range: f64,
    required_height: f64,
    speed: f64,
    angle: f64,
    azimuth: f64,
) -> Option<(f64, f64)> {
    probe(config, range, speed, angle, azimuth).map(|c| (c.height - required_height, c.lateral))
}

/// Refine the seed's launch angle and azimuth correction against the
/// configured target. Always produces the best iterate reached; the caller
/// validates it.
pub fn refine(config: &ShotConfig, range: f64, seed: Seed) -> Refined {
    let required_height = config.required_height();
    let (angle_min, angle_max) = config.angle_mode.bounds();
    let fixed_angle = config.angle_mode.is_fixed();
    let speed = seed.speed;

    let mut angle = seed.angle.clamp(angle_min, angle_max);
    let mut azimuth = geometric_azimuth(speed * angle.cos(), config.tangential_velocity);

    let mut best = Refined { angle, azimuth };
    let mut best_error = f64::INFINITY;

    for attempt in 0..NEWTON_MAX_ATTEMPTS {
        let mut converged = false;

        for _ in 0..NEWTON_MAX_ITERATIONS {
            let horizontal = speed * angle.cos();
            let effective_radial = horizontal * azimuth.cos() + config.radial_velocity;
            if effective_radial <= MIN_EFFECTIVE_RADIAL_SPEED {
                // Degenerate geometry: flatten the arc and re-aim. Shares the
                // iteration budget but is not a convergence failure.
                if !fixed_angle {
                    angle = (angle - NEWTON_DEGENERATE_ANGLE_STEP).max(angle_min);
                }
                azimuth = geometric_azimuth(speed * angle.cos(), config.tangential_velocity);
                continue;
            }

            let Some((f1, f2)) = residuals(config, range, required_height, speed, angle, azimuth)
            else {
                // Simulation aborted (ground hit or time cap): steepen and
                // continue, unless the angle is pinned.
                if fixed_angle {
                    break;
                }
                angle = (angle + NEWTON_DEGENERATE_ANGLE_STEP).min(angle_max);
                azimuth = geometric_azimuth(speed * angle.cos(), config.tangential_velocity);
                continue;
            };

            let error = if fixed_angle {
                f2.abs()
            } else {
                f1.abs().max(f2.abs())
            };
            if error < best_error {
                best_error = error;
                best = Refined { angle, azimuth };
            }

            if fixed_angle {
                if f2.abs() < NEWTON_CONVERGENCE_TOL {
                    converged = true;
                    break;
                }
                // 1D Newton on the drift residual
                let Some((_, f2_da)) =
                    residuals(config, range, required_height, speed, angle, azimuth + NEWTON_FD_STEP)
                else {
                    break;
                };
                let slope = (f2_da - f2) / NEWTON_FD_STEP;
                if slope.abs() < 1e-12 {
                    break;
                }
                azimuth = (azimuth - f2 / slope).clamp(-AZIMUTH_LIMIT, AZIMUTH_LIMIT);
            } else {
                if f1.abs() < NEWTON_CONVERGENCE_TOL && f2.abs() < NEWTON_CONVERGENCE_TOL {
                    converged = true;
                    break;
                }
                // One-sided finite-difference Jacobian
                let Some((f1_dt, f2_dt)) =
                    residuals(config, range, required_height, speed, angle + NEWTON_FD_STEP, azimuth)
                else {
                    break;
                };
                let Some((f1_da, f2_da)) =
                    residuals(config, range, required_height, speed, angle, azimuth + NEWTON_FD_STEP)
                else {
                    break;
                };
                let j11 = (f1_dt - f1) / NEWTON_FD_STEP;
                let j12 = (f1_da - f1) / NEWTON_FD_STEP;
                let j21 = (f2_dt - f2) / NEWTON_FD_STEP;
                let j22 = (f2_da - f2) / NEWTON_FD_STEP;

                let det = j11 * j22 - j12 * j21;
                if det.abs() < 1e-12 {
                    break;
                }
                // Analytic 2×2 inverse applied to the residual vector
                let step_angle = (j22 * f1 - j12 * f2) / det;
                let step_azimuth = (-j21 * f1 + j11 * f2) / det;

                angle = (angle - step_angle).clamp(angle_min, angle_max);
                azimuth = (azimuth - step_azimuth).clamp(-AZIMUTH_LIMIT, AZIMUTH_LIMIT);
            }
        }

        // A converged solution that arrives on the way up gets one retry at a
        // steeper launch angle. Fixed-angle mode has no angle to push and
        // accepts the result as-is.
        if converged && !fixed_angle && attempt + 1 < NEWTON_MAX_ATTEMPTS {
            let ascending = probe(config, range, speed, best.angle, best.azimuth)
                .map(|c| c.vy >= 0.0)
                .unwrap_or(false);
            if ascending {
                angle = (best.angle + NEWTON_STEEPEN_ANGLE_STEP).min(angle_max);
                azimuth = geometric_azimuth(speed * angle.cos(), config.tangential_velocity);
                best_error = f64::INFINITY;
                continue;
            }
        }
        break;
    }

    best
}
