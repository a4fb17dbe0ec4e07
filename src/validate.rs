//! Final validation gate and the feasible-shot record.

use serde::{Deserialize, Serialize};

use crate::config::ShotConfig;
use crate::constants::{HEIGHT_TOLERANCE_FIXED_ANGLE_M, HEIGHT_TOLERANCE_M};
use crate::refine::{probe, Refined};

/// A confirmed-feasible launch solution.
///
/// A value type with no identity: either present (feasible) or absent; there
/// is no partially valid state. Every stored field satisfies the validation
/// gates of the configuration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    /// Launch speed (m/s).
    pub speed: f64,
    /// Launch angle above horizontal (rad).
    pub angle: f64,
    /// Azimuth correction relative to the firing line (rad).
    pub azimuth: f64,
    /// Flight time to the target range (s).
    pub flight_time: f64,
    /// Height residual at the target (m, signed).
    pub height_error: f64,
    /// Vertical velocity at the target (m/s, negative = descending).
    pub descent_velocity: f64,
    /// Angle below horizontal of the arrival velocity (degrees, positive =
    /// descending).
    pub descent_angle_deg: f64,
    /// Apex height relative to the launch point (m).
    pub apex_height: f64,
    /// Lateral offset from the firing line at the target (m, signed).
    pub lateral_drift: f64,
    /// Horizontal distance to the target (m).
    pub range: f64,
}

/// Re-evaluate the refined solution once more through the trajectory model
/// and apply every feasibility gate, in order: height tolerance, ceiling
/// clearance, descent rate, lateral drift.
pub fn validate(
    config: &ShotConfig,
    range: f64,
    speed: f64,
    refined: Refined,
) -> Option<ShotResult> {
    let crossing = probe(config, range, speed, refined.angle, refined.azimuth)?;

    let height_error = crossing.height - config.required_height();
    let tolerance = if config.angle_mode.is_fixed() {
        HEIGHT_TOLERANCE_FIXED_ANGLE_M
    } else {
        HEIGHT_TOLERANCE_M
    };
    if height_error.abs() > tolerance {
        return None;
    }

    if crossing.apex > config.ceiling_height {
        return None;
    }

    // Not descending fast enough at the target
    if crossing.vy > config.max_descent_velocity {
        return None;
    }

    if config.max_lateral_drift > 0.0 && crossing.lateral.abs() > config.max_lateral_drift {
        return None;
    }

    let horizontal_speed = (crossing.vx * crossing.vx + crossing.vz * crossing.vz).sqrt();
    let descent_angle_deg = (-crossing.vy).atan2(horizontal_speed).to_degrees();

    Some(ShotResult {
        speed,
        angle: refined.angle,
        azimuth: refined.azimuth,
        flight_time: crossing.time,
        height_error,
        descent_velocity: crossing.vy,
        descent_angle_deg,
        apex_height: crossing.apex,
        lateral_drift: crossing.lateral,
        range,
    })
}
