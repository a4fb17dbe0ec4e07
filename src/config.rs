//! Immutable evaluation configuration.
//!
//! A [`ShotConfig`] is passed by value into every solver entry point and is
//! never mutated after construction. Derived configurations (for example the
//! range chart substituting its axis velocities) are produced by the explicit
//! `with_*` builders, which return a fresh value.

use serde::{Deserialize, Serialize};

use crate::constants::DRAG_K;

/// Launch speed selection: a single fixed speed or a searchable range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeedMode {
    /// Launch speed is pinned (m/s); the sweep iterates it exactly once.
    Fixed(f64),
    /// Launch speed is free within [min, max] (m/s).
    Range { min: f64, max: f64 },
}

impl SpeedMode {
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            SpeedMode::Fixed(v) => (v, v),
            SpeedMode::Range { min, max } => (min, max),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, SpeedMode::Fixed(_))
    }
}

/// Launch angle selection: a single fixed angle or a searchable range.
///
/// Angles are in radians above horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AngleMode {
    Fixed(f64),
    Range { min: f64, max: f64 },
}

impl AngleMode {
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            AngleMode::Fixed(v) => (v, v),
            AngleMode::Range { min, max } => (min, max),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, AngleMode::Fixed(_))
    }
}

/// One axis of the range chart sweep: a finite ascending sequence of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Materialize the axis as an ascending value sequence, inclusive of both
    /// endpoints up to floating-point slack.
    pub fn values(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.max < self.min {
            return vec![self.min];
        }
        let mut out = Vec::new();
        let mut v = self.min;
        while v <= self.max + 1e-9 {
            out.push(v);
            v += self.step;
        }
        out
    }
}

/// Immutable per-evaluation configuration.
///
/// Distances and heights are meters, velocities m/s, angles radians. Heights
/// (`platform_height`, `target_height`, `ceiling_height`) are measured from
/// the ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotConfig {
    pub speed_mode: SpeedMode,
    pub angle_mode: AngleMode,

    /// Platform velocity perpendicular to the firing line (m/s).
    pub tangential_velocity: f64,
    /// Platform velocity along the firing line, positive toward the target (m/s).
    pub radial_velocity: f64,

    /// Launch height above ground (m).
    pub platform_height: f64,
    pub target_x: f64,
    pub target_y: f64,
    /// Target height above ground (m).
    pub target_height: f64,
    /// Overhead clearance above the launch plane (m); the trajectory apex,
    /// measured from the same datum, may not exceed it.
    pub ceiling_height: f64,

    /// Maximum allowed vertical velocity at the target (m/s, signed).
    /// Negative means the shot must be descending at least this fast.
    pub max_descent_velocity: f64,
    /// Maximum allowed lateral drift magnitude at the target (m); 0 disables
    /// the check.
    pub max_lateral_drift: f64,

    pub drag_enabled: bool,

    // Field scan extents and cell size
    pub resolution: f64,
    pub field_x_min: f64,
    pub field_x_max: f64,
    pub field_y_min: f64,
    pub field_y_max: f64,

    // Range chart axes
    pub range_axis: AxisSpec,
    pub tangential_axis: AxisSpec,
    pub radial_axis: AxisSpec,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            speed_mode: SpeedMode::Range { min: 6.0, max: 12.0 },
            angle_mode: AngleMode::Range {
                min: 20.0_f64.to_radians(),
                max: 70.0_f64.to_radians(),
            },
            tangential_velocity: 0.0,
            radial_velocity: 0.0,
            platform_height: 0.5,
            target_x: 8.0,
            target_y: 0.0,
            target_height: 2.64,
            ceiling_height: 4.0,
            max_descent_velocity: -0.5,
            max_lateral_drift: 0.0,
            drag_enabled: false,
            resolution: 0.25,
            field_x_min: -2.0,
            field_x_max: 7.5,
            field_y_min: -4.0,
            field_y_max: 4.0,
            range_axis: AxisSpec::new(0.5, 8.0, 0.25),
            tangential_axis: AxisSpec::new(-3.0, 3.0, 0.5),
            radial_axis: AxisSpec::new(-3.0, 3.0, 0.5),
        }
    }
}

impl ShotConfig {
    /// New configuration with the platform velocities replaced.
    ///
    /// Used by the range chart to substitute each axis combination; the
    /// original value is untouched.
    pub fn with_velocities(&self, tangential: f64, radial: f64) -> Self {
        Self {
            tangential_velocity: tangential,
            radial_velocity: radial,
            ..self.clone()
        }
    }

    /// Height the projectile must gain relative to the launch point (m).
    pub fn required_height(&self) -> f64 {
        self.target_height - self.platform_height
    }

    /// Drag constant for the active drag mode; 0 selects vacuum kinematics.
    pub fn drag_k(&self) -> f64 {
        if self.drag_enabled {
            DRAG_K
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_values_ascending_inclusive() {
        let axis = AxisSpec::new(-1.0, 1.0, 0.5);
        let vals = axis.values();
        assert_eq!(vals.len(), 5);
        assert!((vals[0] + 1.0).abs() < 1e-12);
        assert!((vals[4] - 1.0).abs() < 1e-9);
        assert!(vals.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_axis_degenerate_step() {
        assert_eq!(AxisSpec::new(2.0, 5.0, 0.0).values(), vec![2.0]);
    }

    #[test]
    fn test_with_velocities_builds_new_value() {
        let base = ShotConfig::default();
        let derived = base.with_velocities(1.5, -2.0);
        assert_eq!(derived.tangential_velocity, 1.5);
        assert_eq!(derived.radial_velocity, -2.0);
        // original untouched
        assert_eq!(base.tangential_velocity, 0.0);
        assert_eq!(base.radial_velocity, 0.0);
        // everything else carried over
        assert_eq!(derived.target_x, base.target_x);
        assert_eq!(derived.speed_mode, base.speed_mode);
    }

    #[test]
    fn test_mode_bounds() {
        assert_eq!(SpeedMode::Fixed(9.0).bounds(), (9.0, 9.0));
        assert_eq!(SpeedMode::Range { min: 6.0, max: 12.0 }.bounds(), (6.0, 12.0));
        assert!(AngleMode::Fixed(0.8).is_fixed());
        assert!(!AngleMode::Range { min: 0.3, max: 1.2 }.is_fixed());
    }
}
