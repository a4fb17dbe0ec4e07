//! Single-shot feasibility queries: the composition of coarse sweep, Newton
//! refinement, and the validation gate for one platform state.

use crate::config::ShotConfig;
use crate::constants::MIN_TARGET_RANGE_M;
use crate::refine::refine;
use crate::sweep::{coarse_seed, Seed};
use crate::validate::{validate, ShotResult};

/// Horizontal distance from a platform position to the configured target.
pub(crate) fn target_range(x: f64, y: f64, config: &ShotConfig) -> f64 {
    let dx = config.target_x - x;
    let dy = config.target_y - y;
    (dx * dx + dy * dy).sqrt()
}

/// Feasibility of a shot from platform position (x, y).
///
/// Runs the full pipeline: coarse seed sweep, joint Newton refinement, final
/// validation. `None` means no valid shot exists, an expected outcome rather
/// failure.
pub fn evaluate_shot(x: f64, y: f64, config: &ShotConfig) -> Option<ShotResult> {
    let range = target_range(x, y, config);
    if range < MIN_TARGET_RANGE_M {
        return None;
    }
    let seed = coarse_seed(config, range)?;
    let refined = refine(config, range, seed);
    validate(config, range, seed.speed, refined)
}

/// Refinement-only fast path: skip the coarse sweep and refine directly from
/// a known nearby solution. Used by the field scanner's propagation and
/// recovery phases.
pub fn evaluate_shot_with_hint(
    x: f64,
    y: f64,
    config: &ShotConfig,
    hint_speed: f64,
    hint_angle: f64,
) -> Option<ShotResult> {
    let range = target_range(x, y, config);
    if range < MIN_TARGET_RANGE_M {
        return None;
    }
    let seed = Seed {
        speed: hint_speed,
        angle: hint_angle,
    };
    let refined = refine(config, range, seed);
    validate(config, range, seed.speed, refined)
}

/// Feasibility at a synthetic platform position `range` meters from the
/// target along the firing line, with the platform velocities overridden.
///
/// Used by the range chart; the derived configuration is a fresh value and
/// the original is untouched.
pub fn evaluate_shot_at_range(
    range: f64,
    tangential_velocity: f64,
    radial_velocity: f64,
    config: &ShotConfig,
) -> Option<ShotResult> {
    let derived = config.with_velocities(tangential_velocity, radial_velocity);
    evaluate_shot(derived.target_x - range, derived.target_y, &derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_close_is_absent_regardless_of_configuration() {
        let config = ShotConfig::default();
        // 0.2 m from the target, below the minimum range
        assert!(evaluate_shot(config.target_x - 0.2, config.target_y, &config).is_none());
    }

    #[test]
    fn test_determinism_without_drag() {
        let config = ShotConfig::default();
        let a = evaluate_shot(0.0, 0.0, &config).unwrap();
        let b = evaluate_shot(0.0, 0.0, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hint_fast_path_agrees_on_feasibility() {
        let config = ShotConfig::default();
        let full = evaluate_shot(0.0, 0.0, &config).unwrap();
        let hinted = evaluate_shot_with_hint(0.0, 0.0, &config, full.speed, full.angle)
            .expect("hinting from the cell's own solution must stay feasible");
        assert!((hinted.height_error).abs() <= 0.05);
    }

    #[test]
    fn test_at_range_equals_synthetic_position() {
        let config = ShotConfig::default();
        let via_chart = evaluate_shot_at_range(5.0, 1.0, -0.5, &config);
        let derived = config.with_velocities(1.0, -0.5);
        let via_position = evaluate_shot(config.target_x - 5.0, config.target_y, &derived);
        assert_eq!(via_chart, via_position);
    }

    #[test]
    fn test_range_uses_planar_distance() {
        let config = ShotConfig::default();
        let r = target_range(config.target_x - 3.0, config.target_y + 4.0, &config);
        assert!((r - 5.0).abs() < 1e-12);
    }
}
