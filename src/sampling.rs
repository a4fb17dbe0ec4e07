//! Detailed trajectory sampling for a confirmed-feasible shot.
//!
//! Produces the ordered, finite flight-path sequence and the launch/arrival
//! velocity vectors the presentation layer renders. Pure with respect to its
//! inputs; only ever called with a validated result.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::ShotConfig;
use crate::constants::{
    G_ACCEL_MPS2, MAX_FLIGHT_TIME_S, RK4_TIME_STEP_S, SAMPLE_INTERVAL_S,
};
use crate::trajectory::{rk4_step, vacuum_height_at};
use crate::validate::ShotResult;

/// One point of a sampled flight path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Along-range position (m).
    pub distance: f64,
    /// Height relative to the launch point (m).
    pub height: f64,
    /// Lateral offset from the firing line (m).
    pub lateral: f64,
    /// Elapsed time (s).
    pub time: f64,
}

/// A feasible shot enriched with its sampled flight path and velocity
/// vectors, for visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedShot {
    pub result: ShotResult,
    pub samples: Vec<TrajectorySample>,
    /// Launch velocity in the firing-line frame (m/s).
    pub launch_velocity: Vector3<f64>,
    /// Velocity at the target crossing (m/s).
    pub arrival_velocity: Vector3<f64>,
}

/// Re-simulate a feasible shot with the given platform velocities and sample
/// its flight path at a fixed time interval, ending with the interpolated
/// range-crossing point.
pub fn compute_detailed_shot(
    result: &ShotResult,
    tangential_velocity: f64,
    radial_velocity: f64,
    config: &ShotConfig,
) -> DetailedShot {
    let derived = config.with_velocities(tangential_velocity, radial_velocity);

    let horizontal = result.speed * result.angle.cos();
    let vx0 = horizontal * result.azimuth.cos() + derived.radial_velocity;
    let vy0 = result.speed * result.angle.sin();
    let vz0 = horizontal * result.azimuth.sin() + derived.tangential_velocity;
    let launch_velocity = Vector3::new(vx0, vy0, vz0);

    let (samples, arrival_velocity) = if derived.drag_enabled {
        sample_drag(launch_velocity, result.range, derived.drag_k())
    } else {
        sample_vacuum(launch_velocity, result.range)
    };

    DetailedShot {
        result: *result,
        samples,
        launch_velocity,
        arrival_velocity,
    }
}

fn sample_vacuum(v0: Vector3<f64>, range: f64) -> (Vec<TrajectorySample>, Vector3<f64>) {
    let flight_time = range / v0.x;
    let mut samples = Vec::new();
    let mut time = 0.0;
    while time < flight_time {
        samples.push(TrajectorySample {
            distance: v0.x * time,
            height: vacuum_height_at(v0.y, time),
            lateral: v0.z * time,
            time,
        });
        time += SAMPLE_INTERVAL_S;
    }
    samples.push(TrajectorySample {
        distance: range,
        height: vacuum_height_at(v0.y, flight_time),
        lateral: v0.z * flight_time,
        time: flight_time,
    });
    let arrival = Vector3::new(v0.x, v0.y - G_ACCEL_MPS2 * flight_time, v0.z);
    (samples, arrival)
}

fn sample_drag(v0: Vector3<f64>, range: f64, drag_k: f64) -> (Vec<TrajectorySample>, Vector3<f64>) {
    let steps_per_sample = (SAMPLE_INTERVAL_S / RK4_TIME_STEP_S).round() as usize;
    let mut pos = Vector3::new(0.0, 0.0, 0.0);
    let mut vel = v0;
    let mut time = 0.0;
    let mut step = 0usize;
    let mut samples = vec![TrajectorySample {
        distance: 0.0,
        height: 0.0,
        lateral: 0.0,
        time: 0.0,
    }];

    while time <= MAX_FLIGHT_TIME_S {
        let (prev_pos, prev_vel, prev_time) = (pos, vel, time);
        let (next_pos, next_vel) = rk4_step(pos, vel, RK4_TIME_STEP_S, drag_k);
        pos = next_pos;
        vel = next_vel;
        time += RK4_TIME_STEP_S;
        step += 1;

        if pos.x >= range {
            let span = pos.x - prev_pos.x;
            let frac = if span > 1e-12 {
                (range - prev_pos.x) / span
            } else {
                1.0
            };
            let final_pos = prev_pos + (pos - prev_pos) * frac;
            samples.push(TrajectorySample {
                distance: range,
                height: final_pos.y,
                lateral: final_pos.z,
                time: prev_time + (time - prev_time) * frac,
            });
            let arrival = prev_vel + (vel - prev_vel) * frac;
            return (samples, arrival);
        }

        if step % steps_per_sample == 0 {
            samples.push(TrajectorySample {
                distance: pos.x,
                height: pos.y,
                lateral: pos.z,
                time,
            });
        }
    }

    // A validated shot always crosses its range inside the cap; if the cap is
    // hit the path collected so far is returned as-is.
    (samples, vel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate_shot;

    #[test]
    fn test_samples_are_ordered_and_end_at_range() {
        let config = ShotConfig::default();
        let shot = evaluate_shot(0.0, 0.0, &config).unwrap();
        let detailed = compute_detailed_shot(&shot, 0.0, 0.0, &config);

        assert!(detailed.samples.len() > 10);
        assert!(detailed
            .samples
            .windows(2)
            .all(|w| w[1].time > w[0].time && w[1].distance >= w[0].distance));

        let last = detailed.samples.last().unwrap();
        assert!((last.distance - shot.range).abs() < 1e-9);
        assert!((last.time - shot.flight_time).abs() < 1e-6);
        assert!((last.height - (config.required_height() + shot.height_error)).abs() < 1e-6);
    }

    #[test]
    fn test_arrival_velocity_matches_result() {
        let config = ShotConfig::default();
        let shot = evaluate_shot(0.0, 0.0, &config).unwrap();
        let detailed = compute_detailed_shot(&shot, 0.0, 0.0, &config);
        assert!((detailed.arrival_velocity.y - shot.descent_velocity).abs() < 1e-6);
        assert!(detailed.launch_velocity.y > 0.0);
    }

    #[test]
    fn test_drag_path_stays_under_vacuum_path() {
        let mut config = ShotConfig::default();
        config.drag_enabled = true;
        let shot = evaluate_shot(2.0, 0.0, &config).expect("drag scenario feasible");
        let detailed = compute_detailed_shot(&shot, 0.0, 0.0, &config);
        let last = detailed.samples.last().unwrap();
        assert!((last.distance - shot.range).abs() < 1e-9);
        // Sampled path reproduces the validated arrival height
        assert!((last.height - (config.required_height() + shot.height_error)).abs() < 1e-3);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let config = ShotConfig::default();
        let before = config.clone();
        let shot = evaluate_shot(0.0, 0.0, &config).unwrap();
        let _ = compute_detailed_shot(&shot, 2.0, -1.0, &config);
        assert_eq!(config, before);
    }
}
