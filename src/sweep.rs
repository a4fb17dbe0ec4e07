//! Coarse seed search: brute-force sweep over launch speed and angle.
//!
//! The sweep always evaluates the closed-form vacuum model, even when drag is
//! active: the seed only has to land close enough for Newton refinement to
//! finish the job.

use crate::config::ShotConfig;
use crate::constants::{
    G_ACCEL_MPS2, MIN_EFFECTIVE_RADIAL_SPEED, SWEEP_ANGLE_STEP, SWEEP_DESCENT_THRESHOLD,
    SWEEP_SPEED_STEP, SWEEP_SPEED_STEP_FINE, SWEEP_VIABLE_HEIGHT_ERROR,
};
use crate::trajectory::{vacuum_apex, vacuum_height_at};

/// Best (speed, angle) found by the coarse sweep, used to start refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub speed: f64,
    pub angle: f64,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    speed: f64,
    angle: f64,
    height_error: f64,
    arrival_vy: f64,
    descending: bool,
    viable: bool,
}

/// Geometric azimuth correction: aim so the horizontal launch component
/// cancels the platform's tangential velocity.
pub fn geometric_azimuth(horizontal_speed: f64, tangential_velocity: f64) -> f64 {
    (-tangential_velocity / horizontal_speed).atan()
}

/// Whether `candidate` beats the incumbent under the seed selection policy:
/// descending beats non-descending; among descending, viable beats non-viable,
/// two viables prefer the steeper descent (high-arc bias), two non-viables
/// prefer the lower error; non-descending candidates only compete on error
/// while no descending candidate exists.
fn better(candidate: &Candidate, best: &Candidate) -> bool {
    if candidate.descending {
        if !best.descending {
            return true;
        }
        match (candidate.viable, best.viable) {
            (true, false) => true,
            (true, true) => candidate.arrival_vy < best.arrival_vy,
            (false, false) => candidate.height_error < best.height_error,
            (false, true) => false,
        }
    } else {
        !best.descending && candidate.height_error < best.height_error
    }
}

/// Brute-force double loop over the active speed and angle bounds, producing
/// the refinement seed, or `None` when every combination is discarded.
pub fn coarse_seed(config: &ShotConfig, range: f64) -> Option<Seed> {
    let required_height = config.required_height();
    let (speed_min, speed_max) = config.speed_mode.bounds();
    let (angle_min, angle_max) = config.angle_mode.bounds();

    // Finer speed stepping when speed is the sole free variable
    let speed_step = if config.angle_mode.is_fixed() && !config.speed_mode.is_fixed() {
        SWEEP_SPEED_STEP_FINE
    } else {
        SWEEP_SPEED_STEP
    };

    let mut best: Option<Candidate> = None;

    let mut speed = speed_min;
    while speed <= speed_max + 1e-9 {
        let mut angle = angle_min;
        while angle <= angle_max + 1e-9 {
            if let Some(candidate) = evaluate_candidate(config, range, required_height, speed, angle)
            {
                let take = match &best {
                    None => true,
                    Some(b) => better(&candidate, b),
                };
                if take {
                    best = Some(candidate);
                }
            }
            angle += SWEEP_ANGLE_STEP;
            if config.angle_mode.is_fixed() {
                break;
            }
        }
        speed += speed_step;
        if config.speed_mode.is_fixed() {
            break;
        }
    }

    best.map(|c| Seed {
        speed: c.speed,
        angle: c.angle,
    })
}

fn evaluate_candidate(
    config: &ShotConfig,
    range: f64,
    required_height: f64,
    speed: f64,
    angle: f64,
) -> Option<Candidate> {
    let vertical = speed * angle.sin();
    let horizontal = speed * angle.cos();

    // Ceiling pre-cut on the vacuum apex
    if vacuum_apex(vertical) > config.ceiling_height {
        return None;
    }

    let azimuth = geometric_azimuth(horizontal, config.tangential_velocity);
    let effective_radial = horizontal * azimuth.cos() + config.radial_velocity;
    if effective_radial <= MIN_EFFECTIVE_RADIAL_SPEED {
        return None;
    }

    let time = range / effective_radial;
    let height_error = (vacuum_height_at(vertical, time) - required_height).abs();
    let arrival_vy = vertical - G_ACCEL_MPS2 * time;
    let descending = arrival_vy < SWEEP_DESCENT_THRESHOLD;

    Some(Candidate {
        speed,
        angle,
        height_error,
        arrival_vy,
        descending,
        viable: descending && height_error < SWEEP_VIABLE_HEIGHT_ERROR,
    })
}
