use ode_solvers::dopri5::*;
use thiserror::Error;

use crate::lorenz::{Coefficients, Lorenz, State};
use crate::state::{initial_conditions, sample_count, SimParams, Trajectory, TrajectoryBatch};

/// Relative local error tolerance handed to the stepper.
const RTOL: f64 = 1e-6;
/// Absolute local error tolerance handed to the stepper.
const ATOL: f64 = 1e-9;

/// Stepper failure surfaced at the batch boundary. Wraps the library's
/// message so callers never depend on its error enum.
#[derive(Debug, Error)]
#[error("integration failed: {message}")]
pub struct SolverError {
    message: String,
}

/// Integrate one trajectory from `ic` over `horizon` time units, sampled on
/// the shared evenly spaced grid. Step-size adaptation and error control are
/// entirely the stepper's; this function only fixes the output grid.
pub fn integrate(
    coefficients: Coefficients,
    ic: [f64; 3],
    horizon: f64,
) -> Result<Trajectory, SolverError> {
    let n = sample_count(horizon);
    if n <= 1 {
        // Degenerate horizon: the trajectory is its initial condition.
        return Ok(Trajectory { points: vec![ic] });
    }

    let y0 = State::new(ic[0], ic[1], ic[2]);
    let dt = horizon / (n - 1) as f64;
    let system = Lorenz { coefficients };
    let mut stepper = Dopri5::new(system, 0.0, horizon, dt, y0, RTOL, ATOL);
    stepper
        .integrate()
        .map_err(|e| SolverError { message: e.to_string() })?;

    let mut points: Vec<[f64; 3]> = stepper
        .y_out()
        .iter()
        .map(|y| [y[0], y[1], y[2]])
        .collect();

    // The dense grid can gain or drop the final point to float rounding;
    // pin the trajectory to the shared grid length.
    points.truncate(n);
    while points.len() < n {
        let last = points.last().copied().unwrap_or(ic);
        points.push(last);
    }

    Ok(Trajectory { points })
}

/// Produce the full batch for a parameter set: one solver invocation per
/// seeded initial condition, all on the same time grid.
pub fn generate_batch(params: &SimParams) -> Result<TrajectoryBatch, SolverError> {
    let coefficients = params.coefficients();
    let mut trajectories = Vec::with_capacity(params.trajectories);
    for ic in initial_conditions(params.seed, params.trajectories) {
        trajectories.push(integrate(coefficients, ic, params.horizon)?);
    }
    Ok(TrajectoryBatch {
        params: params.clone(),
        trajectories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_horizon_is_initial_condition() {
        let ic = [3.25, -11.5, 0.75];
        let traj = integrate(Coefficients::default(), ic, 0.0).unwrap();
        assert_eq!(traj.points, vec![ic]);
    }

    #[test]
    fn test_trajectory_starts_at_initial_condition() {
        let ic = [1.0, 1.0, 1.0];
        let traj = integrate(Coefficients::default(), ic, 1.0).unwrap();
        assert_eq!(traj.points[0], ic, "first sample must be the IC exactly");
    }

    #[test]
    fn test_sample_count_matches_grid_rule() {
        let ic = [5.0, 5.0, 5.0];
        for horizon in [0.1, 0.5, 1.0, 2.0] {
            let traj = integrate(Coefficients::default(), ic, horizon).unwrap();
            assert_eq!(
                traj.len(),
                sample_count(horizon),
                "wrong sample count for horizon {horizon}"
            );
        }
    }

    #[test]
    fn test_origin_stays_at_origin() {
        let traj = integrate(Coefficients::default(), [0.0, 0.0, 0.0], 1.0).unwrap();
        for p in &traj.points {
            assert_eq!(*p, [0.0, 0.0, 0.0], "origin is a fixed point");
        }
    }

    #[test]
    fn test_classic_orbit_bounded_and_finite() {
        // Classic coefficients keep the attractor well inside this box.
        let traj = integrate(Coefficients::default(), [1.0, 1.0, 1.0], 2.0).unwrap();
        for p in &traj.points {
            for &v in p {
                assert!(v.is_finite());
                assert!(v.abs() < 100.0, "sample {v} escaped the attractor region");
            }
        }
    }

    #[test]
    fn test_trajectory_actually_moves() {
        let traj = integrate(Coefficients::default(), [1.0, 1.0, 1.0], 1.0).unwrap();
        let first = traj.points[0];
        let last = *traj.points.last().unwrap();
        assert_ne!(first, last, "nonzero horizon should leave the IC");
    }

    #[test]
    fn test_batch_shape() {
        let params = SimParams { trajectories: 7, horizon: 0.5, ..SimParams::default() };
        let batch = generate_batch(&params).unwrap();
        assert_eq!(batch.trajectories.len(), 7);
        for traj in &batch.trajectories {
            assert_eq!(traj.len(), sample_count(0.5));
        }
        assert_eq!(batch.params, params);
    }

    #[test]
    fn test_empty_batch() {
        let params = SimParams { trajectories: 0, ..SimParams::default() };
        let batch = generate_batch(&params).unwrap();
        assert!(batch.trajectories.is_empty());
    }

    #[test]
    fn test_batch_bit_identical_across_runs() {
        let params = SimParams { trajectories: 5, horizon: 1.0, ..SimParams::default() };
        let a = generate_batch(&params).unwrap();
        let b = generate_batch(&params).unwrap();
        assert_eq!(a, b, "same seed and params must reproduce the batch exactly");
    }

    #[test]
    fn test_batch_differs_across_seeds() {
        let base = SimParams { trajectories: 3, horizon: 0.5, ..SimParams::default() };
        let other = SimParams { seed: 2, ..base.clone() };
        let a = generate_batch(&base).unwrap();
        let b = generate_batch(&other).unwrap();
        assert_ne!(a.trajectories, b.trajectories);
    }
}
