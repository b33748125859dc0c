use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::lorenz::Coefficients;

/// Half-width of the cube initial conditions are drawn from.
pub const IC_HALF_WIDTH: f64 = 15.0;

/// Trajectory samples per unit of simulated time.
pub const SAMPLES_PER_TIME_UNIT: usize = 250;

/// The full adjustable parameter set: vector-field coefficients, batch
/// shape, camera azimuth and the RNG seed. A batch is a pure function of
/// this struct, so equal params reproduce bit-identical trajectories.
#[derive(Clone, Debug, PartialEq)]
pub struct SimParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
    /// Number of random initial conditions per batch.
    pub trajectories: usize,
    /// Integration time span.
    pub horizon: f64,
    /// Camera azimuth in degrees.
    pub angle: f64,
    pub seed: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            trajectories: 10,
            horizon: 4.0,
            angle: 0.0,
            seed: 1,
        }
    }
}

impl SimParams {
    pub fn coefficients(&self) -> Coefficients {
        Coefficients {
            sigma: self.sigma,
            rho: self.rho,
            beta: self.beta,
        }
    }
}

/// Number of samples on the shared time grid for a given horizon.
/// Truncating product rule, with a floor of one so a degenerate horizon
/// still carries the initial condition itself.
pub fn sample_count(horizon: f64) -> usize {
    ((horizon * SAMPLES_PER_TIME_UNIT as f64) as usize).max(1)
}

/// Draw `n` initial conditions i.i.d. uniform over the sampling cube.
/// The stream is a pure function of the seed: axis draws are ordered
/// x, y, z per point, point by point.
pub fn initial_conditions(seed: u64, n: usize) -> Vec<[f64; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            [
                rng.gen_range(-IC_HALF_WIDTH..IC_HALF_WIDTH),
                rng.gen_range(-IC_HALF_WIDTH..IC_HALF_WIDTH),
                rng.gen_range(-IC_HALF_WIDTH..IC_HALF_WIDTH),
            ]
        })
        .collect()
}

/// One sampled solution curve. Points are (x, y, z) at evenly spaced times
/// from 0 to the horizon; immutable once computed.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub points: Vec<[f64; 3]>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A finished batch, handed from the solver thread to the render thread.
/// Carries the params it was computed from so the renderer can label and
/// color consistently even while newer params are in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryBatch {
    pub params: SimParams,
    pub trajectories: Vec<Trajectory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let p = SimParams::default();
        assert_eq!(p.sigma, 10.0);
        assert_eq!(p.rho, 28.0);
        assert_eq!(p.beta, 8.0 / 3.0);
        assert_eq!(p.trajectories, 10);
        assert_eq!(p.horizon, 4.0);
        assert_eq!(p.angle, 0.0);
        assert_eq!(p.seed, 1);
    }

    #[test]
    fn test_sample_count_product_rule() {
        assert_eq!(sample_count(4.0), 1000);
        assert_eq!(sample_count(2.0), 500);
        assert_eq!(sample_count(0.1), 25);
        assert_eq!(sample_count(1.0), 250);
    }

    #[test]
    fn test_sample_count_degenerate_horizon() {
        // Zero horizon still carries the initial condition.
        assert_eq!(sample_count(0.0), 1);
        // Below one sample interval, same floor.
        assert_eq!(sample_count(0.001), 1);
    }

    #[test]
    fn test_initial_conditions_in_cube() {
        let ics = initial_conditions(1, 50);
        assert_eq!(ics.len(), 50);
        for ic in &ics {
            for &axis in ic {
                assert!(
                    (-IC_HALF_WIDTH..IC_HALF_WIDTH).contains(&axis),
                    "axis value {axis} outside sampling cube"
                );
            }
        }
    }

    #[test]
    fn test_initial_conditions_deterministic() {
        let a = initial_conditions(7, 20);
        let b = initial_conditions(7, 20);
        assert_eq!(a, b, "same seed must reproduce the same set");
    }

    #[test]
    fn test_initial_conditions_seed_sensitive() {
        let a = initial_conditions(1, 10);
        let b = initial_conditions(2, 10);
        assert_ne!(a, b, "different seeds should give different sets");
    }

    #[test]
    fn test_initial_conditions_prefix_stable() {
        // Growing N extends the set without disturbing earlier points.
        let small = initial_conditions(3, 5);
        let large = initial_conditions(3, 12);
        assert_eq!(&large[..5], &small[..]);
    }

    #[test]
    fn test_coefficients_projection() {
        let p = SimParams { sigma: 1.0, rho: 2.0, beta: 3.0, ..SimParams::default() };
        let c = p.coefficients();
        assert_eq!(c.sigma, 1.0);
        assert_eq!(c.rho, 2.0);
        assert_eq!(c.beta, 3.0);
    }
}
