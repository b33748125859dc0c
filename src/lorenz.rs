use ode_solvers::Vector3;

/// Phase-space state (x, y, z).
pub type State = Vector3<f64>;

/// Coefficients of the Lorenz vector field.
///
/// sigma is the Prandtl number, rho the Rayleigh number, beta a geometric
/// factor of the convection cell. Chaos sets in around rho = 24.74 for the
/// classic sigma/beta; the defaults give the familiar butterfly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

/// Instantaneous derivative of the Lorenz system at `p`:
/// (sigma(y-x), x(rho-z)-y, xy-beta*z).
pub fn derivative(p: [f64; 3], c: &Coefficients) -> [f64; 3] {
    let [x, y, z] = p;
    [
        c.sigma * (y - x),
        x * (c.rho - z) - y,
        x * y - c.beta * z,
    ]
}

/// The vector field in the form the stepper integrates.
#[derive(Clone, Copy)]
pub struct Lorenz {
    pub coefficients: Coefficients,
}

impl ode_solvers::System<f64, State> for Lorenz {
    fn system(&self, _t: f64, y: &State, dy: &mut State) {
        let c = &self.coefficients;
        dy[0] = c.sigma * (y[1] - y[0]);
        dy[1] = y[0] * (c.rho - y[2]) - y[1];
        dy[2] = y[0] * y[1] - c.beta * y[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ode_solvers::System;

    #[test]
    fn test_origin_is_fixed_point() {
        // The origin must map to a zero derivative for any coefficients.
        let cases = [
            Coefficients::default(),
            Coefficients { sigma: 0.0, rho: 0.0, beta: 0.0 },
            Coefficients { sigma: 14.0, rho: 45.0, beta: 4.0 },
        ];
        for c in cases {
            let d = derivative([0.0, 0.0, 0.0], &c);
            assert_eq!(d, [0.0, 0.0, 0.0], "nonzero derivative at origin for {c:?}");
        }
    }

    #[test]
    fn test_derivative_classic_values() {
        let c = Coefficients::default();
        let d = derivative([1.0, 2.0, 3.0], &c);
        // sigma(y-x) = 10*(2-1) = 10
        assert!((d[0] - 10.0).abs() < 1e-12);
        // x(rho-z)-y = 1*(28-3)-2 = 23
        assert!((d[1] - 23.0).abs() < 1e-12);
        // xy - beta*z = 2 - 8
        assert!((d[2] - (2.0 - 8.0)).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry_under_xy_negation() {
        // The field is invariant under (x,y,z) -> (-x,-y,z) up to sign.
        let c = Coefficients::default();
        let d = derivative([3.0, -1.5, 20.0], &c);
        let m = derivative([-3.0, 1.5, 20.0], &c);
        assert!((d[0] + m[0]).abs() < 1e-12);
        assert!((d[1] + m[1]).abs() < 1e-12);
        assert!((d[2] - m[2]).abs() < 1e-12);
    }

    #[test]
    fn test_system_impl_matches_pure_derivative() {
        let lorenz = Lorenz { coefficients: Coefficients::default() };
        let y = State::new(0.5, -7.0, 31.0);
        let mut dy = State::zeros();
        lorenz.system(0.0, &y, &mut dy);
        let d = derivative([y[0], y[1], y[2]], &lorenz.coefficients);
        assert_eq!([dy[0], dy[1], dy[2]], d);
    }
}
