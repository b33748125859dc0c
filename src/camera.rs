/// Fixed world bounding box the plot is framed to, matching the attractor's
/// extent for the classic coefficient range.
pub const BOUNDS_X: (f64, f64) = (-25.0, 25.0);
pub const BOUNDS_Y: (f64, f64) = (-35.0, 35.0);
pub const BOUNDS_Z: (f64, f64) = (5.0, 55.0);

/// Camera elevation above the xy-plane, in degrees. Only the azimuth is
/// exposed as a control.
pub const ELEVATION_DEG: f64 = 30.0;

/// Orthographic camera looking at the center of the bounding box.
/// Azimuth rotates the view around the z axis.
pub struct Camera {
    sin_az: f64,
    cos_az: f64,
    sin_el: f64,
    cos_el: f64,
}

impl Camera {
    pub fn new(azimuth_deg: f64) -> Self {
        let az = azimuth_deg.to_radians();
        let el = ELEVATION_DEG.to_radians();
        Self {
            sin_az: az.sin(),
            cos_az: az.cos(),
            sin_el: el.sin(),
            cos_el: el.cos(),
        }
    }

    /// Normalize a world point into [-1, 1] per axis of the bounding box.
    fn normalize(p: [f64; 3]) -> [f64; 3] {
        [
            unit(p[0], BOUNDS_X),
            unit(p[1], BOUNDS_Y),
            unit(p[2], BOUNDS_Z),
        ]
    }

    /// Project a world point onto the view plane. Returns (u, v) with u to
    /// the right and v up, each on the order of [-sqrt(3), sqrt(3)].
    pub fn project(&self, p: [f64; 3]) -> (f64, f64) {
        let [x, y, z] = Self::normalize(p);
        // Screen right is (-sin az, cos az, 0); screen up is
        // (-sin el cos az, -sin el sin az, cos el).
        let u = -self.sin_az * x + self.cos_az * y;
        let v = -self.sin_el * (self.cos_az * x + self.sin_az * y) + self.cos_el * z;
        (u, v)
    }
}

fn unit(value: f64, bounds: (f64, f64)) -> f64 {
    2.0 * (value - bounds.0) / (bounds.1 - bounds.0) - 1.0
}

/// The 12 edges of the bounding box, in world coordinates, for the
/// wireframe frame around the plot.
pub fn box_edges() -> Vec<([f64; 3], [f64; 3])> {
    let corner = |i: usize| {
        [
            if i & 1 == 0 { BOUNDS_X.0 } else { BOUNDS_X.1 },
            if i & 2 == 0 { BOUNDS_Y.0 } else { BOUNDS_Y.1 },
            if i & 4 == 0 { BOUNDS_Z.0 } else { BOUNDS_Z.1 },
        ]
    };
    let mut edges = Vec::with_capacity(12);
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                edges.push((corner(i), corner(i | bit)));
            }
        }
    }
    edges
}
