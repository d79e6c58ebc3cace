//! Least-squares ellipse fitting
//!
//! Fits a general conic `Ax^2 + Bxy + Cy^2 + Dx + Ey = 1` to boundary
//! points via the 5x5 normal equations, then converts the conic to
//! center, semi-axes, and orientation. Points are centered on their
//! centroid before fitting to keep the system well conditioned.

/// Fitted ellipse parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseFit {
    /// Center x in pixel coordinates.
    pub cx: f64,
    /// Center y in pixel coordinates.
    pub cy: f64,
    /// Semi-major axis length in pixels.
    pub major: f64,
    /// Semi-minor axis length in pixels.
    pub minor: f64,
    /// Major-axis orientation in degrees, in [0, 180).
    pub angle_deg: f64,
}

impl EllipseFit {
    /// Ratio of major to minor axis, at least 1.
    pub fn aspect_ratio(&self) -> f64 {
        if self.minor > 0.0 {
            self.major / self.minor
        } else {
            1.0
        }
    }
}

/// Fit an ellipse to a set of points.
///
/// Returns `None` when fewer than 5 points are given, when the normal
/// equations are singular (collinear or otherwise degenerate input), or
/// when the fitted conic is not an ellipse.
pub fn fit_ellipse(points: &[(f64, f64)]) -> Option<EllipseFit> {
    if points.len() < 5 {
        return None;
    }

    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let my = points.iter().map(|p| p.1).sum::<f64>() / n;

    // Normal equations for the design rows [x^2, xy, y^2, x, y] with
    // right-hand side 1 (the conic constant F fixed at -1).
    let mut s = [[0.0f64; 5]; 5];
    let mut rhs = [0.0f64; 5];
    for &(px, py) in points {
        let x = px - mx;
        let y = py - my;
        let row = [x * x, x * y, y * y, x, y];
        for i in 0..5 {
            for j in 0..5 {
                s[i][j] += row[i] * row[j];
            }
            rhs[i] += row[i];
        }
    }

    let sol = solve5(&mut s, &mut rhs)?;
    let (a, b, c, d, e) = (sol[0], sol[1], sol[2], sol[3], sol[4]);
    let f = -1.0;

    let denom = b * b - 4.0 * a * c;
    if denom >= 0.0 {
        return None;
    }

    let xc = (2.0 * c * d - b * e) / denom;
    let yc = (2.0 * a * e - b * d) / denom;

    let lead = 2.0 * (a * e * e + c * d * d - b * d * e + denom * f);
    let root = ((a - c) * (a - c) + b * b).sqrt();
    let major_sq = lead * (a + c + root);
    let minor_sq = lead * (a + c - root);
    if major_sq < 0.0 || minor_sq < 0.0 {
        return None;
    }
    let major = -major_sq.sqrt() / denom;
    let minor = -minor_sq.sqrt() / denom;
    if !major.is_finite() || !minor.is_finite() || minor <= 0.0 {
        return None;
    }

    let theta = if b == 0.0 {
        if a <= c { 0.0 } else { std::f64::consts::FRAC_PI_2 }
    } else {
        (c - a - root).atan2(b)
    };
    let angle_deg = theta.to_degrees().rem_euclid(180.0);

    Some(EllipseFit {
        cx: xc + mx,
        cy: yc + my,
        major,
        minor,
        angle_deg,
    })
}

/// Solve a 5x5 linear system in place via Gaussian elimination with
/// partial pivoting. Returns `None` for a singular matrix.
fn solve5(m: &mut [[f64; 5]; 5], rhs: &mut [f64; 5]) -> Option<[f64; 5]> {
    const PIVOT_EPS: f64 = 1e-12;
    for col in 0..5 {
        let mut pivot = col;
        for row in col + 1..5 {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col].abs() < PIVOT_EPS {
            return None;
        }
        if pivot != col {
            m.swap(col, pivot);
            rhs.swap(col, pivot);
        }
        for row in col + 1..5 {
            let factor = m[row][col] / m[col][col];
            for k in col..5 {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut sol = [0.0f64; 5];
    for col in (0..5).rev() {
        let mut acc = rhs[col];
        for k in col + 1..5 {
            acc -= m[col][k] * sol[k];
        }
        sol[col] = acc / m[col][col];
    }
    Some(sol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ellipse_points(cx: f64, cy: f64, a: f64, b: f64, angle_deg: f64, n: usize) -> Vec<(f64, f64)> {
        let theta = angle_deg.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        (0..n)
            .map(|i| {
                let phi = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
                let (sp, cp) = phi.sin_cos();
                let x = a * cp * cos_t - b * sp * sin_t;
                let y = a * cp * sin_t + b * sp * cos_t;
                (cx + x, cy + y)
            })
            .collect()
    }

    #[test]
    fn test_axis_aligned_ellipse() {
        let pts = ellipse_points(50.0, 30.0, 20.0, 10.0, 0.0, 64);
        let fit = fit_ellipse(&pts).unwrap();
        assert!((fit.cx - 50.0).abs() < 1e-6);
        assert!((fit.cy - 30.0).abs() < 1e-6);
        assert!((fit.major - 20.0).abs() < 1e-6);
        assert!((fit.minor - 10.0).abs() < 1e-6);
        assert!(fit.angle_deg < 1e-6 || (fit.angle_deg - 180.0).abs() < 1e-6);
        assert!((fit.aspect_ratio() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_ellipse() {
        let pts = ellipse_points(10.0, 10.0, 8.0, 3.0, 90.0, 64);
        let fit = fit_ellipse(&pts).unwrap();
        assert!((fit.major - 8.0).abs() < 1e-6);
        assert!((fit.minor - 3.0).abs() < 1e-6);
        assert!((fit.angle_deg - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_ellipse() {
        let pts = ellipse_points(0.0, 0.0, 15.0, 5.0, 45.0, 90);
        let fit = fit_ellipse(&pts).unwrap();
        assert!((fit.angle_deg - 45.0).abs() < 1e-6);
        assert!((fit.aspect_ratio() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_has_unit_aspect() {
        let pts = ellipse_points(5.0, 5.0, 7.0, 7.0, 0.0, 48);
        let fit = fit_ellipse(&pts).unwrap();
        assert!((fit.aspect_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_too_few_points() {
        let pts = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, -1.0)];
        assert!(fit_ellipse(&pts).is_none());
    }

    #[test]
    fn test_collinear_points_rejected() {
        let pts: Vec<_> = (0..10).map(|i| (i as f64, 2.0 * i as f64)).collect();
        assert!(fit_ellipse(&pts).is_none());
    }
}
