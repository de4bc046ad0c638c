// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Fitted curvature constrained spline.

use super::{spline_construction, spline_eval012, CurvatureBasis, SplineCoefficients, SplineValue};
use crate::report::scientific;
use crate::twobody::IsotropicTwobodyEnergy;
use crate::{Cutoff, DVector, Grid, Result, SplineError};
use itertools::izip;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt::{self, Display};
use std::io::Write;

/// A spline with known segment coefficients on a fixed grid.
///
/// # Examples
/// ~~~
/// use ccs::{DVector, Grid};
/// use ccs::spline::CurvatureSpline;
///
/// let grid = Grid::new(1.0, 3.0, 4).unwrap();
/// let theta = DVector::from_element(grid.cols(), 2.0);
/// let spline = CurvatureSpline::from_curvatures(grid, &theta).unwrap();
/// approx::assert_relative_eq!(spline.energy(2.0).unwrap(), 1.0, epsilon = 1e-12);
/// assert!(spline.to_string().starts_with("Spline table\n"));
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CurvatureSpline {
    grid: Grid,
    coefficients: SplineCoefficients,
}

impl CurvatureSpline {
    /// Wrap coefficients of `grid.n_knots()` segments
    pub fn new(grid: Grid, coefficients: SplineCoefficients) -> Result<Self> {
        if coefficients.len() != grid.n_knots() {
            return Err(SplineError::LengthMismatch {
                expected: grid.n_knots(),
                found: coefficients.len(),
            });
        }
        Ok(Self { grid, coefficients })
    }

    /// Spline from fitted knot curvatures, building the basis for `grid`
    pub fn from_curvatures(grid: Grid, curvatures: &DVector) -> Result<Self> {
        let basis = spline_construction(grid.n_knots(), grid.cols(), grid.dx())?;
        Self::with_basis(grid, &basis, curvatures)
    }

    /// Spline from fitted knot curvatures using an existing basis
    pub fn with_basis(grid: Grid, basis: &CurvatureBasis, curvatures: &DVector) -> Result<Self> {
        let coefficients = SplineCoefficients::from_curvatures(basis, curvatures)?;
        Self::new(grid, coefficients)
    }

    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub const fn coefficients(&self) -> &SplineCoefficients {
        &self.coefficients
    }

    /// Value, slope and curvature at `r`
    pub fn evaluate(&self, r: f64) -> Result<SplineValue> {
        spline_eval012(&self.coefficients, r, &self.grid)
    }

    /// Pair energy at `r`
    pub fn energy(&self, r: f64) -> Result<f64> {
        Ok(self.evaluate(r)?.value)
    }

    /// Write the coefficient table, one segment per line:
    /// segment start and stop followed by `a`, `b`, `c` and `d`.
    pub fn write_table<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        write!(writer, "{}", self)?;
        Ok(())
    }
}

impl Display for CurvatureSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spline table")?;
        let knots = self.grid.knots().as_slice();
        let coeffs = &self.coefficients;
        for (bounds, a, b, c, d) in izip!(
            knots.windows(2),
            &coeffs.a,
            &coeffs.b,
            &coeffs.c,
            &coeffs.d
        ) {
            writeln!(
                f,
                "{:6.3} {:6.3} {:>15} {:>15} {:>15} {:>15}",
                bounds[0],
                bounds[1],
                scientific(*a, 8),
                scientific(*b, 8),
                scientific(*c, 8),
                scientific(*d, 8)
            )?;
        }
        Ok(())
    }
}

impl Cutoff for CurvatureSpline {
    fn cutoff(&self) -> f64 {
        self.grid.r_cut()
    }
    fn lower_cutoff(&self) -> f64 {
        self.grid.r_min()
    }
}

/// Zero beyond the outer cutoff and infinite below the inner cutoff
impl IsotropicTwobodyEnergy for CurvatureSpline {
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        let r = distance_squared.sqrt();
        if r > self.grid.r_cut() {
            return 0.0;
        }
        self.evaluate(r).map_or(f64::INFINITY, |v| v.value)
    }

    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        let r = distance_squared.sqrt();
        if r > self.grid.r_cut() {
            return 0.0;
        }
        self.evaluate(r).map_or(f64::INFINITY, |v| -v.first_derivative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quadratic() -> CurvatureSpline {
        let grid = Grid::new(2.0, 6.0, 4).unwrap();
        let theta = DVector::from_element(grid.cols(), 2.0);
        CurvatureSpline::from_curvatures(grid, &theta).unwrap()
    }

    #[test]
    fn test_quadratic_reference() {
        let spline = quadratic();
        for r in [2.0, 2.5, 3.0, 4.2, 5.5, 6.0] {
            let v = spline.evaluate(r).unwrap();
            assert_relative_eq!(v.value, (r - 6.0).powi(2), epsilon = 1e-12);
            assert_relative_eq!(v.first_derivative, 2.0 * (r - 6.0), epsilon = 1e-12);
            assert_relative_eq!(v.second_derivative, 2.0, epsilon = 1e-12);
        }
        assert!(spline.energy(1.9).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_coefficient_count() {
        let grid = Grid::new(2.0, 6.0, 4).unwrap();
        let coeffs = SplineCoefficients::new(
            DVector::zeros(3),
            DVector::zeros(3),
            DVector::zeros(3),
            DVector::zeros(3),
        )
        .unwrap();
        assert_eq!(
            CurvatureSpline::new(grid, coeffs),
            Err(SplineError::LengthMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_table() {
        let spline = quadratic();
        let table = spline.to_string();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Spline table");
        assert_eq!(
            lines[1],
            " 2.000  3.000  9.00000000E+00 -6.00000000E+00  2.00000000E+00  0.00000000E+00"
        );
        assert_eq!(
            lines[4],
            " 5.000  6.000  0.00000000E+00  0.00000000E+00  2.00000000E+00  0.00000000E+00"
        );

        let mut buffer = Vec::new();
        spline.write_table(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), table);
    }

    #[test]
    fn test_twobody_energy() {
        let spline = quadratic();
        assert_eq!(spline.cutoff(), 6.0);
        assert_eq!(spline.lower_cutoff(), 2.0);
        assert_relative_eq!(spline.isotropic_twobody_energy(9.0), 9.0, epsilon = 1e-12);
        assert_relative_eq!(spline.isotropic_twobody_force(9.0), 6.0, epsilon = 1e-12);
        assert_eq!(spline.isotropic_twobody_energy(49.0), 0.0);
        assert_eq!(spline.isotropic_twobody_force(49.0), 0.0);
        assert!(spline.isotropic_twobody_energy(1.0).is_infinite());
    }
}
