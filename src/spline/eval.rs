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

//! Point evaluation of a fitted spline.

use super::CurvatureBasis;
use crate::{DVector, Grid, Result, SplineError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-segment polynomial coefficients of a fitted spline.
///
/// Entry `i` belongs to the segment `[x[i], x[i + 1]]` and describes
/// `a + b·δ + c·δ²/2 + d·δ³/6` with `δ` measured from `x[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct SplineCoefficients {
    pub a: DVector,
    pub b: DVector,
    pub c: DVector,
    pub d: DVector,
}

impl SplineCoefficients {
    /// Collect coefficient vectors, which must all have the same length
    pub fn new(a: DVector, b: DVector, c: DVector, d: DVector) -> Result<Self> {
        let expected = a.len();
        for found in [b.len(), c.len(), d.len()] {
            if found != expected {
                return Err(SplineError::LengthMismatch { expected, found });
            }
        }
        Ok(Self { a, b, c, d })
    }

    /// Segment coefficients from fitted knot curvatures, `a = A θ` etc.
    pub fn from_curvatures(basis: &CurvatureBasis, curvatures: &DVector) -> Result<Self> {
        if curvatures.len() != basis.cols() {
            return Err(SplineError::CurvatureLength {
                expected: basis.cols(),
                found: curvatures.len(),
            });
        }
        Ok(Self {
            a: &basis.a * curvatures,
            b: &basis.b * curvatures,
            c: &basis.c * curvatures,
            d: &basis.d * curvatures,
        })
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// `[a, b, c, d]` of segment `i` (zero-based)
    pub fn segment(&self, i: usize) -> Option<[f64; 4]> {
        (i < self.len()).then(|| [self.a[i], self.b[i], self.c[i], self.d[i]])
    }
}

/// Spline value with its first and second derivative at a point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SplineValue {
    pub value: f64,
    pub first_derivative: f64,
    pub second_derivative: f64,
}

impl From<SplineValue> for (f64, f64, f64) {
    fn from(v: SplineValue) -> Self {
        (v.value, v.first_derivative, v.second_derivative)
    }
}

/// Evaluate the spline and its first two derivatives at `r`.
///
/// With `dr = r - x[i]` the value is `a + b·dr + c·dr²/2 + d·dr³/6`, the cubic
/// whose slope `b + c·dr + d·dr²/2` and curvature `c + d·dr` are returned alongside.
/// The `1/6` of the cubic term matches the `D·δ³/6` of the design matrix rows, so
/// evaluating a fitted spline reproduces `v θ` exactly.
///
/// Fails with a domain error for `r < Rmin` and for points beyond the last knot.
/// The evaluated value is reported at trace level.
///
/// # Examples
/// ~~~
/// use ccs::{DVector, Grid};
/// use ccs::spline::{spline_eval012, SplineCoefficients};
/// let grid = Grid::new(2.0, 6.0, 4).unwrap();
/// let coeffs = SplineCoefficients::new(
///     DVector::from_vec(vec![4.0, 3.0, 2.0, 1.0]),
///     DVector::from_vec(vec![-1.0; 4]),
///     DVector::from_vec(vec![0.5; 4]),
///     DVector::zeros(4),
/// ).unwrap();
/// let (f0, f1, f2) = spline_eval012(&coeffs, 4.0, &grid).unwrap().into();
/// assert_eq!((f0, f1, f2), (3.0, -1.0, 0.5));
/// assert!(spline_eval012(&coeffs, 1.5, &grid).is_err());
/// ~~~
pub fn spline_eval012(coeffs: &SplineCoefficients, r: f64, grid: &Grid) -> Result<SplineValue> {
    let (index, dr) = grid.locate(r)?;
    let [a, b, c, d] = coeffs
        .segment(index - 1)
        .ok_or(SplineError::SegmentOutOfRange {
            r,
            index,
            segments: coeffs.len(),
        })?;
    let value = a + dr * (b + dr * (0.5 * c + d * dr / 6.0));
    let first_derivative = b + dr * (c + 0.5 * d * dr);
    let second_derivative = c + d * dr;
    log::trace!("spline value at r = {r}: {value}");
    Ok(SplineValue {
        value,
        first_derivative,
        second_derivative,
    })
}
