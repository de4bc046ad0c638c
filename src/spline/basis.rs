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

//! Banded operators mapping knot curvatures onto segment coefficients.

use crate::{DMatrix, Result, SplineError};
use nalgebra::RowDVector;
#[cfg(feature = "serde")]
use serde::Serialize;

/// The four `(rows, cols)` operators of the curvature constrained spline.
///
/// Segment `i` (row `i - 1`) is the cubic
/// ```text
/// s(r) = a + b·δ + c·δ²/2 + d·δ³/6,    δ = r - x[i] ∈ [-dx, 0]
/// ```
/// expanded around its right knot `x[i]`. With θ the vector of curvatures at
/// the knots, `a = A θ`, `b = B θ`, `c = C θ` and `d = D θ`. The last segment has
/// `a = b = 0`, i.e. the spline and its slope vanish at the outer cutoff, and
/// values further in accumulate from there which makes `A` and `B` upper triangular
/// rather than banded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CurvatureBasis {
    /// Curvature (second derivative) at the right knot
    pub c: DMatrix,
    /// Curvature difference over the segment, i.e. the third derivative
    pub d: DMatrix,
    /// Slope at the right knot
    pub b: DMatrix,
    /// Value at the right knot
    pub a: DMatrix,
    dx: f64,
}

impl CurvatureBasis {
    /// Number of segments
    pub fn rows(&self) -> usize {
        self.a.nrows()
    }

    /// Number of curvature unknowns
    pub fn cols(&self) -> usize {
        self.a.ncols()
    }

    /// Knot spacing the operators were scaled with
    pub const fn dx(&self) -> f64 {
        self.dx
    }

    /// Design row of a single distance in segment `index` (one-based) at offset `delta`
    /// from the segment's right knot:
    /// `A[i-1] + B[i-1]·δ + C[i-1]·δ²/2 + D[i-1]·δ³/6`.
    ///
    /// # Panics
    /// Panics if `index` is zero or exceeds the number of segments.
    pub fn contribution(&self, index: usize, delta: f64) -> RowDVector<f64> {
        let k = index - 1;
        let mut row = self.a.row(k).clone_owned();
        row += self.b.row(k) * delta;
        row += self.c.row(k) * (delta.powi(2) / 2.0);
        row += self.d.row(k) * (delta.powi(3) / 6.0);
        row
    }
}

/// Build the `C`, `D`, `B` and `A` operators for `rows` segments and `cols = rows + 1`
/// knots spaced `dx` apart.
///
/// # Examples
/// ~~~
/// use ccs::spline::spline_construction;
/// let basis = spline_construction(4, 5, 1.0).unwrap();
/// assert_eq!(basis.a.shape(), (4, 5));
/// assert_eq!(basis.dx(), 1.0);
/// assert_eq!(basis.c[(0, 1)], 1.0);
/// assert_eq!(basis.b.row(0).iter().copied().collect::<Vec<_>>(), [0.0, -0.5, -1.0, -1.0, -0.5]);
/// assert_eq!(basis.a.row(3).sum(), 0.0);
/// ~~~
pub fn spline_construction(rows: usize, cols: usize, dx: f64) -> Result<CurvatureBasis> {
    if cols < 2 || rows + 1 != cols {
        return Err(SplineError::DimensionMismatch { rows, cols });
    }
    if !(dx.is_finite() && dx > 0.0) {
        return Err(SplineError::InvalidSpacing(dx));
    }

    // identity shifted one column to the right
    let c = DMatrix::from_fn(rows, cols, |i, j| if j == (i + 1) % cols { 1.0 } else { 0.0 });

    let d = DMatrix::from_fn(rows, cols, |i, j| {
        if j == i {
            -1.0 / dx
        } else if j == i + 1 {
            1.0 / dx
        } else {
            0.0
        }
    });

    // Unshifted slope operator: row p sums half the end curvatures and all interior
    // curvatures from knot p to the outer cutoff.
    let slope = |p: usize, j: usize| {
        if j == cols - 1 || j == p {
            -0.5
        } else if j > p {
            -1.0
        } else {
            0.0
        }
    };

    // Unshifted value operator, filled from the outer cutoff inwards. The weight of
    // the last curvature grows by one half per segment.
    let mut value = DMatrix::zeros(rows, cols);
    let mut last = 1.0 / 3.0;
    for p in (0..rows).rev() {
        value[(p, cols - 1)] = last;
        last += 0.5;
        for j in p..cols - 1 {
            value[(p, j)] = if j == p { 1.0 / 6.0 } else { (j - p) as f64 };
        }
    }

    // drop the first row and append a zero row so row i - 1 describes segment i
    let b = DMatrix::from_fn(rows, cols, |i, j| {
        if i + 1 < rows {
            slope(i + 1, j) * dx
        } else {
            0.0
        }
    });
    let a = DMatrix::from_fn(rows, cols, |i, j| {
        if i + 1 < rows {
            value[(i + 1, j)] * dx * dx
        } else {
            0.0
        }
    });

    Ok(CurvatureBasis { c, d, b, a, dx })
}
