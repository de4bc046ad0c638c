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

//! Uniform knot grid on `[Rmin, Rcut]`.

use crate::{DVector, Result, SplineError};
#[cfg(feature = "serde")]
use serde::Serialize;

/// Knot positions within this fraction of a segment are treated as lying on the knot.
///
/// Matches rounding `(r - Rmin) / dx` to five decimals before taking the ceiling.
pub const SNAP_TOLERANCE: f64 = 5e-6;

/// Uniform partition of `[Rmin, Rcut]` into `Nknots` segments.
///
/// # Examples
/// ~~~
/// use ccs::Grid;
/// let grid = Grid::new(2.0, 6.0, 4).unwrap();
/// assert_eq!(grid.dx(), 1.0);
/// assert_eq!(grid.cols(), 5);
/// assert_eq!(grid.knots().as_slice(), &[2.0, 3.0, 4.0, 5.0, 6.0]);
/// assert_eq!(grid.segment_index(3.5).unwrap(), 2);
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Grid {
    r_min: f64,
    r_cut: f64,
    n_knots: usize,
    dx: f64,
    knots: DVector,
}

impl Grid {
    /// Create a grid, checking `0 < r_min < r_cut` and `n_knots >= 1`
    pub fn new(r_min: f64, r_cut: f64, n_knots: usize) -> Result<Self> {
        if !(r_min.is_finite() && r_cut.is_finite() && r_min > 0.0 && r_cut > r_min) {
            return Err(SplineError::InvalidCutoff { r_min, r_cut });
        }
        if n_knots < 1 {
            return Err(SplineError::TooFewKnots);
        }
        let dx = (r_cut - r_min) / n_knots as f64;
        if !(dx.is_finite() && dx > 0.0) {
            return Err(SplineError::InvalidSpacing(dx));
        }
        // endpoints are pinned so that knots[0] == Rmin and knots[n] == Rcut exactly
        let knots = DVector::from_fn(n_knots + 1, |i, _| match i {
            0 => r_min,
            i if i == n_knots => r_cut,
            i => r_min + i as f64 * dx,
        });
        Ok(Self {
            r_min,
            r_cut,
            n_knots,
            dx,
            knots,
        })
    }

    /// Inner cutoff, Rmin
    pub const fn r_min(&self) -> f64 {
        self.r_min
    }

    /// Outer cutoff, Rcut
    pub const fn r_cut(&self) -> f64 {
        self.r_cut
    }

    /// Number of segments
    pub const fn n_knots(&self) -> usize {
        self.n_knots
    }

    /// Segment width, `(Rcut - Rmin) / Nknots`
    pub const fn dx(&self) -> f64 {
        self.dx
    }

    /// Number of knots and hence of curvature unknowns, `Nknots + 1`
    pub const fn cols(&self) -> usize {
        self.n_knots + 1
    }

    /// Knot positions
    pub const fn knots(&self) -> &DVector {
        &self.knots
    }

    /// True if `r` lies in the closed interval `[Rmin, Rcut]`
    pub fn contains(&self, r: f64) -> bool {
        r >= self.r_min && r <= self.r_cut
    }

    /// Bounds of segment `index` (one-based), i.e. `(knots[index - 1], knots[index])`
    pub fn interval(&self, index: usize) -> Option<(f64, f64)> {
        if (1..=self.n_knots).contains(&index) {
            Some((self.knots[index - 1], self.knots[index]))
        } else {
            None
        }
    }

    /// One-based index of the segment holding `r`, identified by its right knot.
    ///
    /// Points on an interior knot belong to the segment to the left of it; `Rmin`
    /// itself belongs to segment 1.
    pub fn segment_index(&self, r: f64) -> Result<usize> {
        // negated comparison also rejects NaN
        if !(r >= self.r_min) {
            return Err(SplineError::BelowInnerCutoff {
                r,
                r_min: self.r_min,
            });
        }
        let t = (r - self.r_min) / self.dx;
        let nearest = t.round();
        let index = if (t - nearest).abs() <= SNAP_TOLERANCE {
            nearest
        } else {
            t.ceil()
        };
        let index = (index as usize).max(1);
        if index > self.n_knots {
            return Err(SplineError::SegmentOutOfRange {
                r,
                index,
                segments: self.n_knots,
            });
        }
        Ok(index)
    }

    /// Segment index together with the offset `r - knots[index]` from its right knot
    pub fn locate(&self, r: f64) -> Result<(usize, f64)> {
        let index = self.segment_index(r)?;
        Ok((index, r - self.knots[index]))
    }
}
