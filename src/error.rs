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

//! Errors raised while building or evaluating splines.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T, E = SplineError> = std::result::Result<T, E>;

/// Broad classification of a [`SplineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid cutoffs, knot counts, spacings or array shapes. Raised at construction.
    Configuration,
    /// A distance or query point that the spline does not cover.
    Domain,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    #[error("invalid cutoffs: need 0 < Rmin < Rcut, got Rmin = {r_min} and Rcut = {r_cut}")]
    InvalidCutoff { r_min: f64, r_cut: f64 },

    #[error("number of knots must be at least 1")]
    TooFewKnots,

    #[error("grid spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),

    #[error("basis of shape {rows}x{cols}: rows must equal cols - 1 and cols must be at least 2")]
    DimensionMismatch { rows: usize, cols: usize },

    #[error("basis has {basis_cols} curvature columns but the grid has {grid_cols} knots")]
    BasisColumns { basis_cols: usize, grid_cols: usize },

    #[error("basis built for spacing {basis_dx} used with a grid of spacing {grid_dx}")]
    SpacingMismatch { basis_dx: f64, grid_dx: f64 },

    #[error("{requested} configurations requested but the distance table holds {available}")]
    TooManyConfigs { requested: usize, available: usize },

    #[error("no positive distance available to derive the inner cutoff from")]
    NoDistances,

    #[error("expected {expected} curvature values, got {found}")]
    CurvatureLength { expected: usize, found: usize },

    #[error("length mismatch: expected {expected} values, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("r = {r} is below the inner cutoff Rmin = {r_min}")]
    BelowInnerCutoff { r: f64, r_min: f64 },

    #[error("r = {r} resolves to segment {index}, outside 1..={segments}")]
    SegmentOutOfRange {
        r: f64,
        index: usize,
        segments: usize,
    },
}

impl SplineError {
    /// Classify the error as a configuration or a domain error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BelowInnerCutoff { .. } | Self::SegmentOutOfRange { .. } => ErrorKind::Domain,
            _ => ErrorKind::Configuration,
        }
    }

    /// True for errors caused by the query point rather than the setup
    pub const fn is_domain_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Domain)
    }
}

#[test]
fn test_error_kind() {
    let err = SplineError::BelowInnerCutoff { r: 1.0, r_min: 2.0 };
    assert!(err.is_domain_error());
    assert_eq!(
        err.to_string(),
        "r = 1 is below the inner cutoff Rmin = 2"
    );
    let err = SplineError::SegmentOutOfRange {
        r: 7.0,
        index: 5,
        segments: 4,
    };
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(SplineError::TooFewKnots.kind(), ErrorKind::Configuration);
    assert!(!SplineError::InvalidSpacing(0.0).is_domain_error());
    let err = SplineError::BasisColumns {
        basis_cols: 5,
        grid_cols: 7,
    };
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err.to_string(),
        "basis has 5 curvature columns but the grid has 7 knots"
    );
}
