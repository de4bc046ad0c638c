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

//! ## Curvature constrained splines
//!
//! - [`spline_construction`] builds the operators taking knot curvatures to segment coefficients.
//! - [`spline_energy_model`] turns pair distances into rows of the energy design matrix.
//! - [`spline_eval012`] evaluates a fitted spline with its first two derivatives.

mod basis;
mod energy;
mod eval;
mod fitted;

pub use self::basis::{spline_construction, CurvatureBasis};
pub use self::energy::{distance_row, energy_model_with_basis, spline_energy_model, Threading};
pub use self::eval::{spline_eval012, SplineCoefficients, SplineValue};
pub use self::fitted::CurvatureSpline;
