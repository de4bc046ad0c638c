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

//! # CCS
//!
//! Curvature constrained splines for two-body potentials.
//!
//! A pair potential on `[Rmin, Rcut]` is represented as a piecewise cubic whose
//! only free parameters are the curvatures (second derivatives) at the knots.
//! The spline and its slope vanish at `Rcut`, so for every configuration the
//! total pairwise energy is a *linear* function of the curvature vector θ.
//! This crate builds that linear map (the design matrix), and evaluates the
//! spline once θ has been fitted by an external solver.
//!
//! ```
//! use ccs::twobody::{DistanceTable, Twobody};
//! use nalgebra::DVector;
//!
//! let distances = DistanceTable::from(vec![vec![3.5], vec![2.5, 4.5]]);
//! let pair = Twobody::new("Li-Li", distances, 2, 6.0, 4, 2.0, None).unwrap();
//! assert_eq!(pair.v().shape(), (2, 5));
//!
//! // constant curvature of two gives the potential (r - Rcut)²
//! let theta = DVector::from_element(pair.cols(), 2.0);
//! let energies = pair.predict(&theta).unwrap();
//! approx::assert_relative_eq!(energies[0], 2.5 * 2.5, epsilon = 1e-12);
//! ```

#[cfg(test)]
extern crate approx;

/// Dynamically sized column vector
pub type DVector = nalgebra::DVector<f64>;
/// Dynamically sized matrix
pub type DMatrix = nalgebra::DMatrix<f64>;

mod error;
pub mod grid;
pub mod report;
pub mod spline;
pub mod twobody;

pub use error::{ErrorKind, Result, SplineError};
pub use grid::Grid;

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;

    /// Lower cutoff distance below which the model is undefined
    fn lower_cutoff(&self) -> f64 {
        0.0
    }
}
