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

//! ## Twobody interactions
//!
//! Pair potentials between two atom types, their training distances and
//! the energy design matrix they give rise to.

use std::fmt::Debug;

mod distances;
mod pair;
pub use self::distances::DistanceTable;
pub use self::pair::{Twobody, TwobodyParams};
pub use crate::spline::Threading;

/// Potential energy between a pair of isotropic particles, 𝑈(𝑟)
pub trait IsotropicTwobodyEnergy: Debug {
    /// Interaction energy between a pair of isotropic particles.
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64;

    /// Force magnitude due to an isotropic interaction potential, 𝐹(𝑟) = -d𝑈/d𝑟
    ///
    /// The default implementation uses a central difference to calculate the force
    /// and should be overridden with the exact analytical expression for better speed
    /// and accuracy.
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        const EPS: f64 = 1e-6;
        let r = distance_squared.sqrt();
        let delta_u = self.isotropic_twobody_energy((r + EPS).powi(2))
            - self.isotropic_twobody_energy((r - EPS).powi(2));
        -delta_u / (2.0 * EPS)
    }
}

#[test]
pub fn test_default_force() {
    use approx::assert_relative_eq;
    use crate::{spline::CurvatureSpline, Grid};

    /// Delegates only the energy so the central difference is used
    #[derive(Debug)]
    struct EnergyOnly(CurvatureSpline);
    impl IsotropicTwobodyEnergy for EnergyOnly {
        fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
            self.0.isotropic_twobody_energy(distance_squared)
        }
    }

    let grid = Grid::new(1.0, 4.0, 6).unwrap();
    let theta = grid.knots().map(|x| 6.0 * (4.0 - x));
    let spline = CurvatureSpline::from_curvatures(grid, &theta).unwrap();
    let r: f64 = 2.3;
    let exact = spline.isotropic_twobody_force(r * r);
    assert_relative_eq!(exact, 3.0 * (4.0 - r).powi(2), epsilon = 1e-10);
    let numeric = EnergyOnly(spline).isotropic_twobody_force(r * r);
    assert_relative_eq!(numeric, exact, epsilon = 1e-6);
}
