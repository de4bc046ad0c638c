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

//! Design matrix mapping knot curvatures onto configuration energies.
//!
//! Each configuration contributes one row `v[k]` such that `v[k] · θ` is the
//! sum of the pair potential over all of its distances inside `[Rmin, Rcut]`.

use super::{spline_construction, CurvatureBasis};
use crate::twobody::DistanceTable;
use crate::{DMatrix, Grid, Result, SplineError};
use nalgebra::RowDVector;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How design matrix rows are distributed over threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum Threading {
    /// One configuration per rayon task
    #[default]
    Rayon,
    /// Everything runs on the calling thread
    Serial,
}

/// Fail unless `basis` was built for the knots of `grid`
fn check_basis(basis: &CurvatureBasis, grid: &Grid) -> Result<()> {
    if basis.cols() != grid.cols() {
        return Err(SplineError::BasisColumns {
            basis_cols: basis.cols(),
            grid_cols: grid.cols(),
        });
    }
    if (basis.dx() - grid.dx()).abs() > 1e-12 * grid.dx() {
        return Err(SplineError::SpacingMismatch {
            basis_dx: basis.dx(),
            grid_dx: grid.dx(),
        });
    }
    Ok(())
}

/// Design row of one configuration: the sum of [`CurvatureBasis::contribution`]
/// over every distance in `[Rmin, Rcut]`. Distances outside the window, and
/// padding such as NaN, are skipped.
pub fn distance_row<I>(basis: &CurvatureBasis, grid: &Grid, distances: I) -> Result<RowDVector<f64>>
where
    I: IntoIterator<Item = f64>,
{
    check_basis(basis, grid)?;
    distances
        .into_iter()
        .filter(|r| grid.contains(*r))
        .try_fold(RowDVector::zeros(grid.cols()), |sum, r| {
            let (index, delta) = grid.locate(r)?;
            log::trace!(
                "distance r = {r}\tindex = {index}\tknot = {}",
                grid.knots()[index]
            );
            Ok(sum + basis.contribution(index, delta))
        })
}

/// Design matrix of the first `size` configurations using a prebuilt basis
pub fn energy_model_with_basis(
    basis: &CurvatureBasis,
    grid: &Grid,
    distances: &DistanceTable,
    size: usize,
    threading: Threading,
) -> Result<DMatrix> {
    check_basis(basis, grid)?;
    if size > distances.n_configs() {
        return Err(SplineError::TooManyConfigs {
            requested: size,
            available: distances.n_configs(),
        });
    }
    log::debug!("number of configurations for v matrix: {size}");
    log::debug!("spline interval: {}", grid.knots().transpose());

    let row = |k: usize| distance_row(basis, grid, distances.config(k).iter().copied());
    let rows = match threading {
        Threading::Rayon => (0..size)
            .into_par_iter()
            .map(row)
            .collect::<Result<Vec<_>>>()?,
        Threading::Serial => (0..size).map(row).collect::<Result<Vec<_>>>()?,
    };

    let v = if rows.is_empty() {
        DMatrix::zeros(0, grid.cols())
    } else {
        DMatrix::from_rows(&rows)
    };
    log::trace!("v matrix: {v}");
    Ok(v)
}

/// Build the `(size, cols)` design matrix for a pair type.
///
/// The basis is constructed from the grid before accumulating rows.
///
/// # Examples
/// ~~~
/// use ccs::Grid;
/// use ccs::spline::{spline_energy_model, Threading};
/// use ccs::twobody::DistanceTable;
///
/// let grid = Grid::new(2.0, 6.0, 4).unwrap();
/// let distances = DistanceTable::from(vec![vec![3.5], vec![], vec![1.0, 7.0]]);
/// let v = spline_energy_model(&grid, &distances, 3, Threading::Serial).unwrap();
/// assert_eq!(v.shape(), (3, 5));
/// assert_eq!(v.row(1).sum(), 0.0);
/// assert_eq!(v.row(2).sum(), 0.0);
/// ~~~
pub fn spline_energy_model(
    grid: &Grid,
    distances: &DistanceTable,
    size: usize,
    threading: Threading,
) -> Result<DMatrix> {
    let basis = spline_construction(grid.cols() - 1, grid.cols(), grid.dx())?;
    log::debug!("A matrix: {}", basis.a);
    energy_model_with_basis(&basis, grid, distances, size, threading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DVector;
    use approx::assert_relative_eq;

    fn setup() -> (Grid, CurvatureBasis) {
        let grid = Grid::new(2.0, 6.0, 4).unwrap();
        let basis = spline_construction(4, 5, grid.dx()).unwrap();
        (grid, basis)
    }

    #[test]
    fn test_single_distance() {
        let (grid, basis) = setup();
        let row = distance_row(&basis, &grid, [3.5]).unwrap();
        let expected = basis.a.row(1).clone_owned() + basis.b.row(1) * -0.5 + basis.c.row(1) * 0.125
            - basis.d.row(1) * (0.125 / 6.0);
        assert_relative_eq!(row, expected, epsilon = 1e-14);
        let expected = [0.0, 1.0 / 48.0, 25.0 / 48.0, 1.5, 13.0 / 12.0];
        for (value, expected) in row.iter().zip(expected) {
            assert_relative_eq!(*value, expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_empty_configuration() {
        let (grid, basis) = setup();
        let row = distance_row(&basis, &grid, Vec::new()).unwrap();
        assert_eq!(row, RowDVector::zeros(5));
        let row = distance_row(&basis, &grid, [1.0, 6.5, f64::NAN]).unwrap();
        assert_eq!(row, RowDVector::zeros(5));
    }

    #[test]
    fn test_additivity() {
        let (grid, basis) = setup();
        let r1 = distance_row(&basis, &grid, [2.7]).unwrap();
        let r2 = distance_row(&basis, &grid, [5.1]).unwrap();
        let both = distance_row(&basis, &grid, [2.7, 5.1]).unwrap();
        assert_relative_eq!(both, r1 + r2, epsilon = 1e-14);
    }

    #[test]
    fn test_boundaries_are_counted() {
        let (grid, basis) = setup();
        let at_rmin = distance_row(&basis, &grid, [2.0]).unwrap();
        assert!(at_rmin.iter().any(|x| *x != 0.0));
        assert_relative_eq!(at_rmin, basis.contribution(1, -1.0));

        // the spline vanishes at the outer cutoff, but the distance is still accepted
        let at_rcut = distance_row(&basis, &grid, [6.0]).unwrap();
        assert_eq!(at_rcut, RowDVector::zeros(5));

        // constant curvature of two is (r - Rcut)², so both ends count
        let theta = DVector::from_element(5, 2.0);
        let both = distance_row(&basis, &grid, [2.0, 6.0, 4.5]).unwrap();
        assert_relative_eq!((both * &theta)[0], 16.0 + 0.0 + 2.25, epsilon = 1e-12);
    }

    #[test]
    fn test_reproduces_cubic() {
        let grid = Grid::new(1.0, 3.0, 8).unwrap();
        let basis = spline_construction(8, 9, grid.dx()).unwrap();
        let theta = grid.knots().map(|x| 6.0 * (3.0 - x));
        for r in [1.0, 1.3, 1.75, 2.01, 2.99, 3.0] {
            let row = distance_row(&basis, &grid, [r]).unwrap();
            assert_relative_eq!((row * &theta)[0], (3.0 - r).powi(3), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_energy_model() {
        let grid = Grid::new(2.0, 6.0, 4).unwrap();
        let distances = DistanceTable::from(vec![
            vec![3.5],
            vec![2.0, 3.0, 4.5, 6.0, 6.1],
            vec![],
            vec![1.5, 9.0],
        ]);
        let v = spline_energy_model(&grid, &distances, 4, Threading::Rayon).unwrap();
        let serial = spline_energy_model(&grid, &distances, 4, Threading::Serial).unwrap();
        assert_eq!(v, serial);
        assert_eq!(v.shape(), (4, 5));
        assert_relative_eq!(v[(0, 4)], 13.0 / 12.0, epsilon = 1e-14);
        assert_eq!(v.row(2).sum(), 0.0);
        assert_eq!(v.row(3).sum(), 0.0);

        let theta = DVector::from_element(5, 2.0);
        let energies = &v * &theta;
        assert_relative_eq!(energies[1], 16.0 + 9.0 + 2.25, epsilon = 1e-12);

        // only the first configurations are used
        let v = spline_energy_model(&grid, &distances, 2, Threading::Serial).unwrap();
        assert_eq!(v.nrows(), 2);
        let v = spline_energy_model(&grid, &distances, 0, Threading::Serial).unwrap();
        assert_eq!(v.shape(), (0, 5));
    }

    #[test]
    fn test_mismatched_basis() {
        let grid = Grid::new(2.0, 6.0, 4).unwrap();
        let distances = DistanceTable::from(vec![vec![3.5]]);

        let halved = spline_construction(4, 5, 0.5).unwrap();
        assert_eq!(
            distance_row(&halved, &grid, [3.5]).unwrap_err(),
            SplineError::SpacingMismatch {
                basis_dx: 0.5,
                grid_dx: 1.0
            }
        );
        let result = energy_model_with_basis(&halved, &grid, &distances, 1, Threading::Serial);
        assert_eq!(result.unwrap_err().kind(), crate::ErrorKind::Configuration);
        // also without any rows to build
        let result = energy_model_with_basis(&halved, &grid, &distances, 0, Threading::Serial);
        assert!(matches!(result, Err(SplineError::SpacingMismatch { .. })));

        let narrow = spline_construction(4, 5, 1.0).unwrap();
        let wide = Grid::new(2.0, 8.0, 6).unwrap();
        let err = distance_row(&narrow, &wide, [3.5]).unwrap_err();
        assert_eq!(
            err,
            SplineError::BasisColumns {
                basis_cols: 5,
                grid_cols: 7
            }
        );
    }

    #[test]
    fn test_too_many_configs() {
        let grid = Grid::new(2.0, 6.0, 4).unwrap();
        let distances = DistanceTable::from(vec![vec![3.5]]);
        assert_eq!(
            spline_energy_model(&grid, &distances, 2, Threading::Serial),
            Err(SplineError::TooManyConfigs {
                requested: 2,
                available: 1
            })
        );
    }
}
