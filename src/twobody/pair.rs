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

//! Pair potential between two atom types.

use super::DistanceTable;
use crate::spline::{
    energy_model_with_basis, spline_construction, CurvatureBasis, CurvatureSpline, Threading,
};
use crate::{Cutoff, DMatrix, DVector, Grid, Result, SplineError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cutoffs and knot count of a pair potential.
///
/// # Examples
/// ~~~
/// use ccs::twobody::{Threading, TwobodyParams};
/// let params = TwobodyParams::new(6.0, 20)
///     .with_r_min(2.0)
///     .with_threading(Threading::Serial);
/// assert_eq!(params.r_min, Some(2.0));
/// assert_eq!(params.n_switch, None);
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct TwobodyParams {
    /// Outer cutoff, Rcut
    #[cfg_attr(feature = "serde", serde(rename = "Rcut"))]
    pub r_cut: f64,
    /// Inner cutoff, Rmin. Taken from the shortest distance if absent.
    #[cfg_attr(feature = "serde", serde(rename = "Rmin", default))]
    pub r_min: Option<f64>,
    /// Number of spline segments
    #[cfg_attr(feature = "serde", serde(rename = "Nknots"))]
    pub n_knots: usize,
    /// Switching knot; carried along for the fitting stage
    #[cfg_attr(feature = "serde", serde(rename = "Nswitch", default))]
    pub n_switch: Option<usize>,
    /// Parallelization of the design matrix
    #[cfg_attr(feature = "serde", serde(default))]
    pub threading: Threading,
}

impl TwobodyParams {
    pub const fn new(r_cut: f64, n_knots: usize) -> Self {
        Self {
            r_cut,
            r_min: None,
            n_knots,
            n_switch: None,
            threading: Threading::Rayon,
        }
    }

    /// Set the inner cutoff explicitly
    pub fn with_r_min(mut self, r_min: f64) -> Self {
        self.r_min = Some(r_min);
        self
    }

    /// Set the switching knot
    pub fn with_switch(mut self, n_switch: usize) -> Self {
        self.n_switch = Some(n_switch);
        self
    }

    pub fn with_threading(mut self, threading: Threading) -> Self {
        self.threading = threading;
        self
    }
}

/// Curvature constrained spline model of one atom-type pair.
///
/// All derived quantities (grid, basis and the `(Nconfigs, cols)` design
/// matrix `v`) are computed on construction and never change. A different
/// cutoff or knot count requires a new instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Twobody {
    name: String,
    n_switch: Option<usize>,
    n_configs: usize,
    distances: DistanceTable,
    grid: Grid,
    basis: CurvatureBasis,
    v: DMatrix,
}

impl Twobody {
    /// Build the pair model from `n_configs` configurations of `distances`.
    ///
    /// Fails with a configuration error unless `0 < r_min < r_cut`, `n_knots >= 1`
    /// and the table holds at least `n_configs` configurations.
    pub fn new(
        name: impl Into<String>,
        distances: DistanceTable,
        n_configs: usize,
        r_cut: f64,
        n_knots: usize,
        r_min: f64,
        n_switch: Option<usize>,
    ) -> Result<Self> {
        Self::build(
            name.into(),
            distances,
            n_configs,
            Grid::new(r_min, r_cut, n_knots)?,
            n_switch,
            Threading::default(),
        )
    }

    /// Build the pair model from parameters; a missing inner cutoff is set to the
    /// shortest positive distance of the used configurations.
    pub fn from_params(
        name: impl Into<String>,
        distances: DistanceTable,
        n_configs: usize,
        params: &TwobodyParams,
    ) -> Result<Self> {
        let name = name.into();
        let r_min = match params.r_min {
            Some(r_min) => r_min,
            None => {
                let r_min = distances
                    .min_distance(n_configs)
                    .ok_or(SplineError::NoDistances)?;
                log::info!("{name}: inner cutoff taken from shortest distance, Rmin = {r_min}");
                r_min
            }
        };
        let grid = Grid::new(r_min, params.r_cut, params.n_knots)?;
        Self::build(
            name,
            distances,
            n_configs,
            grid,
            params.n_switch,
            params.threading,
        )
    }

    fn build(
        name: String,
        distances: DistanceTable,
        n_configs: usize,
        grid: Grid,
        n_switch: Option<usize>,
        threading: Threading,
    ) -> Result<Self> {
        let basis = spline_construction(grid.n_knots(), grid.cols(), grid.dx())?;
        let v = energy_model_with_basis(&basis, &grid, &distances, n_configs, threading)?;
        log::debug!(
            "{name}: {} knots on [{}, {}], v matrix {}x{}",
            grid.cols(),
            grid.r_min(),
            grid.r_cut(),
            v.nrows(),
            v.ncols()
        );
        Ok(Self {
            name,
            n_switch,
            n_configs,
            distances,
            grid,
            basis,
            v,
        })
    }

    /// Name of the atom pair, e.g. `Li-Li`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn r_cut(&self) -> f64 {
        self.grid.r_cut()
    }

    pub const fn r_min(&self) -> f64 {
        self.grid.r_min()
    }

    pub const fn n_knots(&self) -> usize {
        self.grid.n_knots()
    }

    pub const fn n_switch(&self) -> Option<usize> {
        self.n_switch
    }

    pub const fn n_configs(&self) -> usize {
        self.n_configs
    }

    pub const fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub const fn dx(&self) -> f64 {
        self.grid.dx()
    }

    /// Number of curvature unknowns
    pub const fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Knot positions from Rmin to Rcut
    pub const fn interval(&self) -> &DVector {
        self.grid.knots()
    }

    pub const fn basis(&self) -> &CurvatureBasis {
        &self.basis
    }

    /// Energy design matrix, one row per configuration
    pub const fn v(&self) -> &DMatrix {
        &self.v
    }

    /// Pairwise energy of every configuration for fitted curvatures, `v θ`
    pub fn predict(&self, curvatures: &DVector) -> Result<DVector> {
        if curvatures.len() != self.cols() {
            return Err(SplineError::CurvatureLength {
                expected: self.cols(),
                found: curvatures.len(),
            });
        }
        Ok(&self.v * curvatures)
    }

    /// Spline defined by fitted curvatures
    pub fn spline(&self, curvatures: &DVector) -> Result<CurvatureSpline> {
        CurvatureSpline::with_basis(self.grid.clone(), &self.basis, curvatures)
    }
}

impl Cutoff for Twobody {
    fn cutoff(&self) -> f64 {
        self.r_cut()
    }
    fn lower_cutoff(&self) -> f64 {
        self.r_min()
    }
}
