//! Fit a curvature constrained spline to synthetic pair energies.
//!
//! Energies of random configurations are generated from a Morse-like
//! reference curve, the design matrix is built and the knot curvatures are
//! found by plain least squares. A real fit would add shape constraints.
//!
//! Run with: `RUST_LOG=debug cargo run --example fit_pair`

use ccs::report::ErrorReport;
use ccs::twobody::{DistanceTable, Twobody, TwobodyParams};
use ccs::DVector;

/// Morse-like curve shifted to vanish, with its slope, at the cutoff
fn reference(r: f64, r_cut: f64) -> f64 {
    let morse = |r: f64| (1.0 - (-1.5 * (r - 2.5)).exp()).powi(2) - 1.0;
    let h = 1e-5;
    let slope = (morse(r_cut + h) - morse(r_cut - h)) / (2.0 * h);
    morse(r) - morse(r_cut) - slope * (r - r_cut)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (r_min, r_cut) = (2.0, 6.0);
    let mut state: u64 = 88172645463325252;
    let mut uniform = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 1_000_000) as f64 / 1e6
    };

    let n_configs = 300;
    let distances: DistanceTable = (0..n_configs)
        .map(|_| (0..8).map(|_| 1.8 + 5.0 * uniform()).collect::<Vec<f64>>())
        .collect();
    let energies = DVector::from_iterator(
        n_configs,
        distances.iter().map(|config| {
            config
                .iter()
                .filter(|r| (r_min..=r_cut).contains(*r))
                .map(|r| reference(*r, r_cut))
                .sum::<f64>()
        }),
    );

    let params = TwobodyParams::new(r_cut, 16).with_r_min(r_min);
    let pair = Twobody::from_params("A-B", distances, n_configs, &params)?;

    let curvatures = pair
        .v()
        .clone()
        .svd(true, true)
        .solve(&energies, 1e-12)
        .map_err(anyhow::Error::msg)?;

    let spline = pair.spline(&curvatures)?;
    print!("{spline}");

    let report = ErrorReport::new(energies, pair.predict(&curvatures)?)?;
    println!("MSE = {:.3e}, max error = {:.3e}", report.mse(), report.max_error());

    println!("\n{:>8} {:>12} {:>12}", "r", "reference", "spline");
    for r in [2.0, 2.5, 3.0, 4.0, 5.0, 6.0] {
        println!("{:>8.2} {:>12.6} {:>12.6}", r, reference(r, r_cut), spline.energy(r)?);
    }
    Ok(())
}
