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

//! Fit quality of predicted versus reference energies.

use crate::{DVector, Result, SplineError};
use itertools::izip;
use std::fmt::{self, Display};
use std::io::Write;

/// Format `x` in scientific notation with a signed, at least two digit exponent,
/// e.g. `1.50000000E-03`, as C's `%E` does.
pub(crate) fn scientific(x: f64, precision: usize) -> String {
    let formatted = format!("{:.*E}", precision, x);
    let Some((mantissa, exponent)) = formatted.split_once('E') else {
        return formatted; // NaN and infinities
    };
    match exponent.parse::<i32>() {
        Ok(e) => format!(
            "{mantissa}E{}{:02}",
            if e < 0 { '-' } else { '+' },
            e.unsigned_abs()
        ),
        Err(_) => formatted,
    }
}

/// Reference and predicted energies of all configurations.
///
/// # Examples
/// ~~~
/// use ccs::{DVector, report::ErrorReport};
/// let reference = DVector::from_vec(vec![1.0, 2.0]);
/// let predicted = DVector::from_vec(vec![1.5, 2.0]);
/// let report = ErrorReport::new(reference, predicted).unwrap();
/// assert_eq!(report.mse(), 0.125);
/// assert_eq!(report.max_error(), 0.5);
/// ~~~
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    reference: DVector,
    predicted: DVector,
}

impl ErrorReport {
    pub fn new(reference: DVector, predicted: DVector) -> Result<Self> {
        if reference.len() != predicted.len() {
            return Err(SplineError::LengthMismatch {
                expected: reference.len(),
                found: predicted.len(),
            });
        }
        Ok(Self {
            reference,
            predicted,
        })
    }

    pub const fn reference(&self) -> &DVector {
        &self.reference
    }

    pub const fn predicted(&self) -> &DVector {
        &self.predicted
    }

    /// Absolute error per configuration
    pub fn errors(&self) -> DVector {
        (&self.reference - &self.predicted).abs()
    }

    /// Mean squared error; zero for no configurations
    pub fn mse(&self) -> f64 {
        if self.reference.is_empty() {
            return 0.0;
        }
        (&self.reference - &self.predicted).norm_squared() / self.reference.len() as f64
    }

    /// Largest absolute error; zero for no configurations
    pub fn max_error(&self) -> f64 {
        self.errors().iter().copied().fold(0.0, f64::max)
    }

    /// Write the error table followed by MSE and maximum error
    pub fn write<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        write!(writer, "{}", self)?;
        Ok(())
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {:<15}{:<15}{:<15}", "Reference", "Predicted", "Error")?;
        for (reference, predicted, error) in
            izip!(&self.reference, &self.predicted, &self.errors())
        {
            writeln!(f, "{:<15.5} {:<15.5} {:<15.5}", reference, predicted, error)?;
        }
        writeln!(f, "# MSE = {}", scientific(self.mse(), 5))?;
        writeln!(f, "# Maxerror = {}", scientific(self.max_error(), 5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scientific() {
        assert_eq!(scientific(0.0, 8), "0.00000000E+00");
        assert_eq!(scientific(1234.0, 3), "1.234E+03");
        assert_eq!(scientific(-0.00015, 5), "-1.50000E-04");
        assert_eq!(scientific(2.5e-120, 2), "2.50E-120");
        assert_eq!(scientific(f64::NAN, 2), "NaN");
        assert_eq!(scientific(f64::INFINITY, 2), "inf");
    }

    #[test]
    fn test_report() {
        let reference = DVector::from_vec(vec![-1.0, 0.5, 2.0]);
        let predicted = DVector::from_vec(vec![-1.25, 0.5, 1.5]);
        let report = ErrorReport::new(reference, predicted).unwrap();
        assert_eq!(report.errors().as_slice(), &[0.25, 0.0, 0.5]);
        assert_eq!(report.mse(), (0.0625 + 0.25) / 3.0);
        assert_eq!(report.max_error(), 0.5);

        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].trim_end(), "# Reference      Predicted      Error");
        assert_eq!(lines[1], "-1.00000        -1.25000        0.25000        ");
        assert_eq!(lines[4], "# MSE = 1.04167E-01");
        assert_eq!(lines[5], "# Maxerror = 5.00000E-01");

        let mut buffer = Vec::new();
        report.write(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), text);
    }

    #[test]
    fn test_mismatch() {
        let result = ErrorReport::new(DVector::zeros(2), DVector::zeros(3));
        assert_eq!(
            result,
            Err(SplineError::LengthMismatch {
                expected: 2,
                found: 3
            })
        );
        let empty = ErrorReport::new(DVector::zeros(0), DVector::zeros(0)).unwrap();
        assert_eq!(empty.mse(), 0.0);
        assert_eq!(empty.max_error(), 0.0);
    }
}
