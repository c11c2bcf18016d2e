//! Correlation models used by the kriging model.
//!
//! Both models are stationary: the correlation between two points only depends
//! on their componentwise differences `d` weighted by the hyperparameters `theta`.

use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2, Zip};
use std::fmt;

/// Available correlation models
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorrelationKind {
    /// exp( - sum_l (theta_l * d_l)^2 / 2 )
    SquaredExponential,
    /// Matérn 5/2 kernel
    #[default]
    Matern52,
}

impl CorrelationKind {
    /// Compute correlation values for the given (n, nx) differences
    /// and nx `theta` hyperparameters. Returns n correlation values.
    pub fn value(
        &self,
        d: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        theta: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Array1<f64> {
        match self {
            CorrelationKind::SquaredExponential => {
                let theta2 = theta.mapv(|v| v * v);
                let r = d.mapv(|v| v * v).dot(&theta2);
                r.mapv(|v| f64::exp(-0.5 * v))
            }
            CorrelationKind::Matern52 => {
                //   h
                // prod (1 + sqrt(5) * theta_l * |d_l| + (5/3) * theta_l^2 * d_l^2) exp( - sqrt(5) * theta_l * |d_l| )
                //  l=1
                let sqrt5 = 5f64.sqrt();
                let div5_3 = 5. / 3.;
                let mut a = Array1::ones(d.nrows());
                Zip::from(&mut a).and(d.rows()).for_each(|a_i, d_i| {
                    Zip::from(&d_i).and(theta).for_each(|d_ij, theta_j| {
                        let v = theta_j * d_ij.abs();
                        *a_i *= 1. + sqrt5 * v + div5_3 * v * v;
                    });
                });
                let b = (d.mapv(f64::abs) * theta)
                    .sum_axis(Axis(1))
                    .mapv(|v| f64::exp(-sqrt5 * v));
                a * b
            }
        }
    }
}

impl fmt::Display for CorrelationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            CorrelationKind::SquaredExponential => "SquaredExponential",
            CorrelationKind::Matern52 => "Matern52",
        };
        write!(f, "{s}")
    }
}

impl TryFrom<String> for CorrelationKind {
    type Error = &'static str;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "SquaredExponential" => Ok(CorrelationKind::SquaredExponential),
            "Matern52" => Ok(CorrelationKind::Matern52),
            _ => Err("Bad string value for CorrelationKind, should be 'SquaredExponential' or 'Matern52'"),
        }
    }
}
