//! Objective functions and the sign adapter turning any optimization
//! direction into a minimization.
use crate::errors::{RemboError, Result};

use ndarray::{Array1, ArrayBase, ArrayView1, Data, Ix2};

/// Result of a user objective evaluation
pub type ObjectiveResult = std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>>;

/// A black-box function of the original domain
pub trait ObjectiveFn {
    /// Name used to label reports
    fn name(&self) -> &str {
        "objective"
    }

    /// Evaluate the function at `x`, a point of the original domain
    fn eval(&self, x: &ArrayView1<f64>) -> ObjectiveResult;
}

impl<F> ObjectiveFn for F
where
    F: Fn(&ArrayView1<f64>) -> f64,
{
    fn eval(&self, x: &ArrayView1<f64>) -> ObjectiveResult {
        Ok(self(x))
    }
}

/// A closure along with a name used to label reports
pub struct NamedObjective<F> {
    name: String,
    f: F,
}

impl<F: Fn(&ArrayView1<f64>) -> f64> NamedObjective<F> {
    /// Constructor
    pub fn new(name: &str, f: F) -> Self {
        NamedObjective {
            name: name.to_string(),
            f,
        }
    }
}

impl<F: Fn(&ArrayView1<f64>) -> f64> ObjectiveFn for NamedObjective<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, x: &ArrayView1<f64>) -> ObjectiveResult {
        Ok((self.f)(x))
    }
}

/// Minimization oriented view of a user objective: values are negated
/// when the user asked for a maximization.
pub struct SignedObjective<O: ObjectiveFn> {
    raw: O,
    maximize: bool,
}

impl<O: ObjectiveFn> SignedObjective<O> {
    /// Wrap the objective once for all
    pub fn wrap(raw: O, maximize: bool) -> Self {
        SignedObjective { raw, maximize }
    }

    fn sign(&self) -> f64 {
        if self.maximize {
            -1.
        } else {
            1.
        }
    }

    /// Whether the user objective is maximized
    pub fn maximize(&self) -> bool {
        self.maximize
    }

    /// Name of the user objective
    pub fn name(&self) -> &str {
        self.raw.name()
    }

    /// User objective
    pub fn inner(&self) -> &O {
        &self.raw
    }

    /// Minimization oriented value at `x`
    pub fn evaluate(&self, x: &ArrayView1<f64>) -> Result<f64> {
        let y = self.raw.eval(x).map_err(RemboError::ObjectiveError)?;
        Ok(self.sign() * y)
    }

    /// Evaluate each row of `points` in turn
    pub fn evaluate_batch(&self, points: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Array1<f64>> {
        let mut y = Array1::zeros(points.nrows());
        for (i, x) in points.rows().into_iter().enumerate() {
            y[i] = self.evaluate(&x)?;
        }
        Ok(y)
    }

    /// Turn a minimization oriented value back into the user orientation
    pub fn to_caller(&self, y: f64) -> f64 {
        self.sign() * y
    }
}
