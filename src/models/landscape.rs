use crate::models::Evaluator;
use serde::{Deserialize, Serialize};

/// The bundled multimodal fitness landscape:
/// `sin²(ω·x) · sin²(ω·y) · e^((x + y) / σ)`.
///
/// A grid of sine peaks whose amplitude grows exponentially toward the upper
/// right of the domain. Non-negative everywhere, so the elimination step is
/// never exercised by this landscape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SinePeaks {
    omega: f64,
    sigma: f64,
}

impl SinePeaks {
    pub fn new(omega: f64, sigma: f64) -> Self {
        Self { omega, sigma }
    }
}

impl Default for SinePeaks {
    /// Gentle variant: ω = 2, σ = 10.
    fn default() -> Self {
        Self {
            omega: 2.0,
            sigma: 10.0,
        }
    }
}

impl Evaluator for SinePeaks {
    fn fitness(&self, x: f64, y: f64) -> f64 {
        let ridges_x = (self.omega * x).sin().powi(2);
        let ridges_y = (self.omega * y).sin().powi(2);
        let growth = ((x + y) / self.sigma).exp();
        ridges_x * ridges_y * growth
    }
}
