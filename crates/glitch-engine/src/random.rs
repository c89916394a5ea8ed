//! Random draws used by the glitch scan.

use rand::Rng;

/// Source of the three kinds of draws the glitch scan needs.
///
/// Implemented for every [`rand::Rng`]; tests can supply scripted sources.
pub trait RandomSource {
    /// Uniform integer in `[low, high]`. Callers guarantee `low <= high`.
    fn int_in(&mut self, low: i64, high: i64) -> i64;

    /// Uniform float in `[low, high]`. Callers guarantee `low <= high`.
    fn float_in(&mut self, low: f64, high: f64) -> f64;

    /// `true` with probability `p`. Always consumes exactly one draw.
    fn chance(&mut self, p: f64) -> bool;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn int_in(&mut self, low: i64, high: i64) -> i64 {
        self.gen_range(low..=high)
    }

    fn float_in(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..=high)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.r#gen::<f64>() < p
    }
}
