//! Reward-driven bias decay.
//!
//! Maps a position's empirical success rate to the bias the walk uses there:
//!
//! ```text
//!   bias = base * exp(-a * rate^b)
//! ```
//!
//! The map is decreasing in `rate`, so a position that keeps paying out gets a small
//! bias, which every walk strategy reads as "less likely to leave". Unvisited positions
//! (`rate = 0`) sit at `base`, the maximum exploration level.

use crate::WalkError;

/// Decay a success rate into a bias value: `base * exp(-a * success_rate^b)`.
///
/// No validation is done here; use [`DecayParams::validate`] at setup time.
///
/// ```rust
/// use qwalk::decay;
///
/// assert_eq!(decay(0.0, 5.0, 6.0, 0.5), 0.5);
/// assert!(decay(0.9, 5.0, 6.0, 0.5) < decay(0.1, 5.0, 6.0, 0.5));
/// ```
#[must_use]
pub fn decay(success_rate: f64, a: f64, b: f64, base: f64) -> f64 {
    base * (-a * success_rate.powf(b)).exp()
}

/// Shape constants for [`decay`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecayParams {
    /// Decay strength (must be > 0).
    pub a: f64,
    /// Exponent on the success rate (must be > 0). Large values keep the bias flat
    /// until the rate gets close to 1.
    pub b: f64,
}

impl DecayParams {
    /// `a = 5, b = 6`: the default preset.
    pub const GENTLE: DecayParams = DecayParams { a: 5.0, b: 6.0 };

    /// `a = 9, b = 6`: pins the walker harder once a position looks good.
    pub const STEEP: DecayParams = DecayParams { a: 9.0, b: 6.0 };

    /// Apply the decay with these constants.
    #[must_use]
    pub fn apply(&self, success_rate: f64, base: f64) -> f64 {
        decay(success_rate, self.a, self.b, base)
    }

    /// Check both constants are finite and positive.
    pub fn validate(&self) -> Result<(), WalkError> {
        for (name, value) in [("a", self.a), ("b", self.b)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WalkError::InvalidDecay { name, value });
            }
        }
        Ok(())
    }
}

impl Default for DecayParams {
    fn default() -> Self {
        Self::GENTLE
    }
}
