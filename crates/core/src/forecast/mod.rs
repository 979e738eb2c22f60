pub mod patterns;

use crate::domain::possibility::Possibility;
use crate::domain::week::SLOTS_PER_WEEK;

pub use patterns::PatternForecaster;

/// Turns a week's partial observations into candidate full-week patterns.
///
/// `slots` uses `NaN` for unknown observations. The meaning of `first_buy`
/// belongs to the implementation.
pub trait Forecaster {
    fn name(&self) -> &'static str;

    fn analyze(&self, slots: &[f64; SLOTS_PER_WEEK], first_buy: bool) -> Vec<Possibility>;
}
