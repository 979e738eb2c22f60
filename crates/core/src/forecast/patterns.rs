use crate::domain::possibility::{Pattern, PriceRange, Possibility};
use crate::domain::week::SLOTS_PER_WEEK;
use crate::forecast::Forecaster;
use std::ops::RangeInclusive;

/// Sunday buy prices considered when the real one is unknown.
const BASE_PRICES: RangeInclusive<i64> = 90..=110;

// (min_rate, max_rate) pairs applied to the base price.
const HIGH_RATE: (f64, f64) = (0.9, 1.4);
const FLUCTUATING_DECREASE_START: (f64, f64) = (0.6, 0.8);
const FLUCTUATING_DECREASE_STEP: (f64, f64) = (0.10, 0.04);
const SLOW_DECREASE_START: (f64, f64) = (0.85, 0.9);
const LOW_DECREASE_START: (f64, f64) = (0.4, 0.9);
const SPIKE_DECREASE_STEP: (f64, f64) = (0.05, 0.03);
const LARGE_SPIKE_RATES: [(f64, f64); 5] = [
    (0.9, 1.4),
    (1.4, 2.0),
    (2.0, 6.0),
    (1.4, 2.0),
    (0.9, 1.4),
];
const POST_SPIKE_RATE: (f64, f64) = (0.4, 0.9);

/// Enumerates the four weekly price patterns (fluctuating, large spike,
/// decreasing, small spike) and keeps the ones consistent with every known
/// observation.
///
/// When `first_buy` is set only the small-spike pattern is generated and the
/// observed Sunday price is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternForecaster;

impl Forecaster for PatternForecaster {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn analyze(&self, slots: &[f64; SLOTS_PER_WEEK], first_buy: bool) -> Vec<Possibility> {
        let given = (*slots).map(|v| (!v.is_nan()).then_some(v.trunc() as i64));

        let bases: Vec<i64> = match given[0] {
            Some(base) if !first_buy => vec![base],
            _ => BASE_PRICES.collect(),
        };

        let mut out = Vec::new();
        for base in bases {
            if first_buy {
                small_spike(&given, base, &mut out);
            } else {
                fluctuating(&given, base, &mut out);
                large_spike(&given, base, &mut out);
                decreasing(&given, base, &mut out);
                small_spike(&given, base, &mut out);
            }
        }

        tracing::debug!(
            known = given.iter().flatten().count(),
            first_buy,
            candidates_len = out.len(),
            "pattern forecast finished"
        );
        out
    }
}

/// Accumulates per-slot ranges for one candidate, pinning each range to the
/// observed price when there is one. Every step returns `None` as soon as an
/// observation falls outside the predicted range.
struct Week<'a> {
    given: &'a [Option<i64>; SLOTS_PER_WEEK],
    base: i64,
    prices: Vec<PriceRange>,
}

impl<'a> Week<'a> {
    fn new(given: &'a [Option<i64>; SLOTS_PER_WEEK], base: i64) -> Self {
        let mut prices = Vec::with_capacity(SLOTS_PER_WEEK);
        prices.push(PriceRange::exact(base));
        prices.push(PriceRange::exact(base));
        Self {
            given,
            base,
            prices,
        }
    }

    fn scaled(&self, (min_rate, max_rate): (f64, f64)) -> PriceRange {
        let base = self.base as f64;
        PriceRange::new(
            (min_rate * base).floor() as i64,
            (max_rate * base).ceil() as i64,
        )
    }

    fn last(&self) -> PriceRange {
        self.prices[self.prices.len() - 1]
    }

    fn push(&mut self, range: PriceRange) -> Option<()> {
        if range.min > range.max {
            return None;
        }
        let slot = self.prices.len();
        let pinned = match *self.given.get(slot)? {
            Some(price) if range.contains(price) => PriceRange::exact(price),
            Some(_) => return None,
            None => range,
        };
        self.prices.push(pinned);
        Some(())
    }

    fn push_rate(&mut self, rate: (f64, f64)) -> Option<()> {
        let range = self.scaled(rate);
        self.push(range)
    }

    fn flat(&mut self, len: usize, rate: (f64, f64)) -> Option<()> {
        for _ in 0..len {
            self.push_rate(rate)?;
        }
        Some(())
    }

    fn decreasing(&mut self, len: usize, start: (f64, f64), step: (f64, f64)) -> Option<()> {
        let (mut min_rate, mut max_rate) = start;
        for _ in 0..len {
            self.push_rate((min_rate, max_rate))?;
            min_rate -= step.0;
            max_rate -= step.1;
        }
        Some(())
    }

    fn finish(self, pattern: Pattern) -> Option<Possibility> {
        let prices: [PriceRange; SLOTS_PER_WEEK] = self.prices.try_into().ok()?;
        Some(Possibility::from_prices(pattern, prices))
    }
}

fn fluctuating(given: &[Option<i64>; SLOTS_PER_WEEK], base: i64, out: &mut Vec<Possibility>) {
    for dec_1 in 2..=3 {
        for high_1 in 0..=6 {
            for high_3 in 0..(7 - high_1) {
                let high_2 = 7 - high_1 - high_3;
                let dec_2 = 5 - dec_1;
                out.extend(fluctuating_with_lengths(
                    given,
                    base,
                    [high_1, dec_1, high_2, dec_2, high_3],
                ));
            }
        }
    }
}

fn fluctuating_with_lengths(
    given: &[Option<i64>; SLOTS_PER_WEEK],
    base: i64,
    [high_1, dec_1, high_2, dec_2, high_3]: [usize; 5],
) -> Option<Possibility> {
    let mut week = Week::new(given, base);
    week.flat(high_1, HIGH_RATE)?;
    week.decreasing(dec_1, FLUCTUATING_DECREASE_START, FLUCTUATING_DECREASE_STEP)?;
    week.flat(high_2, HIGH_RATE)?;
    week.decreasing(dec_2, FLUCTUATING_DECREASE_START, FLUCTUATING_DECREASE_STEP)?;
    week.flat(high_3, HIGH_RATE)?;
    week.finish(Pattern::Fluctuating)
}

fn large_spike(given: &[Option<i64>; SLOTS_PER_WEEK], base: i64, out: &mut Vec<Possibility>) {
    for peak_start in 3..=9 {
        out.extend(large_spike_with_peak(given, base, peak_start));
    }
}

fn large_spike_with_peak(
    given: &[Option<i64>; SLOTS_PER_WEEK],
    base: i64,
    peak_start: usize,
) -> Option<Possibility> {
    let mut week = Week::new(given, base);
    week.decreasing(peak_start - 2, SLOW_DECREASE_START, SPIKE_DECREASE_STEP)?;
    for rate in LARGE_SPIKE_RATES {
        week.push_rate(rate)?;
    }
    week.flat(SLOTS_PER_WEEK - peak_start - LARGE_SPIKE_RATES.len(), POST_SPIKE_RATE)?;
    week.finish(Pattern::LargeSpike)
}

fn decreasing(given: &[Option<i64>; SLOTS_PER_WEEK], base: i64, out: &mut Vec<Possibility>) {
    out.extend(decreasing_week(given, base));
}

fn decreasing_week(given: &[Option<i64>; SLOTS_PER_WEEK], base: i64) -> Option<Possibility> {
    let mut week = Week::new(given, base);
    week.decreasing(SLOTS_PER_WEEK - 2, SLOW_DECREASE_START, SPIKE_DECREASE_STEP)?;
    week.finish(Pattern::Decreasing)
}

fn small_spike(given: &[Option<i64>; SLOTS_PER_WEEK], base: i64, out: &mut Vec<Possibility>) {
    for peak_start in 2..=9 {
        out.extend(small_spike_with_peak(given, base, peak_start));
    }
}

fn small_spike_with_peak(
    given: &[Option<i64>; SLOTS_PER_WEEK],
    base: i64,
    peak_start: usize,
) -> Option<Possibility> {
    let mut week = Week::new(given, base);
    week.decreasing(peak_start - 2, LOW_DECREASE_START, SPIKE_DECREASE_STEP)?;
    week.flat(2, HIGH_RATE)?;

    // The three peak slots depend on each other: the middle one is at least
    // the first one's price and the last one stays below the middle one.
    let spike_low = week.scaled((1.4, 2.0));
    week.push(PriceRange::new(spike_low.min - 1, spike_low.max - 1))?;
    let first = week.last();
    week.push(PriceRange::new(first.min, spike_low.max))?;
    let middle = week.last();
    week.push(PriceRange::new(spike_low.min - 1, middle.max - 1))?;

    week.decreasing(
        SLOTS_PER_WEEK - peak_start - 5,
        LOW_DECREASE_START,
        SPIKE_DECREASE_STEP,
    )?;
    week.finish(Pattern::SmallSpike)
}
