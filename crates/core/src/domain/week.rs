use crate::domain::error::TurnipError;
use crate::time::week_slots::{LogContext, SlotTarget};
use anyhow::ensure;
use serde::{Deserialize, Serialize};

pub const SLOTS_PER_WEEK: usize = 14;

/// Slot names in storage order: Sun-AM, Sun-PM, Mon-AM, ... Sat-PM.
pub const SLOT_NAMES: [&str; SLOTS_PER_WEEK] = [
    "sun_am", "sun_pm", "mon_am", "mon_pm", "tue_am", "tue_pm", "wed_am", "wed_pm", "thu_am",
    "thu_pm", "fri_am", "fri_pm", "sat_am", "sat_pm",
];

/// Price grid for one calendar week.
///
/// Unknown observations are `NaN`. Slot `i` is day `i / 2` (Sunday = 0),
/// half `i % 2` (AM = 0, PM = 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekRecord {
    pub week_key: String,
    pub slots: [f64; SLOTS_PER_WEEK],
}

impl WeekRecord {
    pub fn empty(week_key: impl Into<String>) -> Self {
        Self {
            week_key: week_key.into(),
            slots: [f64::NAN; SLOTS_PER_WEEK],
        }
    }

    pub fn known(&self, slot: usize) -> Option<f64> {
        self.slots.get(slot).copied().filter(|v| !v.is_nan())
    }

    pub fn known_count(&self) -> usize {
        self.slots.iter().filter(|v| !v.is_nan()).count()
    }

    /// Slot-by-slot equality where two sentinels compare equal.
    pub fn same_slots(&self, other: &WeekRecord) -> bool {
        self.slots
            .iter()
            .zip(other.slots.iter())
            .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

/// Largest magnitude a slot stores exactly.
pub const MAX_PRICE: i64 = 1 << 53;

/// Parses a user-supplied price. Anything but an integer within
/// `-MAX_PRICE..=MAX_PRICE` is rejected.
pub fn parse_price(raw: &str) -> anyhow::Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(price) if (-MAX_PRICE..=MAX_PRICE).contains(&price) => Ok(price),
        _ => Err(TurnipError::InvalidInput {
            raw: raw.to_string(),
        }
        .into()),
    }
}

/// Writes `price` into the slot(s) `ctx.now` falls in and returns them.
/// All other slots are left untouched.
pub fn log_price(
    record: &mut WeekRecord,
    price: i64,
    ctx: &LogContext,
) -> anyhow::Result<SlotTarget> {
    ensure!(
        record.week_key == ctx.week_key,
        "record for week {} cannot take an observation from week {}",
        record.week_key,
        ctx.week_key
    );

    let target = ctx.slot_target();
    for idx in target.indices() {
        record.slots[idx] = price as f64;
    }

    tracing::debug!(
        week_key = %record.week_key,
        slot = SLOT_NAMES[target.index],
        price,
        "price logged"
    );
    Ok(target)
}
