use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

// Observations made at or after this hour land in the PM slot.
const PM_START_HOUR: u32 = 12;

/// Slots written by a single observation.
///
/// Sunday has one undifferentiated price, so an observation made on Sunday
/// is mirrored into both Sunday slots (0 and 1). Every other day writes
/// exactly one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTarget {
    pub index: usize,
    pub mirror: Option<usize>,
}

impl SlotTarget {
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.index).chain(self.mirror)
    }
}

/// `day * 2 + half`, with Sunday as day 0 and AM/PM as half 0/1.
pub fn slot_index(now: NaiveDateTime) -> usize {
    let day = now.weekday().num_days_from_sunday() as usize;
    let is_pm = now.hour() >= PM_START_HOUR;
    day * 2 + usize::from(is_pm)
}

pub fn slot_target(now: NaiveDateTime) -> SlotTarget {
    let index = slot_index(now);
    let mirror = (index < 2).then_some(index ^ 1);
    SlotTarget { index, mirror }
}

/// Sunday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// `YYYY-M-D` of the week's Sunday, month zero-based and nothing zero-padded.
/// Existing record files are named with this key, so the format is fixed.
pub fn week_key(week_start: NaiveDate) -> String {
    format!(
        "{}-{}-{}",
        week_start.year(),
        week_start.month0(),
        week_start.day()
    )
}

/// Everything a single invocation derives from the wall clock, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub now: NaiveDateTime,
    pub week_start: NaiveDate,
    pub week_key: String,
}

impl LogContext {
    pub fn at(now: NaiveDateTime) -> Self {
        let week_start = week_start(now.date());
        Self {
            now,
            week_start,
            week_key: week_key(week_start),
        }
    }

    pub fn slot_target(&self) -> SlotTarget {
        slot_target(self.now)
    }
}

/// Resolves the observation time from an optional `--at` override, falling
/// back to the caller's local wall clock.
pub fn resolve_now(
    at_arg: Option<&str>,
    local_now: NaiveDateTime,
) -> anyhow::Result<NaiveDateTime> {
    let Some(s) = at_arg else {
        return Ok(local_now);
    };

    let s = s.trim();
    for fmt in [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid --at value {s:?} (expected YYYY-MM-DD[ HH:MM])"))?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid --at value {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::week::SLOTS_PER_WEEK;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn every_hour_of_a_week_maps_into_range() {
        // 2026-10-18 is Sunday.
        for day in 18..=24 {
            for hour in 0..24 {
                let idx = slot_index(at(2026, 10, day, hour));
                assert!(idx < SLOTS_PER_WEEK, "day={day} hour={hour} idx={idx}");
            }
        }
    }

    #[test]
    fn monday_morning_and_saturday_evening() {
        assert_eq!(slot_index(at(2026, 10, 19, 9)), 2);
        assert_eq!(slot_index(at(2026, 10, 19, 12)), 3);
        assert_eq!(slot_index(at(2026, 10, 24, 23)), 13);
    }

    #[test]
    fn sunday_writes_both_halves() {
        let morning = slot_target(at(2026, 10, 18, 8));
        let evening = slot_target(at(2026, 10, 18, 15));
        assert_eq!(morning.indices().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(evening.indices().collect::<Vec<_>>(), vec![1, 0]);

        let tuesday = slot_target(at(2026, 10, 20, 15));
        assert_eq!(tuesday.indices().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn week_key_uses_zero_based_month_without_padding() {
        // Wednesday 2026-01-07 belongs to the week starting Sunday 2026-01-04.
        let ctx = LogContext::at(at(2026, 1, 7, 10));
        assert_eq!(ctx.week_start, NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
        assert_eq!(ctx.week_key, "2026-0-4");
    }

    #[test]
    fn week_start_crosses_month_and_year() {
        // Friday 2027-01-01 -> Sunday 2026-12-27.
        let start = week_start(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 27).unwrap());
        assert_eq!(week_key(start), "2026-11-27");
    }

    #[test]
    fn resolve_now_prefers_override() {
        let local = at(2026, 10, 19, 9);
        assert_eq!(resolve_now(None, local).unwrap(), local);
        assert_eq!(
            resolve_now(Some("2026-10-21 13:30"), local).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 21)
                .unwrap()
                .and_hms_opt(13, 30, 0)
                .unwrap()
        );
        assert_eq!(
            resolve_now(Some("2026-10-21"), local).unwrap(),
            at(2026, 10, 21, 0)
        );
        assert!(resolve_now(Some("next tuesday"), local).is_err());
    }
}
