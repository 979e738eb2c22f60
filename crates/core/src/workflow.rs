use crate::domain::possibility::Possibility;
use crate::domain::week::{log_price, parse_price, WeekRecord, SLOT_NAMES};
use crate::forecast::Forecaster;
use crate::ranking::report::RankingReport;
use crate::ranking::{rank, Criterion};
use crate::storage::WeekStorage;
use crate::time::week_slots::{LogContext, SlotTarget};

#[derive(Debug, Clone)]
pub struct Observation {
    pub price: i64,
    pub target: SlotTarget,
    pub record: WeekRecord,
}

/// Validates `raw_price`, writes it into this week's record and persists the
/// record. Returns once the observation is durable, so a failing forecast
/// afterwards cannot lose it.
pub fn record_observation<S>(
    storage: &S,
    ctx: &LogContext,
    raw_price: &str,
) -> anyhow::Result<Observation>
where
    S: WeekStorage + ?Sized,
{
    let price = parse_price(raw_price)?;

    let mut record = storage.load_or_init(&ctx.week_key)?;
    let target = log_price(&mut record, price, ctx)?;
    storage.save(&record)?;

    tracing::info!(
        week_key = %ctx.week_key,
        slot = SLOT_NAMES[target.index],
        price,
        known = record.known_count(),
        "observation recorded"
    );

    Ok(Observation {
        price,
        target,
        record,
    })
}

pub fn forecast<F>(forecaster: &F, record: &WeekRecord, first_buy: bool) -> Vec<Possibility>
where
    F: Forecaster + ?Sized,
{
    let possibilities = forecaster.analyze(&record.slots, first_buy);
    tracing::debug!(
        forecaster = forecaster.name(),
        week_key = %record.week_key,
        candidates_len = possibilities.len(),
        "forecast complete"
    );
    possibilities
}

/// Runs both selections over the same candidate set.
pub fn rank_possibilities<'a>(
    week_key: &str,
    possibilities: &'a [Possibility],
    top_k: usize,
) -> RankingReport<'a> {
    RankingReport {
        week_key: week_key.to_string(),
        candidates_len: possibilities.len(),
        week_max: rank(possibilities, Criterion::WeekMax, top_k),
        week_guaranteed_minimum: rank(possibilities, Criterion::WeekGuaranteedMinimum, top_k),
    }
}
