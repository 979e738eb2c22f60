use crate::domain::possibility::PriceRange;
use crate::ranking::Ranking;
use anyhow::Context;
use serde::Serialize;

pub const SEPARATOR: &str = "----------------------------------";

/// Column header aligned with the rows produced by [`render_ranking`].
pub const SLOT_HEADER: &str = "│                    [SUN AM ] [SUN PM ] [MON AM ] [MON PM ] [TUE AM ] [TUE PM ] [WED AM ] [WED PM ] [THU AM ] [THU PM ] [FRI AM ] [FRI PM ] [SAT AM ] [SAT PM ]";

const ROW_PREFIX: &str = "Weekday prices: ";

/// ` [mmm~MMM]` per slot, numbers right-aligned to a minimum width of 3.
pub fn format_prices(prices: &[PriceRange]) -> String {
    prices
        .iter()
        .map(|p| format!(" [{:>3}~{:>3}]", p.min, p.max))
        .collect()
}

fn format_extremum(extremum: Option<f64>) -> String {
    match extremum {
        Some(v) => v.to_string(),
        None => "n/a".to_string(),
    }
}

pub fn render_ranking(ranking: &Ranking<'_>) -> String {
    let mut out = format!(
        "{}: {}\n{SLOT_HEADER}\n",
        ranking.criterion.label(),
        format_extremum(ranking.extremum)
    );

    let last = ranking.selected.len().saturating_sub(1);
    for (i, p) in ranking.selected.iter().enumerate() {
        let branch = if i == last { "└── " } else { "├── " };
        out.push_str(&format!("{branch}{ROW_PREFIX}{}\n", format_prices(&p.prices)));
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport<'a> {
    pub week_key: String,
    pub candidates_len: usize,
    pub week_max: Ranking<'a>,
    pub week_guaranteed_minimum: Ranking<'a>,
}

impl RankingReport<'_> {
    pub fn render_text(&self) -> String {
        format!(
            "{SEPARATOR}\n{}\n{}",
            render_ranking(&self.week_max),
            render_ranking(&self.week_guaranteed_minimum)
        )
    }

    pub fn render_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize ranking report")
    }
}
