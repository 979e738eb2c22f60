pub mod report;
pub mod top_k;

use crate::domain::possibility::Possibility;
use serde::Serialize;
use top_k::{select_top_k, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    WeekMax,
    WeekGuaranteedMinimum,
}

impl Criterion {
    pub fn label(self) -> &'static str {
        match self {
            Criterion::WeekMax => "Week Maximum",
            Criterion::WeekGuaranteedMinimum => "Week Guaranteed Minimum",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Criterion::WeekMax => Direction::MaxSeeking,
            Criterion::WeekGuaranteedMinimum => Direction::MinSeeking,
        }
    }

    pub fn key(self, p: &Possibility) -> f64 {
        match self {
            Criterion::WeekMax => p.week_max,
            Criterion::WeekGuaranteedMinimum => p.week_guaranteed_minimum,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking<'a> {
    pub criterion: Criterion,
    pub extremum: Option<f64>,
    pub selected: Vec<&'a Possibility>,
}

pub fn rank(possibilities: &[Possibility], criterion: Criterion, n: usize) -> Ranking<'_> {
    let selection = select_top_k(
        possibilities,
        n,
        |p| criterion.key(p),
        criterion.direction(),
    );
    Ranking {
        criterion,
        extremum: selection.extremum,
        selected: selection.selected,
    }
}
