use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    MaxSeeking,
    MinSeeking,
}

impl Direction {
    fn initial(self) -> f64 {
        match self {
            Direction::MaxSeeking => f64::NEG_INFINITY,
            Direction::MinSeeking => f64::INFINITY,
        }
    }

    // Ties qualify. NaN never does.
    fn admits(self, value: f64, extremum: f64) -> bool {
        match self {
            Direction::MaxSeeking => value >= extremum,
            Direction::MinSeeking => value <= extremum,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a, T> {
    /// Last qualifying key, `None` when nothing qualified.
    pub extremum: Option<f64>,
    /// Surviving entries, oldest first.
    pub selected: Vec<&'a T>,
}

/// Single pass over `candidates` in input order, keeping a running extremum.
///
/// Each candidate whose key meets or beats the running extremum becomes the
/// new extremum and is appended to a buffer of at most `n` entries; on
/// overflow the oldest entry is evicted. The result is therefore the last
/// `n` qualifying candidates, so a later tie displaces an earlier one.
pub fn select_top_k<T, F>(
    candidates: &[T],
    n: usize,
    key: F,
    direction: Direction,
) -> Selection<'_, T>
where
    F: Fn(&T) -> f64,
{
    if n == 0 {
        return Selection {
            extremum: None,
            selected: Vec::new(),
        };
    }

    let mut extremum = direction.initial();
    let mut qualified = false;
    let mut buf: VecDeque<&T> = VecDeque::with_capacity(n + 1);

    for candidate in candidates {
        let value = key(candidate);
        if !direction.admits(value, extremum) {
            continue;
        }
        extremum = value;
        qualified = true;
        buf.push_back(candidate);
        if buf.len() > n {
            buf.pop_front();
        }
    }

    Selection {
        extremum: qualified.then_some(extremum),
        selected: buf.into_iter().collect(),
    }
}
