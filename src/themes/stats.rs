//! Rating bucket percentages.

use serde::{Deserialize, Serialize};

/// Share of low (1-2), mid (3) and high (4-5) ratings in whole percent.
///
/// Buckets are rounded independently and need not sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    pub low: u32,
    pub mid: u32,
    pub high: u32,
}

pub fn rating_distribution<I>(ratings: I) -> RatingDistribution
where
    I: IntoIterator<Item = u8>,
{
    let (mut low, mut mid, mut high, mut total) = (0usize, 0usize, 0usize, 0usize);
    for rating in ratings {
        total += 1;
        match rating {
            0..=2 => low += 1,
            3 => mid += 1,
            _ => high += 1,
        }
    }
    RatingDistribution {
        low: percent(low, total),
        mid: percent(mid, total),
        high: percent(high, total),
    }
}

// Half-way values round to even.
fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round_ties_even() as u32
}

/// Share of `count` in `total`, in percent with one decimal.
pub fn share_of_total(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}
