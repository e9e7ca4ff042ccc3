//! Representative quote sampling for the top themes.

use rand::{rngs::StdRng, seq::index, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{data::reviews::Review, themes::aggregate::Theme};

/// Longest quote handed to the renderer, marker included.
pub const MAX_QUOTE_CHARS: usize = 200;
const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub review_id: String,
    pub rating: u8,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeQuotes {
    pub theme: String,
    pub quotes: Vec<Quote>,
}

/// Cut text longer than [`MAX_QUOTE_CHARS`] characters down to exactly that
/// many, ending in the truncation marker.
pub fn truncate_quote(text: &str) -> String {
    if text.chars().count() <= MAX_QUOTE_CHARS {
        return text.to_string();
    }
    let keep = MAX_QUOTE_CHARS - TRUNCATION_MARKER.chars().count();
    let mut quote: String = text.chars().take(keep).collect();
    quote.push_str(TRUNCATION_MARKER);
    quote
}

/// Sample up to `per_theme` quotes for each of the first `top` themes.
///
/// Every theme draws from a fresh generator seeded with `seed`.
pub fn select_quotes(
    themes: &[Theme],
    reviews: &[Review],
    top: usize,
    per_theme: usize,
    seed: u64,
) -> Vec<ThemeQuotes> {
    themes
        .iter()
        .take(top)
        .map(|theme| {
            let mut rng = StdRng::seed_from_u64(seed);
            let amount = per_theme.min(theme.members.len());
            let quotes = index::sample(&mut rng, theme.members.len(), amount)
                .into_iter()
                .filter_map(|pick| reviews.get(theme.members[pick]))
                .map(|review| Quote {
                    review_id: review.review_id.clone(),
                    rating: review.rating,
                    quote: truncate_quote(&review.review_text),
                })
                .collect();
            ThemeQuotes {
                theme: theme.name.clone(),
                quotes,
            }
        })
        .collect()
}
