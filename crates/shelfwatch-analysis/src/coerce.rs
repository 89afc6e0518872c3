use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use shelfwatch_db::StoredListing;

static RATING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+|\d+").expect("valid rating regex"));

/// A stored row with its text columns coerced to typed values.
///
/// The raw text is kept alongside so the "View Data" table shows both. A
/// value that cannot be coerced is `None` and is left out of every aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercedListing {
    pub id: i32,
    pub title: String,
    pub authors: Option<String>,
    pub raw_price: Option<String>,
    pub raw_rating: Option<String>,
    pub raw_reviews_count: Option<String>,
    pub raw_format: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub reviews_count: Option<f64>,
    pub format: Option<String>,
}

impl CoercedListing {
    #[must_use]
    pub fn from_stored(row: StoredListing) -> Self {
        Self {
            price: coerce_price(row.price.as_deref()),
            rating: coerce_rating(row.rating.as_deref()),
            reviews_count: coerce_reviews(row.reviews_count.as_deref()),
            format: row.format.as_deref().map(title_case),
            id: row.id,
            title: row.title,
            authors: row.authors,
            raw_price: row.price,
            raw_rating: row.rating,
            raw_reviews_count: row.reviews_count,
            raw_format: row.format,
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses the whole price text as a number. `"29."` is 29.0; `"N/A"` and
/// `"1,299.99"` are `None`.
#[must_use]
pub fn coerce_price(raw: Option<&str>) -> Option<f64> {
    parse_number(raw)
}

/// Takes the first decimal-or-integer substring of the rating text, so
/// `"4.5 out of 5 stars"` is 4.5.
#[must_use]
pub fn coerce_rating(raw: Option<&str>) -> Option<f64> {
    let found = RATING_NUMBER.find(raw?)?;
    found.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[must_use]
pub fn coerce_reviews(raw: Option<&str>) -> Option<f64> {
    parse_number(raw)
}

/// Upper-cases the first letter of every run of letters and lower-cases the
/// rest: `"kindle EDITION"` becomes `"Kindle Edition"`.
#[must_use]
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
