//! Per-container field extraction.
//!
//! Each listing field has its own [`FieldExtractor`]. An extractor looks at a
//! single result container and returns the trimmed text of the element it
//! targets, or `None` when that element is missing or blank. The six results
//! are gathered into [`ExtractedFields`] before any default is applied, so
//! the acceptance rule sees exactly what the page contained.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use shelfwatch_core::BookListing;

use crate::error::ScraperError;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("span.a-text-normal"));
static AUTHOR: LazyLock<Selector> = LazyLock::new(|| selector("a.a-size-base"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| selector("span.a-price-whole"));
static RATING: LazyLock<Selector> = LazyLock::new(|| selector("span.a-icon-alt"));
static REVIEWS: LazyLock<Selector> = LazyLock::new(|| selector("span.a-size-base"));
static FORMAT: LazyLock<Selector> =
    LazyLock::new(|| selector("span.a-size-base.a-color-secondary"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must be valid CSS")
}

/// The listing fields a container can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Price,
    Rating,
    Reviews,
    Format,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Price => "price",
            Field::Rating => "rating",
            Field::Reviews => "reviews",
            Field::Format => "format",
        };
        f.write_str(name)
    }
}

/// Pulls one field out of a result container.
pub trait FieldExtractor: Send + Sync {
    fn field(&self) -> Field;

    /// Returns the field's text, or `None` when the container lacks it.
    fn extract(&self, container: ElementRef<'_>) -> Option<String>;
}

/// Extractor that takes the text of the first element matching a selector.
pub struct SelectorExtractor {
    field: Field,
    selector: &'static Selector,
}

impl SelectorExtractor {
    #[must_use]
    pub fn new(field: Field, selector: &'static Selector) -> Self {
        Self { field, selector }
    }

    /// The extractor used for `field` on search-results pages.
    #[must_use]
    pub fn for_field(field: Field) -> Self {
        let selector: &'static Selector = match field {
            Field::Title => &*TITLE,
            Field::Author => &*AUTHOR,
            Field::Price => &*PRICE,
            Field::Rating => &*RATING,
            Field::Reviews => &*REVIEWS,
            Field::Format => &*FORMAT,
        };
        Self::new(field, selector)
    }
}

impl FieldExtractor for SelectorExtractor {
    fn field(&self) -> Field {
        self.field
    }

    fn extract(&self, container: ElementRef<'_>) -> Option<String> {
        container
            .select(self.selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

/// What the extractors found in a single container, before defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub reviews: Option<String>,
    pub format: Option<String>,
}

impl ExtractedFields {
    /// Applies the acceptance rule and fills defaults for missing fields.
    ///
    /// A container is a listing when it has a title and at least one of an
    /// author or a rating. Price, reviews, and format are always optional.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingTitle`] when there is no title.
    /// - [`ScraperError::IncompleteListing`] when there is a title but neither
    ///   an author nor a rating.
    pub fn into_listing(self) -> Result<BookListing, ScraperError> {
        let title = self.title.ok_or(ScraperError::MissingTitle)?;
        if self.author.is_none() && self.rating.is_none() {
            return Err(ScraperError::IncompleteListing { title });
        }
        Ok(BookListing::with_defaults(
            title,
            self.author,
            self.price,
            self.rating,
            self.reviews,
            self.format,
        ))
    }
}

/// One extractor per listing field.
pub struct ExtractorSet {
    pub title: Box<dyn FieldExtractor>,
    pub author: Box<dyn FieldExtractor>,
    pub price: Box<dyn FieldExtractor>,
    pub rating: Box<dyn FieldExtractor>,
    pub reviews: Box<dyn FieldExtractor>,
    pub format: Box<dyn FieldExtractor>,
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self {
            title: Box::new(SelectorExtractor::for_field(Field::Title)),
            author: Box::new(SelectorExtractor::for_field(Field::Author)),
            price: Box::new(SelectorExtractor::for_field(Field::Price)),
            rating: Box::new(SelectorExtractor::for_field(Field::Rating)),
            reviews: Box::new(SelectorExtractor::for_field(Field::Reviews)),
            format: Box::new(SelectorExtractor::for_field(Field::Format)),
        }
    }
}

impl ExtractorSet {
    /// Runs every extractor against `container`.
    #[must_use]
    pub fn extract(&self, container: ElementRef<'_>) -> ExtractedFields {
        ExtractedFields {
            title: run(&*self.title, container),
            author: run(&*self.author, container),
            price: run(&*self.price, container),
            rating: run(&*self.rating, container),
            reviews: run(&*self.reviews, container),
            format: run(&*self.format, container),
        }
    }
}

fn run(extractor: &dyn FieldExtractor, container: ElementRef<'_>) -> Option<String> {
    let text = extractor.extract(container);
    if text.is_none() {
        tracing::trace!(field = %extractor.field(), "field missing from container");
    }
    text
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn first_container(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    fn extract_from(html: &str) -> ExtractedFields {
        let doc = first_container(html);
        let div = Selector::parse("div").unwrap();
        let container = doc.select(&div).next().expect("fixture has a div");
        ExtractorSet::default().extract(container)
    }

    #[test]
    fn extracts_all_fields_from_full_container() {
        let fields = extract_from(
            r#"<div class="s-result-item">
                 <h2><span class="a-size-medium a-text-normal"> Fundamentals of Data Engineering </span></h2>
                 <a class="a-size-base a-link-normal">Joe Reis</a>
                 <span class="a-icon-alt">4.6 out of 5 stars</span>
                 <span class="a-price"><span class="a-price-whole">42.</span></span>
                 <span class="a-size-base a-color-secondary">Paperback</span>
               </div>"#,
        );
        assert_eq!(
            fields.title.as_deref(),
            Some("Fundamentals of Data Engineering")
        );
        assert_eq!(fields.author.as_deref(), Some("Joe Reis"));
        assert_eq!(fields.price.as_deref(), Some("42."));
        assert_eq!(fields.rating.as_deref(), Some("4.6 out of 5 stars"));
        assert_eq!(fields.format.as_deref(), Some("Paperback"));
        // The reviews lookup is the first `span.a-size-base`, which here is the
        // format label.
        assert_eq!(fields.reviews.as_deref(), Some("Paperback"));
    }

    #[test]
    fn blank_elements_count_as_missing() {
        let fields = extract_from(
            r#"<div><span class="a-text-normal">   </span><a class="a-size-base"></a></div>"#,
        );
        assert!(fields.title.is_none());
        assert!(fields.author.is_none());
    }

    #[test]
    fn into_listing_rejects_container_without_title() {
        let fields = ExtractedFields {
            author: Some("Anon".to_string()),
            rating: Some("4.0 out of 5 stars".to_string()),
            ..ExtractedFields::default()
        };
        assert!(matches!(
            fields.into_listing(),
            Err(ScraperError::MissingTitle)
        ));
    }

    #[test]
    fn into_listing_rejects_container_missing_title_author_and_rating() {
        let fields = ExtractedFields {
            price: Some("10.".to_string()),
            format: Some("Kindle".to_string()),
            ..ExtractedFields::default()
        };
        let err = fields.into_listing().unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn into_listing_rejects_title_only_container() {
        let fields = ExtractedFields {
            title: Some("Sponsored".to_string()),
            ..ExtractedFields::default()
        };
        assert!(matches!(
            fields.into_listing(),
            Err(ScraperError::IncompleteListing { ref title }) if title == "Sponsored"
        ));
    }

    #[test]
    fn into_listing_accepts_title_with_rating_and_applies_defaults() {
        let fields = ExtractedFields {
            title: Some("Streaming Systems".to_string()),
            rating: Some("4.4 out of 5 stars".to_string()),
            ..ExtractedFields::default()
        };
        let listing = fields.into_listing().expect("accepted");
        assert_eq!(listing.author, "Unknown");
        assert_eq!(listing.price_raw, "N/A");
        assert_eq!(listing.reviews_count_raw, "0");
        assert_eq!(listing.format_raw, "Unknown");
    }

    #[test]
    fn field_names_display_lowercase() {
        assert_eq!(Field::Reviews.to_string(), "reviews");
        assert_eq!(SelectorExtractor::for_field(Field::Price).field(), Field::Price);
    }
}
