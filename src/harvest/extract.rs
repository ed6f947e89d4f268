//! HTML extraction helpers
//!
//! Pulls the handful of values the harvester cares about out of catalog
//! pages:
//! - Item keys from ranked listing pages
//! - The external identifier embedded in a detail page's body tag
//! - Viewer counts from stats fragments
//! - The weighted average rating from ratings-summary fragments
//!
//! Everything here is forgiving: markup that does not match yields an empty
//! result rather than an error, since a layout drift on one page should not
//! take down a run.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static EXTERNAL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<body[^>]+data-tmdb-id="(\d+)""#).unwrap()
});

static VIEWER_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Watched by ([\d,]+)&nbsp;members").unwrap()
});

static WEIGHTED_AVERAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Weighted average of ([\d.]+) based on ([\d,]+) ratings").unwrap()
});

/// Extracts item keys from a listing page, in display order
///
/// Keys live in the `data-item-slug` attribute of the poster component
/// inside each `li.posteritem`. Entries without a slug are skipped.
///
/// # Arguments
///
/// * `html` - Full HTML of a listing page
///
/// # Returns
///
/// The keys found on the page; empty when the page holds no entries
pub fn listing_slugs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("li.posteritem div.react-component") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("data-item-slug"))
        .filter(|slug| !slug.is_empty())
        .map(String::from)
        .collect()
}

/// Extracts the external identifier from a detail page
///
/// The identifier is carried as a numeric `data-tmdb-id` attribute on the
/// body tag. Absence means the item has no external mapping.
pub fn external_id(html: &str) -> Option<String> {
    EXTERNAL_ID
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Extracts the viewer count from a stats fragment
///
/// The count is rendered with thousands separators ("Watched by
/// 1,234,567&nbsp;members"); separators are stripped before parsing.
pub fn viewer_count(html: &str) -> Option<u64> {
    let caps = VIEWER_COUNT.captures(html)?;
    caps[1].replace(',', "").parse().ok()
}

/// Extracts the weighted average rating from a ratings-summary fragment
///
/// The fragment renders the average inside `span.average-rating a`, with the
/// precise figures in the link's `title` attribute ("Weighted average of
/// 4.12 based on 10,532 ratings").
///
/// # Returns
///
/// The weighted average and the number of ratings behind it, or `None` when
/// the fragment carries no rating
pub fn rating_summary(html: &str) -> Option<(f64, u64)> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("span.average-rating a").ok()?;

    let element = fragment.select(&selector).next()?;
    let title = element.value().attr("title")?;

    let caps = WEIGHTED_AVERAGE.captures(title)?;
    let average = caps[1].parse().ok()?;
    let count = caps[2].replace(',', "").parse().ok()?;
    Some((average, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_slugs_in_display_order() {
        let html = r#"
            <html><body><ul>
                <li class="posteritem">
                    <div class="react-component" data-item-slug="the-godfather"></div>
                </li>
                <li class="posteritem">
                    <div class="react-component" data-item-slug="parasite-2019"></div>
                </li>
                <li class="posteritem">
                    <div class="react-component" data-item-slug="seven-samurai"></div>
                </li>
            </ul></body></html>
        "#;

        assert_eq!(
            listing_slugs(html),
            vec!["the-godfather", "parasite-2019", "seven-samurai"]
        );
    }

    #[test]
    fn test_listing_slugs_skips_entries_without_slug() {
        let html = r#"
            <html><body><ul>
                <li class="posteritem">
                    <div class="react-component" data-item-slug="the-godfather"></div>
                </li>
                <li class="posteritem">
                    <div class="react-component"></div>
                </li>
                <li class="posteritem">
                    <div class="react-component" data-item-slug=""></div>
                </li>
            </ul></body></html>
        "#;

        assert_eq!(listing_slugs(html), vec!["the-godfather"]);
    }

    #[test]
    fn test_listing_slugs_empty_page() {
        assert!(listing_slugs("<html><body><ul></ul></body></html>").is_empty());
    }

    #[test]
    fn test_listing_slugs_ignores_other_components() {
        let html = r#"
            <html><body>
                <div class="react-component" data-item-slug="not-in-a-poster"></div>
                <li class="posteritem">
                    <div class="react-component" data-item-slug="the-godfather"></div>
                </li>
            </body></html>
        "#;

        assert_eq!(listing_slugs(html), vec!["the-godfather"]);
    }

    #[test]
    fn test_external_id_from_body_tag() {
        let html = r#"<html><body class="item backdropped" data-tmdb-id="238"><p>x</p></body></html>"#;
        assert_eq!(external_id(html), Some("238".to_string()));
    }

    #[test]
    fn test_external_id_missing() {
        let html = r#"<html><body class="item backdropped"><p>x</p></body></html>"#;
        assert_eq!(external_id(html), None);
    }

    #[test]
    fn test_external_id_rejects_non_numeric() {
        let html = r#"<html><body data-tmdb-id="23x8"><p>x</p></body></html>"#;
        assert_eq!(external_id(html), None);
    }

    #[test]
    fn test_viewer_count_with_separators() {
        let html = "<p>Watched by 1,234,567&nbsp;members</p>";
        assert_eq!(viewer_count(html), Some(1_234_567));
    }

    #[test]
    fn test_viewer_count_small() {
        let html = "<p>Watched by 42&nbsp;members</p>";
        assert_eq!(viewer_count(html), Some(42));
    }

    #[test]
    fn test_viewer_count_missing() {
        assert_eq!(viewer_count("<p>Liked by 42&nbsp;members</p>"), None);
    }

    #[test]
    fn test_rating_summary_from_title_attribute() {
        let html = r#"
            <section class="ratings-histogram-chart">
                <span class="average-rating">
                    <a href="/film/x/ratings/" title="Weighted average of 4.12 based on 10,532 ratings">4.1</a>
                </span>
            </section>
        "#;

        assert_eq!(rating_summary(html), Some((4.12, 10_532)));
    }

    #[test]
    fn test_rating_summary_missing_span() {
        let html = r#"<section class="ratings-histogram-chart"></section>"#;
        assert_eq!(rating_summary(html), None);
    }

    #[test]
    fn test_rating_summary_title_without_average() {
        let html = r#"
            <span class="average-rating">
                <a href="/film/x/ratings/" title="Not enough ratings yet">-</a>
            </span>
        "#;

        assert_eq!(rating_summary(html), None);
    }
}
