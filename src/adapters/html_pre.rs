//! Preformatted text extraction from COT HTML pages.

use scraper::{Html, Selector};
use std::sync::LazyLock;

static PRE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("valid pre selector"));

/// Text of the first `<pre>` element, entities decoded and tags dropped.
pub fn extract_pre_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&PRE)
        .next()
        .map(|pre| pre.text().collect::<String>())
}
