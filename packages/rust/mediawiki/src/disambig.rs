//! Extracts the "may refer to" options from a rendered disambiguation page.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use wikiracer_shared::Title;

/// Suffix MediaWiki appends to the `title` attribute of red links.
const RED_LINK_SUFFIX: &str = " (page does not exist)";

/// Collect one option per list item: the first anchor inside each `<li>`,
/// skipping table-of-contents entries.
pub(crate) fn parse_options(html: &str) -> HashSet<Title> {
    let doc = Html::parse_fragment(html);
    let li_sel = Selector::parse("li").unwrap();
    let a_sel = Selector::parse("a").unwrap();

    doc.select(&li_sel)
        .filter(|li| !is_toc_entry(li))
        .filter_map(|li| li.select(&a_sel).next())
        .filter_map(|a| anchor_title(&a))
        .map(Title::from)
        .collect()
}

fn is_toc_entry(li: &ElementRef<'_>) -> bool {
    li.value().classes().any(|class| class.contains("toc"))
}

/// Prefer the canonical `title` attribute; fall back to the visible text.
fn anchor_title(a: &ElementRef<'_>) -> Option<String> {
    let from_attr = a
        .value()
        .attr("title")
        .map(|t| t.strip_suffix(RED_LINK_SUFFIX).unwrap_or(t).trim().to_string());

    let title = from_attr.unwrap_or_else(|| a.text().collect::<String>().trim().to_string());
    if title.is_empty() { None } else { Some(title) }
}
