use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::types::MatchInfo;

/// Extract the demo archive URL and the list of played maps from a match page.
///
/// Exactly one element may carry the `data-demo-link` attribute; a page with
/// zero or several demo links is ambiguous and treated as malformed. A match
/// must list at least one map.
pub fn parse_match_page(html: &str, base_url: &str) -> Result<MatchInfo, ScrapeError> {
    let document = Html::parse_document(html);

    let demo_selector = Selector::parse("a[data-demo-link]").unwrap();
    let demo_links: Vec<_> = document.select(&demo_selector).collect();

    if demo_links.len() != 1 {
        return Err(ScrapeError::MalformedPage(format!(
            "expected exactly one demo link, found {}",
            demo_links.len()
        )));
    }

    let demo_href = demo_links[0].value().attr("data-demo-link").ok_or_else(|| {
        ScrapeError::MalformedPage("demo link element has no data-demo-link value".to_string())
    })?;

    let map_selector = Selector::parse("div.mapname").unwrap();
    let maps: Vec<String> = document
        .select(&map_selector)
        .map(|div| div.text().collect::<String>().trim().to_string())
        .collect();

    if maps.is_empty() {
        return Err(ScrapeError::MalformedPage(
            "unable to retrieve map list".to_string(),
        ));
    }

    Ok(MatchInfo {
        demo_url: format!("{}{}", base_url, demo_href),
        maps,
    })
}
