use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// Extract the match-page URL of every match listed on an event results page.
///
/// Each `result-con` container must hold exactly one direct-child anchor.
/// Anything else means HLTV changed their markup and we refuse to guess
/// which link is the match page.
pub fn parse_match_list(html: &str, base_url: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let container_selector = Selector::parse("div.result-con").unwrap();

    let mut match_urls = Vec::new();

    for container in document.select(&container_selector) {
        let anchors: Vec<ElementRef> = container
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "a")
            .collect();

        if anchors.len() != 1 {
            return Err(ScrapeError::MalformedPage(format!(
                "expected exactly one link per result container, found {}",
                anchors.len()
            )));
        }

        let href = anchors[0].value().attr("href").ok_or_else(|| {
            ScrapeError::MalformedPage("result container link has no href".to_string())
        })?;

        match_urls.push(format!("{}{}", base_url, href));
    }

    Ok(match_urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://www.hltv.org";

    #[test]
    fn test_parse_match_list() {
        let html = r#"
            <div class="results-all">
                <div class="result-con"><a href="/matches/2370727/a-vs-b">A vs B</a></div>
                <div class="result-con"><a href="/matches/2370728/c-vs-d">C vs D</a></div>
            </div>"#;
        let urls = parse_match_list(html, BASE).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.hltv.org/matches/2370727/a-vs-b",
                "https://www.hltv.org/matches/2370728/c-vs-d",
            ]
        );
    }

    #[test]
    fn test_no_containers_is_empty() {
        let urls = parse_match_list("<div class=\"results-all\"></div>", BASE).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_container_without_link_fails() {
        let html = r#"<div class="result-con"><span>no link here</span></div>"#;
        assert!(matches!(
            parse_match_list(html, BASE),
            Err(ScrapeError::MalformedPage(_))
        ));
    }

    #[test]
    fn test_nested_link_is_not_a_direct_child() {
        let html = r#"<div class="result-con"><span><a href="/matches/1/x">X</a></span></div>"#;
        assert!(matches!(
            parse_match_list(html, BASE),
            Err(ScrapeError::MalformedPage(_))
        ));
    }

    #[test]
    fn test_multiple_links_fail() {
        let html = r#"
            <div class="result-con">
                <a href="/matches/1/x">X</a>
                <a href="/matches/2/y">Y</a>
            </div>"#;
        assert!(matches!(
            parse_match_list(html, BASE),
            Err(ScrapeError::MalformedPage(_))
        ));
    }
}
