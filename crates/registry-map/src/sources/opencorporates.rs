//! OpenCorporates registry openness ratings
//!
//! The registries index is a single server-rendered table. Each jurisdiction
//! row carries a `data-href` to its detail page, a `td.name` cell and a
//! `td.score` cell formatted `NN/100`.

use super::html;
use crate::{CountryRecord, LinkFormat, MapError, MergeDefaults, Result};
use country_codes::IsoResolver;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_URL: &str = "http://registries.opencorporates.com/";

/// Attribute key carrying the 0-100 score
pub const SCORE_KEY: &str = "openness_score";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Single GET of the registries page
pub async fn fetch_page(url: &str) -> Result<String> {
    info!("Fetching registry ratings from {}", url);
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MapError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    debug!("Fetched {} bytes", body.len());
    Ok(body)
}

/// Extract one record per jurisdiction row
///
/// Rows are searched at any depth, so a table nested in page layout is
/// found. Rows without a `data-href` (headers, footers, layout) are skipped,
/// as are rows with no name cell. Scores that do not parse become 0.
pub fn parse_registry_page(
    page: &str,
    base_url: &str,
    resolver: &IsoResolver<'_>,
) -> Vec<CountryRecord> {
    let mut records = Vec::new();

    for row in html::find_descendants(page, "tr") {
        let Some(href) = row.attr("data-href") else {
            continue;
        };
        let Some(name) = row
            .find_by_class("td", "name")
            .map(|cell| cell.text())
            .filter(|name| !name.is_empty())
        else {
            warn!("Skipping row {:?} with no name cell", href);
            continue;
        };

        let score = row
            .find_by_class("td", "score")
            .map(|cell| parse_score(&cell.text()))
            .unwrap_or(0);

        let record = CountryRecord::resolved(name, resolver)
            .with_link(join_url(base_url, &href))
            .with_attribute(SCORE_KEY, score);
        records.push(record);
    }

    info!("Parsed {} jurisdictions", records.len());
    records
}

/// `"85/100"` → 85; anything unparsable → 0
pub fn parse_score(text: &str) -> u32 {
    text.split('/')
        .next()
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(0)
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub fn defaults() -> MergeDefaults {
    MergeDefaults::default()
        .with_attribute(SCORE_KEY, 0)
        .with_link(LinkFormat::new(
            r#"<a href="{url}" target="_blank">Click through to {name} register</a>"#,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="registries">
          <thead><tr><th>Jurisdiction</th><th>Score</th></tr></thead>
          <tbody>
            <tr data-href="jurisdiction/gb">
              <td class="flag"><img src="/gb.png"/></td>
              <td class="name">United Kingdom</td>
              <td class="score">85/100</td>
            </tr>
            <tr data-href="/jurisdiction/bo">
              <td class="name">Bolivia</td>
              <td class="score">n/a</td>
            </tr>
            <tr data-href="jurisdiction/xx">
              <td class="name">Atlantis</td>
              <td class="score"> 12 / 100 </td>
            </tr>
            <tr data-href="jurisdiction/empty">
              <td class="score">50/100</td>
            </tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_registry_page() {
        let resolver = IsoResolver::standard();
        let records = parse_registry_page(PAGE, DEFAULT_URL, &resolver);

        assert_eq!(records.len(), 3);

        let uk = &records[0];
        assert_eq!(uk.name, "United Kingdom");
        assert_eq!(uk.iso_code.map(|c| c.to_string()), Some("GBR".to_string()));
        assert_eq!(uk.attributes[SCORE_KEY], 85);
        assert_eq!(
            uk.link.as_deref(),
            Some("http://registries.opencorporates.com/jurisdiction/gb")
        );

        let bolivia = &records[1];
        assert_eq!(bolivia.iso_code.map(|c| c.to_string()), Some("BOL".to_string()));
        assert_eq!(bolivia.attributes[SCORE_KEY], 0);
        assert_eq!(
            bolivia.link.as_deref(),
            Some("http://registries.opencorporates.com/jurisdiction/bo")
        );

        let atlantis = &records[2];
        assert!(atlantis.iso_code.is_none());
        assert_eq!(atlantis.attributes[SCORE_KEY], 12);
    }

    #[test]
    fn test_parse_table_nested_in_layout() {
        let page = r#"
            <table class="layout"><tr><td>
              <table class="registries">
                <tr data-href="jurisdiction/fr"><td class="name">France</td><td class="score">70/100</td></tr>
                <tr data-href="jurisdiction/de"><td class="name">Germany</td><td class="score">40/100</td></tr>
              </table>
            </td></tr></table>
        "#;
        let resolver = IsoResolver::standard();
        let records = parse_registry_page(page, DEFAULT_URL, &resolver);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["France", "Germany"]);
        assert_eq!(records[1].attributes[SCORE_KEY], 40);
    }

    #[test]
    fn test_parse_name_cell_nested_in_wrapper() {
        let page = r#"
            <table>
              <tr data-href="jurisdiction/pe">
                <td class="wrap"><table><tr><td class="name">Peru</td></tr></table></td>
                <td class="score">55/100</td>
              </tr>
            </table>
        "#;
        let resolver = IsoResolver::standard();
        let records = parse_registry_page(page, DEFAULT_URL, &resolver);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Peru");
        assert_eq!(records[0].iso_code.map(|c| c.to_string()), Some("PER".to_string()));
        assert_eq!(records[0].attributes[SCORE_KEY], 55);
    }

    #[test]
    fn test_parse_empty_page() {
        let resolver = IsoResolver::standard();
        assert!(parse_registry_page("<html></html>", DEFAULT_URL, &resolver).is_empty());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("85/100"), 85);
        assert_eq!(parse_score("100"), 100);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("-/100"), 0);
        assert_eq!(parse_score("-5/100"), 0);
    }

    #[test]
    fn test_defaults() {
        let defaults = defaults();
        assert_eq!(defaults.attributes[SCORE_KEY], 0);
        assert_eq!(defaults.link.render(None, "Norway"), "No link");
        assert_eq!(
            defaults.link.render(Some("http://x/jurisdiction/no"), "Norway"),
            r#"<a href="http://x/jurisdiction/no" target="_blank">Click through to Norway register</a>"#
        );
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_error() {
        let result = fetch_page("http://127.0.0.1:9/registries").await;
        assert!(matches!(result, Err(MapError::Http(_))));
    }
}
