use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::scrape::{element_text, selector, ScrapeError};
use crate::types::CountyMembershipRecord;

static ENTRY: Lazy<Selector> = Lazy::new(|| selector("tbody"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static JOIN_DATE: Lazy<Selector> = Lazy::new(|| selector("td.subtle"));

const COUNTY_SUFFIX: &str = "County";

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberDirectory {
    pub records: Vec<CountyMembershipRecord>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub index: usize,
    pub county: Option<String>,
    pub element: &'static str,
}

impl SkippedEntry {
    pub fn into_error(self) -> ScrapeError {
        ScrapeError::MissingElement {
            index: self.index,
            element: self.element,
        }
    }
}

pub fn parse_member_directory(html: &str, origin: &str) -> Result<MemberDirectory, ScrapeError> {
    let base = Url::parse(origin).map_err(|source| ScrapeError::InvalidOrigin {
        origin: origin.to_string(),
        source,
    })?;
    let document = Html::parse_document(html);
    let mut directory = MemberDirectory::default();

    for (index, entry) in document.select(&ENTRY).enumerate() {
        match parse_entry(entry, &base) {
            Ok(record) => {
                debug!("member {} joined {}", record.county_name, record.join_date);
                directory.records.push(record);
            }
            Err((county, element)) => {
                warn!(
                    "skipping member entry {index} ({}): missing {element}",
                    county.as_deref().unwrap_or("unnamed")
                );
                directory.skipped.push(SkippedEntry {
                    index,
                    county,
                    element,
                });
            }
        }
    }
    Ok(directory)
}

fn parse_entry(
    entry: scraper::ElementRef<'_>,
    base: &Url,
) -> Result<CountyMembershipRecord, (Option<String>, &'static str)> {
    let link = entry.select(&LINK).next().ok_or((None, "county link"))?;
    let county_name = county_display_name(&element_text(link));
    let named = || Some(county_name.clone());

    let join_date = entry
        .select(&JOIN_DATE)
        .next()
        .map(element_text)
        .ok_or_else(|| (named(), "join date"))?;
    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| (named(), "detail link href"))?;
    let detail_url = base
        .join(href)
        .map_err(|_| (named(), "resolvable detail link"))?;

    Ok(CountyMembershipRecord {
        county_name,
        join_date,
        detail_url: detail_url.to_string(),
    })
}

/// "Los Angeles County" -> "Los Angeles".
pub fn county_display_name(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix(COUNTY_SUFFIX)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{county_display_name, parse_member_directory};

    const ORIGIN: &str = "https://www.prismrisk.gov";

    fn entry(name: &str, href: &str, date: &str) -> String {
        format!(
            r#"<tbody><tr><td><a href="{href}">{name}</a></td><td class="subtle"> {date} </td></tr></tbody>"#
        )
    }

    fn page(entries: &[String]) -> String {
        format!("<html><body><table>{}</table></body></html>", entries.concat())
    }

    #[test]
    fn extracts_names_dates_and_absolute_urls_in_order() {
        let html = page(&[
            entry("Alameda County", "/members/county/alameda/", "07/01/1979"),
            entry(" Los Angeles County ", "/members/county/los-angeles/", "05/12/1998"),
        ]);
        let directory = parse_member_directory(&html, ORIGIN).expect("parse");
        assert!(directory.skipped.is_empty());
        assert_eq!(directory.records.len(), 2);

        let la = &directory.records[1];
        assert_eq!(la.county_name, "Los Angeles");
        assert_eq!(la.join_date, "05/12/1998");
        assert_eq!(
            la.detail_url,
            "https://www.prismrisk.gov/members/county/los-angeles/"
        );
        assert_eq!(directory.records[0].county_name, "Alameda");
    }

    #[test]
    fn entry_without_date_is_skipped_and_reported() {
        let broken = r#"<tbody><tr><td><a href="/members/county/inyo/">Inyo County</a></td></tr></tbody>"#;
        let html = page(&[
            broken.to_string(),
            entry("Kern County", "/members/county/kern/", "01/01/2010"),
        ]);
        let directory = parse_member_directory(&html, ORIGIN).expect("parse");
        assert_eq!(directory.records.len(), 1);
        assert_eq!(directory.records[0].county_name, "Kern");
        assert_eq!(directory.skipped.len(), 1);
        assert_eq!(directory.skipped[0].index, 0);
        assert_eq!(directory.skipped[0].county.as_deref(), Some("Inyo"));
        assert_eq!(directory.skipped[0].element, "join date");
    }

    #[test]
    fn entry_without_link_is_skipped() {
        let html = page(&[r#"<tbody><tr><td class="subtle">01/01/2001</td></tr></tbody>"#.to_string()]);
        let directory = parse_member_directory(&html, ORIGIN).expect("parse");
        assert!(directory.records.is_empty());
        assert_eq!(directory.skipped[0].county, None);
        assert_eq!(directory.skipped[0].element, "county link");
    }

    #[test]
    fn bad_origin_is_an_error() {
        assert!(parse_member_directory("<html></html>", "not a url").is_err());
    }

    #[test]
    fn strips_only_trailing_suffix() {
        assert_eq!(county_display_name("San Bernardino County"), "San Bernardino");
        assert_eq!(county_display_name("Fresno"), "Fresno");
        assert_eq!(county_display_name("  Marin   County  "), "Marin");
    }
}
