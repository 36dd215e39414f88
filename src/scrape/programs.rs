use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::config::FailurePolicy;
use crate::fetch::PageFetcher;
use crate::scrape::{element_text, selector, ScrapeError, SkippedCounty};
use crate::types::{CountyMembershipRecord, ProgramList};

static TABLE_BODY: Lazy<Selector> = Lazy::new(|| selector("tbody"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static CELL: Lazy<Selector> = Lazy::new(|| selector("td"));

#[derive(Debug, Clone, Default)]
pub struct ProgramCollection {
    pub programs: BTreeMap<String, ProgramList>,
    pub missing_tables: Vec<String>,
    pub skipped: Vec<SkippedCounty>,
}

pub fn parse_program_table(html: &str) -> Option<ProgramList> {
    let document = Html::parse_document(html);
    let body = document.select(&TABLE_BODY).next()?;
    let programs = body
        .select(&ROW)
        .filter_map(|row| row.select(&CELL).next())
        .map(element_text)
        .collect();
    Some(programs)
}

pub async fn collect_programs(
    fetcher: &dyn PageFetcher,
    members: &[CountyMembershipRecord],
    policy: FailurePolicy,
) -> Result<ProgramCollection> {
    let mut collection = ProgramCollection::default();
    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member.county_name.as_str()) {
            warn!("duplicate member {}, keeping the first entry", member.county_name);
            continue;
        }
        let html = match fetcher.fetch_text(&member.detail_url).await {
            Ok(html) => html,
            Err(error) => {
                if policy == FailurePolicy::Abort {
                    return Err(ScrapeError::County {
                        county: member.county_name.clone(),
                        reason: format!("{error:#}"),
                    }
                    .into());
                }
                warn!("skipping programs for {}: {error:#}", member.county_name);
                collection.skipped.push(SkippedCounty {
                    county: member.county_name.clone(),
                    reason: format!("{error:#}"),
                });
                continue;
            }
        };

        match parse_program_table(&html) {
            Some(programs) => {
                debug!("{} participates in {} programs", member.county_name, programs.len());
                collection
                    .programs
                    .insert(member.county_name.clone(), programs);
            }
            None => {
                warn!("no program table on {} ({})", member.detail_url, member.county_name);
                collection.missing_tables.push(member.county_name.clone());
            }
        }
    }
    info!(
        "collected programs for {} of {} members",
        collection.programs.len(),
        members.len()
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::{collect_programs, parse_program_table};
    use crate::config::FailurePolicy;
    use crate::fetch::testing::StaticFetcher;
    use crate::types::CountyMembershipRecord;

    fn member(name: &str, url: &str) -> CountyMembershipRecord {
        CountyMembershipRecord {
            county_name: name.to_string(),
            join_date: "01/01/2000".to_string(),
            detail_url: url.to_string(),
        }
    }

    const THREE_PROGRAMS: &str = r#"
        <table><tbody>
            <tr><td>General Liability 1</td><td>2001</td></tr>
            <tr><td> Workers' Compensation </td><td>1998</td></tr>
            <tr><th>note</th></tr>
            <tr><td>Property</td></tr>
        </tbody></table>"#;

    #[test]
    fn reads_first_cell_of_each_row() {
        let programs = parse_program_table(THREE_PROGRAMS).expect("table");
        assert_eq!(
            programs,
            vec!["General Liability 1", "Workers' Compensation", "Property"]
        );
    }

    #[test]
    fn missing_table_is_none_not_empty() {
        assert_eq!(parse_program_table("<p>No programs listed</p>"), None);
        assert_eq!(
            parse_program_table("<table><tbody></tbody></table>"),
            Some(vec![])
        );
    }

    #[tokio::test]
    async fn keys_lists_by_county_even_when_a_table_is_missing() {
        let fetcher = StaticFetcher::new()
            .with_page("https://x.test/a", "<p>none</p>")
            .with_page("https://x.test/b", THREE_PROGRAMS);
        let members = vec![
            member("Alpine", "https://x.test/a"),
            member("Butte", "https://x.test/b"),
        ];
        let collection = collect_programs(&fetcher, &members, FailurePolicy::Skip)
            .await
            .expect("collect");
        assert!(!collection.programs.contains_key("Alpine"));
        assert_eq!(collection.programs["Butte"].len(), 3);
        assert_eq!(collection.missing_tables, vec!["Alpine".to_string()]);
    }

    #[tokio::test]
    async fn fetch_failure_follows_policy() {
        let fetcher = StaticFetcher::new().with_page("https://x.test/b", THREE_PROGRAMS);
        let members = vec![
            member("Colusa", "https://x.test/missing"),
            member("Butte", "https://x.test/b"),
        ];

        let collection = collect_programs(&fetcher, &members, FailurePolicy::Skip)
            .await
            .expect("skip policy continues");
        assert_eq!(collection.skipped.len(), 1);
        assert_eq!(collection.skipped[0].county, "Colusa");
        assert!(collection.programs.contains_key("Butte"));

        let aborted = collect_programs(&fetcher, &members, FailurePolicy::Abort).await;
        let message = aborted.expect_err("abort policy stops").to_string();
        assert!(message.contains("Colusa"));
    }

    #[tokio::test]
    async fn later_duplicate_never_fills_in_for_the_first_entry() {
        let fetcher = StaticFetcher::new()
            .with_page("https://x.test/kern-1985", "<p>none</p>")
            .with_page("https://x.test/kern-2015", THREE_PROGRAMS)
            .with_page("https://x.test/inyo-2015", THREE_PROGRAMS);
        let members = vec![
            member("Kern", "https://x.test/kern-1985"),
            member("Kern", "https://x.test/kern-2015"),
            member("Inyo", "https://x.test/inyo-missing"),
            member("Inyo", "https://x.test/inyo-2015"),
        ];
        let collection = collect_programs(&fetcher, &members, FailurePolicy::Skip)
            .await
            .expect("collect");
        assert!(collection.programs.is_empty());
        assert_eq!(collection.missing_tables, vec!["Kern".to_string()]);
        assert_eq!(collection.skipped.len(), 1);
        assert_eq!(collection.skipped[0].county, "Inyo");
    }
}
