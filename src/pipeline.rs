use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, FailurePolicy};
use crate::fetch::PageFetcher;
use crate::merge::merge_counties;
use crate::scrape::{
    collect_programs, parse_fips_directory, parse_member_directory, SkippedCounty,
};
use crate::types::MergedCountyRow;

#[derive(Debug, Clone, Serialize)]
pub struct CountyReport {
    pub scraped_at: DateTime<Utc>,
    pub rows: Vec<MergedCountyRow>,
    pub member_count: usize,
    pub unmatched_members: Vec<String>,
    pub missing_program_tables: Vec<String>,
    pub skipped: Vec<SkippedCounty>,
}

impl CountyReport {
    pub fn log_summary(&self) {
        let members = self.rows.iter().filter(|row| row.is_member()).count();
        info!(
            "{} counties, {} members on the map ({} scraped)",
            self.rows.len(),
            members,
            self.member_count
        );
        for skipped in &self.skipped {
            warn!("skipped {}: {}", skipped.county, skipped.reason);
        }
        if !self.unmatched_members.is_empty() {
            warn!(
                "members not matched to a FIPS county: {}",
                self.unmatched_members.join(", ")
            );
        }
    }
}

pub async fn build_county_report(fetcher: &dyn PageFetcher, config: &Config) -> Result<CountyReport> {
    let sources = &config.sources;
    let policy = config.scrape.on_error;

    info!("scraping member directory {}", sources.member_directory_url);
    let directory_html = fetcher
        .fetch_text(&sources.member_directory_url)
        .await
        .context("failed fetching member directory")?;
    let mut directory = parse_member_directory(&directory_html, &sources.site_origin)?;
    if policy == FailurePolicy::Abort && !directory.skipped.is_empty() {
        let first = directory.skipped.remove(0);
        return Err(first.into_error()).context("member directory entry is malformed");
    }
    info!("found {} member counties", directory.records.len());

    let programs = collect_programs(fetcher, &directory.records, policy).await?;

    info!("scraping FIPS directory {}", sources.fips_directory_url);
    let fips_html = fetcher
        .fetch_text(&sources.fips_directory_url)
        .await
        .context("failed fetching FIPS directory")?;
    let fips = parse_fips_directory(&fips_html, &sources.fips_cell_bgcolor, &sources.state_prefix);
    if fips.is_empty() {
        warn!(
            "no FIPS cells marked {} found; the map will be empty",
            sources.fips_cell_bgcolor
        );
    }

    let merged = merge_counties(&directory.records, &programs.programs, &fips);

    let mut skipped = directory
        .skipped
        .into_iter()
        .map(|entry| SkippedCounty {
            county: entry
                .county
                .unwrap_or_else(|| format!("entry #{}", entry.index)),
            reason: format!("missing {}", entry.element),
        })
        .collect::<Vec<_>>();
    skipped.extend(programs.skipped);

    Ok(CountyReport {
        scraped_at: Utc::now(),
        rows: merged.rows,
        member_count: directory.records.len(),
        unmatched_members: merged.unmatched_members,
        missing_program_tables: programs.missing_tables,
        skipped,
    })
}
