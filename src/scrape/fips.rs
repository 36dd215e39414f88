use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::scrape::{element_text, selector};
use crate::types::{FipsCode, FipsRecord};

static CELL: Lazy<Selector> = Lazy::new(|| selector("td[bgcolor]"));

pub fn parse_fips_directory(html: &str, cell_bgcolor: &str, state_prefix: &str) -> Vec<FipsRecord> {
    let document = Html::parse_document(html);
    let cells = document
        .select(&CELL)
        .filter(|cell| {
            cell.value()
                .attr("bgcolor")
                .is_some_and(|color| color.trim().eq_ignore_ascii_case(cell_bgcolor))
        })
        .map(element_text)
        .collect::<Vec<_>>();

    // The header row and spacer cells fail one of these checks.
    let mut records = Vec::with_capacity(cells.len() / 2);
    for pair in cells.chunks_exact(2) {
        let (name, code) = (&pair[0], &pair[1]);
        if name.is_empty() {
            debug!("skipping FIPS pair with empty name (code {code:?})");
            continue;
        }
        match FipsCode::new(state_prefix, code) {
            Ok(fips_code) => records.push(FipsRecord {
                county_name: name.clone(),
                fips_code,
            }),
            Err(error) => debug!("skipping FIPS pair {name:?}: {error}"),
        }
    }
    records.sort_by(|a, b| a.county_name.cmp(&b.county_name));
    records
}
