use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::decade::DecadeClass;
use crate::scrape::SkippedCounty;
use crate::types::MergedCountyRow;

pub fn render_county_table(rows: &[MergedCountyRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "County",
        "FIPS",
        "Joined",
        "Decade",
        "Programs",
        "Program Participation",
    ]);

    for row in rows {
        let decade_cell = match row.decade {
            DecadeClass::Decade(_) => Cell::new(row.decade.label()).fg(Color::Green),
            DecadeClass::NotAMember => Cell::new(row.decade.label()),
            DecadeClass::Unclassified => Cell::new(row.decade.label()).fg(Color::Yellow),
        };
        table.add_row(Row::from(vec![
            Cell::new(&row.county_name),
            Cell::new(row.fips_code.as_str()),
            Cell::new(&row.join_date),
            decade_cell,
            Cell::new(row.program_count),
            Cell::new(row.program_participation.summary()),
        ]));
    }
    table.to_string()
}

pub fn render_skipped_table(skipped: &[SkippedCounty]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Skipped", "Reason"]);
    for entry in skipped {
        table.add_row(vec![
            Cell::new(&entry.county).fg(Color::Red),
            Cell::new(&entry.reason),
        ]);
    }
    table.to_string()
}
