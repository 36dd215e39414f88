use anyhow::Result;

use crate::types::{MergedCountyRow, Participation};

pub fn counties_to_csv(rows: &[MergedCountyRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "county",
        "fips_code",
        "join_date",
        "program_participation",
        "number_of_programs",
        "decade",
    ])?;
    for row in rows {
        let participation = match &row.program_participation {
            Participation::Programs(programs) => programs.join("; "),
            Participation::NotAMember => row.program_participation.summary(),
            Participation::Unavailable => String::new(),
        };
        writer.write_record([
            row.county_name.clone(),
            row.fips_code.to_string(),
            row.join_date.clone(),
            participation,
            row.program_count.to_string(),
            row.decade.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
