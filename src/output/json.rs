use anyhow::Result;
use serde::Serialize;

use crate::pipeline::CountyReport;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn report_to_json(report: &CountyReport) -> Result<String> {
    render_json(report)
}
