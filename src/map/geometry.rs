use std::collections::HashSet;

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::types::MergedCountyRow;

pub fn restrict_geometry(geojson: &Value, rows: &[MergedCountyRow]) -> Result<Value> {
    let features = geojson
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("county geometry is not a GeoJSON FeatureCollection"))?;

    let wanted: HashSet<&str> = rows.iter().map(|row| row.fips_code.as_str()).collect();
    // Ids are rewritten as strings so they compare equal to the locations.
    let kept = features
        .iter()
        .filter_map(|feature| {
            let id = feature_id(feature)?;
            if !wanted.contains(id.as_str()) {
                return None;
            }
            let mut feature = feature.clone();
            feature["id"] = Value::String(id);
            Some(feature)
        })
        .collect::<Vec<_>>();

    debug!("kept {} of {} county shapes", kept.len(), features.len());
    if kept.len() < wanted.len() {
        warn!(
            "{} counties have no shape in the geometry source",
            wanted.len() - kept.len()
        );
    }
    Ok(json!({
        "type": "FeatureCollection",
        "features": kept,
    }))
}

fn feature_id(feature: &Value) -> Option<String> {
    match feature.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(format!("{:05}", id.as_u64()?)),
        _ => None,
    }
}
