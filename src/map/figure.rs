use serde_json::{json, Value};

use crate::decade::{DecadeBucket, DecadeClass};
use crate::map::ColorField;
use crate::types::MergedCountyRow;

const CATEGORY_COLORS: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];
const CONTINUOUS_SCALE: &str = "Plasma";

pub fn build_figure(rows: &[MergedCountyRow], field: ColorField) -> Value {
    let data = match field {
        ColorField::Decade => decade_traces(rows),
        ColorField::NumberOfPrograms => vec![program_count_trace(rows)],
    };
    json!({
        "data": data,
        "layout": {
            "geo": {
                "scope": "usa",
                "fitbounds": "locations",
                "visible": false,
                "bgcolor": "white",
            },
            "plot_bgcolor": "white",
            "legend": { "title": { "text": field.value() } },
            "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
        },
    })
}

fn category_order() -> Vec<DecadeClass> {
    DecadeBucket::ALL
        .into_iter()
        .map(DecadeClass::Decade)
        .chain([DecadeClass::Unclassified, DecadeClass::NotAMember])
        .collect()
}

fn decade_traces(rows: &[MergedCountyRow]) -> Vec<Value> {
    category_order()
        .into_iter()
        .filter_map(|class| {
            let members = rows
                .iter()
                .filter(|row| row.decade == class)
                .collect::<Vec<_>>();
            if members.is_empty() {
                None
            } else {
                Some((class, members))
            }
        })
        .enumerate()
        .map(|(index, (class, members))| {
            let color = CATEGORY_COLORS[index % CATEGORY_COLORS.len()];
            json!({
                "type": "choropleth",
                "name": class.label(),
                "legendgroup": class.label(),
                "showlegend": true,
                "showscale": false,
                "featureidkey": "id",
                "locations": members.iter().map(|row| row.fips_code.as_str()).collect::<Vec<_>>(),
                "z": vec![1; members.len()],
                "colorscale": [[0.0, color], [1.0, color]],
                "hovertext": members.iter().map(|row| row.county_name.as_str()).collect::<Vec<_>>(),
                "hovertemplate": format!("<b>%{{hovertext}}</b><br>decade={}<extra></extra>", class.label()),
                "marker": { "line": { "color": "white", "width": 0.5 } },
            })
        })
        .collect()
}

fn program_count_trace(rows: &[MergedCountyRow]) -> Value {
    json!({
        "type": "choropleth",
        "name": ColorField::NumberOfPrograms.value(),
        "featureidkey": "id",
        "locations": rows.iter().map(|row| row.fips_code.as_str()).collect::<Vec<_>>(),
        "z": rows.iter().map(|row| row.program_count).collect::<Vec<_>>(),
        "colorscale": CONTINUOUS_SCALE,
        "colorbar": { "title": { "text": ColorField::NumberOfPrograms.value() } },
        "hovertext": rows.iter().map(|row| row.county_name.as_str()).collect::<Vec<_>>(),
        "customdata": rows.iter().map(|row| row.program_participation.summary()).collect::<Vec<_>>(),
        "hovertemplate": "<b>%{hovertext}</b><br>Number of Programs=%{z}<br>Program Participation=%{customdata}<extra></extra>",
        "marker": { "line": { "color": "white", "width": 0.5 } },
    })
}
