use anyhow::Result;
use serde_json::Value;

use crate::map::{build_figure, ColorField};
use crate::types::MergedCountyRow;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TITLE: &str = "Interactive Dashboard of PRISM clients by county";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<script src="__PLOTLY__"></script>
<style>body { margin: 0; font-family: sans-serif; background: white; } header { padding: 8px 16px; }</style>
</head>
<body>
<header>
<h1>__TITLE__</h1>
<label for="data-toggle">Select data to display:</label>
<select id="data-toggle">
__OPTIONS__
</select>
</header>
<div id="choropleth-map" style="width: 100vw; height: 100vh;"></div>
<script id="figure-data" type="application/json">__FIGURE__</script>
<script id="geometry-data" type="application/json">__GEOMETRY__</script>
<script>
document.getElementById("data-toggle").addEventListener("change", function (event) {
  window.location.search = "?color=" + encodeURIComponent(event.target.value);
});
var figure = JSON.parse(document.getElementById("figure-data").textContent);
var geometry = JSON.parse(document.getElementById("geometry-data").textContent);
figure.data.forEach(function (trace) { trace.geojson = geometry; });
Plotly.newPlot("choropleth-map", figure.data, figure.layout, { responsive: true });
</script>
</body>
</html>
"#;

pub fn render_page(rows: &[MergedCountyRow], geometry: &Value, field: ColorField) -> Result<String> {
    let figure = script_json(&build_figure(rows, field))?;
    let geometry = script_json(geometry)?;
    let options = ColorField::ALL
        .iter()
        .map(|option| {
            let selected = if *option == field { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                option.value(),
                option.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(fill_template(
        TEMPLATE,
        &[
            ("__TITLE__", TITLE),
            ("__PLOTLY__", PLOTLY_JS),
            ("__OPTIONS__", options.as_str()),
            ("__FIGURE__", figure.as_str()),
            ("__GEOMETRY__", geometry.as_str()),
        ],
    ))
}

// Placeholders are only looked up in the template itself, never in the
// inserted values.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("__") {
        match values.iter().find(|(key, _)| rest[start..].starts_with(*key)) {
            Some((key, value)) => {
                out.push_str(&rest[..start]);
                out.push_str(value);
                rest = &rest[start + key.len()..];
            }
            None => {
                out.push_str(&rest[..start + 2]);
                rest = &rest[start + 2..];
            }
        }
    }
    out.push_str(rest);
    out
}

// `<` only ever occurs inside JSON strings, where `\u003c` means the same thing.
fn script_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{fill_template, render_page};
    use crate::decade::classify_decade;
    use crate::map::ColorField;
    use crate::types::{FipsCode, MergedCountyRow, Participation};

    fn rows() -> Vec<MergedCountyRow> {
        vec![MergedCountyRow {
            county_name: "Los Angeles".to_string(),
            fips_code: FipsCode::new("06", "037").expect("valid"),
            join_date: "05/12/1998".to_string(),
            program_participation: Participation::Programs(vec!["</script>".to_string()]),
            program_count: 1,
            decade: classify_decade("05/12/1998"),
        }]
    }

    #[test]
    fn page_marks_current_field_and_embeds_data() {
        let geometry = json!({ "type": "FeatureCollection", "features": [] });
        let html = render_page(&rows(), &geometry, ColorField::NumberOfPrograms).expect("page");
        assert!(html.contains(r#"<option value="Number of Programs" selected>"#));
        assert!(html.contains(r#"<option value="decade">Decade</option>"#));
        assert!(html.contains("Interactive Dashboard of PRISM clients by county"));
        assert!(html.contains("FeatureCollection"));
        assert!(html.contains("06037"));
    }

    #[test]
    fn embedded_json_cannot_close_the_script() {
        let geometry = json!({ "type": "FeatureCollection", "features": [] });
        let html = render_page(&rows(), &geometry, ColorField::NumberOfPrograms).expect("page");
        assert_eq!(html.matches("</script>").count(), 4);
        assert!(html.contains(r"\u003c/script>"));
    }

    #[test]
    fn placeholder_text_in_scraped_data_is_left_alone() {
        let mut rows = rows();
        rows[0].program_participation =
            Participation::Programs(vec!["__GEOMETRY__".to_string(), "__TITLE__".to_string()]);
        let geometry = json!({ "type": "FeatureCollection", "features": [] });
        let html = render_page(&rows, &geometry, ColorField::NumberOfPrograms).expect("page");
        assert_eq!(html.matches("__GEOMETRY__").count(), 1);
        assert_eq!(html.matches("__TITLE__").count(), 1);
        assert_eq!(html.matches("FeatureCollection").count(), 1);
        assert_eq!(
            html.matches("Interactive Dashboard of PRISM clients by county").count(),
            2
        );
    }

    #[test]
    fn unknown_double_underscores_pass_through() {
        let filled = fill_template("a__b __X__ c__", &[("__X__", "x__X__")]);
        assert_eq!(filled, "a__b x__X__ c__");
    }
}
