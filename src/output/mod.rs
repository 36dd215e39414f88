pub mod csv;
pub mod json;
pub mod table;

pub use self::csv::counties_to_csv;
pub use self::json::{render_json, report_to_json};
pub use self::table::{render_county_table, render_skipped_table};
