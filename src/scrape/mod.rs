//! HTML extraction for the member directory, county detail pages and the
//! FIPS directory.

pub mod fips;
pub mod membership;
pub mod programs;

use scraper::Selector;
use serde::Serialize;
use thiserror::Error;

pub use fips::parse_fips_directory;
pub use membership::{parse_member_directory, MemberDirectory};
pub use programs::{collect_programs, parse_program_table, ProgramCollection};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid site origin {origin}: {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: url::ParseError,
    },
    #[error("county entry {index} is missing its {element}")]
    MissingElement { index: usize, element: &'static str },
    #[error("county {county}: {reason}")]
    County { county: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCounty {
    pub county: String,
    pub reason: String,
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

pub(crate) fn element_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
