pub mod figure;
pub mod geometry;
pub mod page;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use figure::build_figure;
pub use geometry::restrict_geometry;
pub use page::render_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorField {
    #[default]
    #[serde(rename = "decade")]
    Decade,
    #[serde(rename = "Number of Programs")]
    NumberOfPrograms,
}

impl ColorField {
    pub const ALL: [ColorField; 2] = [ColorField::Decade, ColorField::NumberOfPrograms];

    pub fn value(&self) -> &'static str {
        match self {
            Self::Decade => "decade",
            Self::NumberOfPrograms => "Number of Programs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Decade => "Decade",
            Self::NumberOfPrograms => "Number of Programs",
        }
    }
}

impl Display for ColorField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Error)]
#[error("unknown color field: {0} (expected \"decade\" or \"Number of Programs\")")]
pub struct ColorFieldParseError(pub String);

impl FromStr for ColorField {
    type Err = ColorFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decade" => Ok(Self::Decade),
            "Number of Programs" => Ok(Self::NumberOfPrograms),
            _ => Err(ColorFieldParseError(s.to_string())),
        }
    }
}
