use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::decade::{DecadeClass, NOT_A_MEMBER};

pub type ProgramList = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyMembershipRecord {
    pub county_name: String,
    pub join_date: String,
    pub detail_url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FipsCodeError {
    #[error("state prefix must be 2 digits, got {0:?}")]
    StatePrefix(String),
    #[error("county code must be 3 digits, got {0:?}")]
    CountyCode(String),
    #[error("FIPS code must be 5 digits, got {0:?}")]
    Full(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FipsCode(String);

impl FipsCode {
    pub fn new(state_prefix: &str, county_code: &str) -> Result<Self, FipsCodeError> {
        if !is_digits(state_prefix, 2) {
            return Err(FipsCodeError::StatePrefix(state_prefix.to_string()));
        }
        if !is_digits(county_code, 3) {
            return Err(FipsCodeError::CountyCode(county_code.to_string()));
        }
        Ok(Self(format!("{state_prefix}{county_code}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn state_prefix(&self) -> &str {
        &self.0[..2]
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for FipsCode {
    type Err = FipsCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_digits(s, 5) {
            return Err(FipsCodeError::Full(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for FipsCode {
    type Error = FipsCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FipsCode> for String {
    fn from(value: FipsCode) -> Self {
        value.0
    }
}

impl Display for FipsCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipsRecord {
    pub county_name: String,
    pub fips_code: FipsCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Participation {
    Programs(ProgramList),
    NotAMember,
    /// Member whose detail page had no program table or could not be fetched.
    Unavailable,
}

impl Participation {
    pub fn program_count(&self) -> usize {
        match self {
            Self::Programs(programs) => programs.len(),
            Self::NotAMember | Self::Unavailable => 0,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Programs(programs) => programs.join(", "),
            Self::NotAMember => NOT_A_MEMBER.to_string(),
            Self::Unavailable => "-".to_string(),
        }
    }
}

impl Serialize for Participation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Programs(programs) => {
                let mut seq = serializer.serialize_seq(Some(programs.len()))?;
                for program in programs {
                    seq.serialize_element(program)?;
                }
                seq.end()
            }
            Self::NotAMember => serializer.serialize_str(NOT_A_MEMBER),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedCountyRow {
    pub county_name: String,
    pub fips_code: FipsCode,
    pub join_date: String,
    pub program_participation: Participation,
    pub program_count: usize,
    pub decade: DecadeClass,
}

impl MergedCountyRow {
    pub fn is_member(&self) -> bool {
        self.program_participation != Participation::NotAMember
    }
}
