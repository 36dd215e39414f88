use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

pub const NOT_A_MEMBER: &str = "Not a member";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecadeBucket {
    Seventies,
    Eighties,
    Nineties,
    TwoThousands,
    TwentyTens,
}

impl DecadeBucket {
    pub const ALL: [DecadeBucket; 5] = [
        DecadeBucket::Seventies,
        DecadeBucket::Eighties,
        DecadeBucket::Nineties,
        DecadeBucket::TwoThousands,
        DecadeBucket::TwentyTens,
    ];

    pub fn from_year(year: i32) -> Option<Self> {
        match year {
            1970..=1979 => Some(Self::Seventies),
            1980..=1989 => Some(Self::Eighties),
            1990..=1999 => Some(Self::Nineties),
            2000..=2009 => Some(Self::TwoThousands),
            2010..=2019 => Some(Self::TwentyTens),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Seventies => "70's",
            Self::Eighties => "80's",
            Self::Nineties => "90's",
            Self::TwoThousands => "2000's",
            Self::TwentyTens => "2010's",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecadeClass {
    Decade(DecadeBucket),
    NotAMember,
    /// Year token missing, non-numeric, or outside 1970..2020.
    Unclassified,
}

impl DecadeClass {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Decade(bucket) => bucket.label(),
            Self::NotAMember => NOT_A_MEMBER,
            Self::Unclassified => "Unclassified",
        }
    }
}

impl Display for DecadeClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for DecadeClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

pub fn classify_decade(join_date: &str) -> DecadeClass {
    if join_date == NOT_A_MEMBER {
        return DecadeClass::NotAMember;
    }
    let year_token = join_date.rsplit('/').next().unwrap_or_default().trim();
    match year_token.parse::<i32>() {
        Ok(year) => DecadeBucket::from_year(year)
            .map(DecadeClass::Decade)
            .unwrap_or(DecadeClass::Unclassified),
        Err(_) => DecadeClass::Unclassified,
    }
}
