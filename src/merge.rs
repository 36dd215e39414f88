use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::warn;

use crate::decade::{classify_decade, NOT_A_MEMBER};
use crate::types::{CountyMembershipRecord, FipsRecord, MergedCountyRow, Participation, ProgramList};

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergedTable {
    pub rows: Vec<MergedCountyRow>,
    pub unmatched_members: Vec<String>,
}

pub fn merge_counties(
    members: &[CountyMembershipRecord],
    programs: &BTreeMap<String, ProgramList>,
    fips: &[FipsRecord],
) -> MergedTable {
    let mut by_name: HashMap<&str, &CountyMembershipRecord> = HashMap::with_capacity(members.len());
    for member in members {
        if by_name.contains_key(member.county_name.as_str()) {
            warn!("duplicate member {} in directory, keeping the first", member.county_name);
            continue;
        }
        by_name.insert(member.county_name.as_str(), member);
    }

    let rows = fips
        .iter()
        .map(|county| {
            let (join_date, participation) = match by_name.get(county.county_name.as_str()) {
                Some(member) => {
                    let participation = programs
                        .get(&member.county_name)
                        .cloned()
                        .map(Participation::Programs)
                        .unwrap_or(Participation::Unavailable);
                    (member.join_date.clone(), participation)
                }
                None => (NOT_A_MEMBER.to_string(), Participation::NotAMember),
            };
            MergedCountyRow {
                county_name: county.county_name.clone(),
                fips_code: county.fips_code.clone(),
                decade: classify_decade(&join_date),
                join_date,
                program_count: participation.program_count(),
                program_participation: participation,
            }
        })
        .collect::<Vec<_>>();

    let known: HashSet<&str> = fips.iter().map(|f| f.county_name.as_str()).collect();
    let mut unmatched_members = Vec::new();
    for member in members {
        if !known.contains(member.county_name.as_str()) {
            warn!(
                "member {:?} has no matching FIPS county and is left off the map",
                member.county_name
            );
            unmatched_members.push(member.county_name.clone());
        }
    }

    MergedTable {
        rows,
        unmatched_members,
    }
}
