//! Turns raw election and candidate records into display-ready view models.
//!
//! Everything here is pure: the same records always produce the same view
//! models, and nothing in this module can fail.

use std::borrow::Cow;

use itertools::Itertools;

use crate::defs::*;

pub const NATIONWIDE: &str = "全國";
pub const FIRST_CONSTITUENCY: &str = "第01選區";
pub const ELECTED_MARKER: &str = "(當選)";

// exact-match election name -> localized title
const ELECTION_TITLES: &[(&str, &str)] = &[
    ("2016 Legislator Election", "立法委員選舉"),
    ("2016 President Election", "總統選舉"),
];

/// Chooses which fixed constituency set a region gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRule {
    /// Only the region named `全國` is nationwide.
    Exact,
    /// Every region is treated as nationwide, matching the pages the site
    /// published before the region check was corrected.
    Legacy,
}

impl Default for RegionRule {
    fn default() -> RegionRule {
        RegionRule::Exact
    }
}

impl RegionRule {
    pub fn is_nationwide(self, region_name: &str) -> bool {
        match self {
            RegionRule::Exact => region_name == NATIONWIDE,
            RegionRule::Legacy => true,
        }
    }
}

// the whitespace set of a JS regex `\s`: Unicode White_Space plus the
// byte-order mark, minus NEL (U+0085)
fn is_slug_space(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if is_slug_space(c) { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

pub fn display_title(name: &str) -> &str {
    ELECTION_TITLES
        .iter()
        .find(|&&(raw, _)| raw == name)
        .map_or(name, |&(_, title)| title)
}

pub fn constituencies_for_region(region_name: &str, rule: RegionRule) -> Vec<Constituency> {
    if rule.is_nationwide(region_name) {
        vec![Constituency::named(NATIONWIDE)]
    } else {
        vec![Constituency::named(FIRST_CONSTITUENCY)]
    }
}

pub fn build_election(raw: &ElectionRecord, rule: RegionRule) -> Election {
    let regions = raw
        .regions
        .iter()
        .map(|region| Region {
            name: region.name.clone(),
            constituencies: constituencies_for_region(&region.name, rule),
        })
        .collect();
    Election {
        year: raw.year,
        raw_name: raw.name.clone(),
        slug: slug(&raw.name),
        display_title: display_title(&raw.name).to_string(),
        regions,
    }
}

/// Distinct years, in the order they first appear.
pub fn group_years<T: Dated>(elections: &[T]) -> Vec<u32> {
    elections.iter().map(Dated::year).unique().collect()
}

pub fn format_candidate_block(candidate: &Candidate) -> CandidateBlock {
    let finance = match candidate.finance {
        Some(ref f) => Cow::Borrowed(f),
        None => Cow::Owned(Finance::placeholder()),
    };
    CandidateBlock {
        candidate,
        elected_marker: if candidate.is_elected { ELECTED_MARKER } else { "" },
        finance,
    }
}
