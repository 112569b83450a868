/*
 * core types
 */

use std::borrow::Cow;
use std::fmt;

// shown wherever a candidate reported no finance disclosure
pub const NO_DATA: &str = "無資料";

// an election record as handed over by the loader. the loader has
// already dropped records with a null name
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionRecord {
    pub year: u32,
    pub name: String,
    pub regions: Vec<RawRegion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRegion {
    pub name: String,
}

// a vote figure, displayed exactly as it arrived: upstream data carries
// either a bare number or an already-formatted string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tally {
    Number(serde_json::Number),
    Text(String),
}

impl Default for Tally {
    fn default() -> Tally {
        Tally::Text(String::new())
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tally::Number(n) => write!(f, "{}", n),
            Tally::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceItem {
    pub name: String,
    #[serde(default)]
    pub amount: Tally,
}

// one side (income or outcome) of a finance disclosure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSide {
    pub total: String,
    #[serde(default)]
    pub items: Vec<FinanceItem>,
}

impl FinanceSide {
    pub fn no_data() -> FinanceSide {
        FinanceSide {
            total: NO_DATA.to_string(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finance {
    pub income: FinanceSide,
    pub outcome: FinanceSide,
}

impl Finance {
    /// Stand-in for a candidate without a disclosure. Only ever built at
    /// display time; the stored candidate keeps `finance: None`.
    pub fn placeholder() -> Finance {
        Finance {
            income: FinanceSide::no_data(),
            outcome: FinanceSide::no_data(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub party_name: String,
    pub num_of_vote: Tally,
    pub rate_of_vote: String,
    pub is_elected: bool,
    #[serde(default)]
    pub finance: Option<Finance>,
}

// `candidates: None` means no candidates were reported, which is not the
// same thing as an empty list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constituency {
    pub name: String,
    pub candidates: Option<Vec<Candidate>>,
}

impl Constituency {
    pub fn named(name: &str) -> Constituency {
        Constituency {
            name: name.to_string(),
            candidates: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    pub constituencies: Vec<Constituency>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub year: u32,
    pub raw_name: String,
    pub slug: String,
    pub display_title: String,
    pub regions: Vec<Region>,
}

impl Election {
    pub fn url_prefix(&self) -> String {
        format!("elections/{}", self.slug)
    }
}

// anything that can be grouped by election year
pub trait Dated {
    fn year(&self) -> u32;
}

impl Dated for ElectionRecord {
    fn year(&self) -> u32 {
        self.year
    }
}

impl Dated for Election {
    fn year(&self) -> u32 {
        self.year
    }
}

// display strings for a single candidate block
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBlock<'a> {
    pub candidate: &'a Candidate,
    pub elected_marker: &'static str,
    pub finance: Cow<'a, Finance>,
}

// everything a constituency detail page is rendered from
#[derive(Debug, Clone)]
pub struct ConstituencyPage<'a> {
    pub election: &'a Election,
    pub url_prefix: String,
    pub region_name: &'a str,
    pub constituencies_of_region: &'a [Constituency],
    pub constituency: &'a Constituency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_displays_as_received() {
        let n: Tally = serde_json::from_str("12345").unwrap();
        assert_eq!(n.to_string(), "12345");
        let s: Tally = serde_json::from_str("\"12,345\"").unwrap();
        assert_eq!(s.to_string(), "12,345");
    }

    #[test]
    fn candidate_reads_camel_case_fields() {
        let c: Candidate = serde_json::from_str(
            r#"{"name":"王小明","partyName":"無黨籍","numOfVote":1024,
                "rateOfVote":"12.5%","isElected":true,"finance":null}"#,
        )
        .unwrap();
        assert_eq!(c.party_name, "無黨籍");
        assert_eq!(c.num_of_vote.to_string(), "1024");
        assert!(c.is_elected);
        assert_eq!(c.finance, None);
    }

    #[test]
    fn finance_items_default_to_empty() {
        let f: Finance = serde_json::from_str(
            r#"{"income":{"total":"100"},"outcome":{"total":"80","items":[{"name":"廣告","amount":"80"}]}}"#,
        )
        .unwrap();
        assert!(f.income.items.is_empty());
        assert_eq!(f.outcome.items[0].amount.to_string(), "80");
    }

    #[test]
    fn placeholder_has_no_data_on_both_sides() {
        let f = Finance::placeholder();
        assert_eq!(f.income.total, NO_DATA);
        assert_eq!(f.outcome.total, NO_DATA);
        assert!(f.income.items.is_empty() && f.outcome.items.is_empty());
    }
}
