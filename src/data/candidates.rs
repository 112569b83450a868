//
// Parse the candidate results file. Two layouts are accepted:
//
// JSON, one entry per constituency; `candidates` may be null:
//   [{ "election": "...", "region": "...", "constituency": "...", "candidates": [...] }]
//
// CSV, one row per candidate:
//   election,region,constituency,name,party_name,num_of_vote,rate_of_vote,is_elected,income_total,outcome_total
//

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::data::{self, Format};
use crate::defs::{Candidate, Finance, FinanceSide, Tally};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateKey {
    pub election: String,
    pub region: String,
    pub constituency: String,
}

impl CandidateKey {
    pub fn new(election: &str, region: &str, constituency: &str) -> CandidateKey {
        CandidateKey {
            election: election.to_string(),
            region: region.to_string(),
            constituency: constituency.to_string(),
        }
    }
}

// candidates reported per constituency. a key that maps to `None` was
// listed with null candidates; a key that is missing was never listed.
// both read back as "no candidates reported"
#[derive(Debug, Clone, Default)]
pub struct CandidateTable {
    entries: HashMap<CandidateKey, Option<Vec<Candidate>>>,
}

impl CandidateTable {
    pub fn new() -> CandidateTable {
        CandidateTable::default()
    }

    pub fn insert(&mut self, key: CandidateKey, candidates: Option<Vec<Candidate>>) {
        if self.entries.contains_key(&key) {
            warn!(
                "duplicate entry for {} / {} / {}; keeping the later one",
                key.election, key.region, key.constituency
            );
        }
        self.entries.insert(key, candidates);
    }

    pub fn push(&mut self, key: CandidateKey, candidate: Candidate) {
        self.entries
            .entry(key)
            .or_insert_with(|| Some(Vec::new()))
            .get_or_insert_with(Vec::new)
            .push(candidate);
    }

    pub fn get(&self, election: &str, region: &str, constituency: &str) -> Option<Vec<Candidate>> {
        self.entries
            .get(&CandidateKey::new(election, region, constituency))
            .cloned()
            .and_then(|candidates| candidates)
    }

    pub fn constituencies(&self) -> usize {
        self.entries.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.entries.values().flatten().map(Vec::len).sum()
    }
}

#[derive(Debug, Deserialize)]
struct CandidateEntry {
    election: String,
    region: String,
    constituency: String,
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    election: String,
    region: String,
    constituency: String,
    name: String,
    party_name: String,
    num_of_vote: String,
    rate_of_vote: String,
    is_elected: String,
    #[serde(default)]
    income_total: String,
    #[serde(default)]
    outcome_total: String,
}

impl CandidateRow {
    fn into_parts(self) -> (CandidateKey, Candidate) {
        let finance = finance_from_totals(&self.income_total, &self.outcome_total);
        let key = CandidateKey {
            election: self.election,
            region: self.region,
            constituency: self.constituency,
        };
        let candidate = Candidate {
            is_elected: parse_flag(&self.is_elected),
            name: self.name,
            party_name: self.party_name,
            num_of_vote: Tally::Text(self.num_of_vote),
            rate_of_vote: self.rate_of_vote,
            finance,
        };
        (key, candidate)
    }
}

fn parse_flag(s: &str) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "當選" => true,
        _ => false,
    }
}

// two blank totals mean the candidate filed nothing at all
fn finance_from_totals(income: &str, outcome: &str) -> Option<Finance> {
    if income.is_empty() && outcome.is_empty() {
        return None;
    }
    let side = |total: &str| {
        if total.is_empty() {
            FinanceSide::no_data()
        } else {
            FinanceSide {
                total: total.to_string(),
                items: Vec::new(),
            }
        }
    };
    Some(Finance {
        income: side(income),
        outcome: side(outcome),
    })
}

pub fn load(path: &Path) -> Result<CandidateTable> {
    let format = data::format_of(path)?;
    let rdr = data::open(path)?;
    let table = match format {
        Format::Json => from_json(rdr, path)?,
        Format::Csv => from_csv(rdr, path)?,
    };
    info!(
        "read {} candidates in {} constituencies from {}",
        table.candidate_count(),
        table.constituencies(),
        path.display()
    );
    Ok(table)
}

pub fn from_json<R: Read>(rdr: R, path: &Path) -> Result<CandidateTable> {
    let entries: Vec<CandidateEntry> =
        serde_json::from_reader(rdr).map_err(|e| Error::json(path, e))?;
    let mut table = CandidateTable::new();
    for entry in entries {
        let key = CandidateKey {
            election: entry.election,
            region: entry.region,
            constituency: entry.constituency,
        };
        table.insert(key, entry.candidates);
    }
    Ok(table)
}

pub fn from_csv<R: Read>(rdr: R, path: &Path) -> Result<CandidateTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut table = CandidateTable::new();
    for result in rdr.deserialize() {
        let row: CandidateRow = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let (key, candidate) = row.into_parts();
        table.push(key, candidate);
    }
    Ok(table)
}
