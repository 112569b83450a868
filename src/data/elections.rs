//
// Parse the elections data file: a JSON array of
//   { "year": 2016, "name": "2016 Legislator Election", "regions": [{ "name": "全國" }] }
//

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::data;
use crate::defs::{ElectionRecord, RawRegion};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct ElectionRow {
    year: u32,
    // may be null in the source data; those rows are skipped
    name: Option<String>,
    regions: Vec<RawRegion>,
}

pub fn load(path: &Path) -> Result<Vec<ElectionRecord>> {
    let rdr = data::open(path)?;
    let records = from_reader(rdr, path)?;
    info!("read {} elections from {}", records.len(), path.display());
    Ok(records)
}

pub fn from_reader<R: Read>(rdr: R, path: &Path) -> Result<Vec<ElectionRecord>> {
    let rows: Vec<ElectionRow> = serde_json::from_reader(rdr).map_err(|e| Error::json(path, e))?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let name = match row.name {
            Some(name) => name,
            None => {
                debug!("skipping unnamed election record for {}", row.year);
                continue;
            }
        };
        records.push(ElectionRecord {
            year: row.year,
            name,
            regions: row.regions,
        });
    }
    Ok(records)
}
