use std::collections::BTreeMap;
use std::collections::HashSet;
use std::io;

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::error::SeedGenError;

/// One row of the ratings table. The table is read-only seed data and is
/// never written back.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub timestamp: i64,
}

/// Folds the ratings table into the minimum observed timestamp per item.
/// Single pass, items may repeat in the input. Keyed ordering keeps
/// downstream iteration independent of hash state, so seeded runs draw the
/// same instant for the same item.
pub fn earliest_by_item<R: io::Read>(rdr: R) -> Result<BTreeMap<String, i64>> {
    let mut rdr = csv::Reader::from_reader(rdr);
    let mut earliest: BTreeMap<String, i64> = BTreeMap::new();
    let mut rows = 0usize;
    for res in rdr.deserialize() {
        let rec: RatingRecord = res?;
        rows += 1;
        earliest
            .entry(rec.item_id)
            .and_modify(|min| {
                if rec.timestamp < *min {
                    *min = rec.timestamp
                }
            })
            .or_insert(rec.timestamp);
    }
    info!("{} rating rows folded into {} distinct items", rows, earliest.len());
    Ok(earliest)
}

/// Deduplicated user identifiers in first-seen order. The position in the
/// returned vec becomes the profile's batch index later on.
pub fn unique_users<R: io::Read>(rdr: R) -> Result<Vec<String>> {
    let mut rdr = csv::Reader::from_reader(rdr);
    let mut seen: HashSet<String> = HashSet::new();
    let mut users = Vec::new();
    for res in rdr.deserialize() {
        let rec: RatingRecord = res?;
        if seen.insert(rec.user_id.clone()) {
            users.push(rec.user_id);
        }
    }
    info!("{} unique users", users.len());
    Ok(users)
}

/// Unions the identifiers of a supplementary missing-users mapping into
/// `users`. The mapping is a JSON object whose values are identifier strings;
/// anything else fails the run. Returns the number of identifiers added.
pub fn union_missing_users<R: io::Read>(users: &mut Vec<String>, rdr: R) -> Result<usize> {
    let raw: serde_json::Value = serde_json::from_reader(rdr)?;
    let obj = raw.as_object().ok_or_else(|| {
        SeedGenError::General("missing-users file must be a JSON object".to_string())
    })?;

    let mut seen: HashSet<String> = users.iter().cloned().collect();
    let mut added = 0usize;
    for (key, value) in obj {
        let id = value.as_str().ok_or_else(|| {
            SeedGenError::General(format!("missing-users entry {key:?} is not a string"))
        })?;
        if id.is_empty() {
            return Err(SeedGenError::General(format!(
                "missing-users entry {key:?} is an empty identifier"
            )));
        }
        if seen.insert(id.to_string()) {
            users.push(id.to_string());
            added += 1;
        }
    }
    info!("{} missing users added, {} total", added, users.len());
    Ok(added)
}
