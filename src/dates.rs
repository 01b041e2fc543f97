use std::collections::BTreeMap;

use chrono::DateTime;
use rand::Rng;
use tracing::info;
use tracing::warn;

use crate::error::Result;
use crate::error::SeedGenError;

/// 1994-07-03T11:42:52Z, the earliest allowable "added" instant for any item.
pub const FLOOR_EPOCH: i64 = 773228572;

pub const ADDED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// For every item, draws one uniform instant in `[FLOOR_EPOCH, min_ts)` and
/// formats it with [`ADDED_DATE_FORMAT`].
///
/// Items whose earliest rating is at or before the floor get a window of
/// `[0, min_ts)` instead, so the generated date still strictly precedes the
/// earliest rating. An item whose earliest rating is at or before the Unix
/// epoch has no valid window at all and fails the run.
///
/// Items are visited in key order, so a seeded rng reproduces the same
/// mapping for the same input.
pub fn generate_added_dates<R: Rng>(
    earliest: &BTreeMap<String, i64>,
    rng: &mut R,
) -> Result<BTreeMap<String, String>> {
    let mut dates = BTreeMap::new();
    for (item_id, &min_ts) in earliest {
        let lo = if min_ts > FLOOR_EPOCH {
            FLOOR_EPOCH
        } else {
            warn!("item {item_id}: earliest rating {min_ts} predates the floor, clamping to 0");
            0
        };
        if min_ts <= lo {
            return Err(SeedGenError::General(format!(
                "item {item_id}: earliest rating timestamp {min_ts} leaves no window for an added date"
            )));
        }
        let ts = rng.gen_range(lo..min_ts);
        let instant = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
            SeedGenError::Internal(format!("timestamp {ts} is out of datetime range"))
        })?;
        dates.insert(item_id.clone(), instant.format(ADDED_DATE_FORMAT).to_string());
    }
    info!("generated added dates for {} items", dates.len());
    Ok(dates)
}
