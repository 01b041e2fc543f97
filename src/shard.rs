use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;
use tracing::debug;
use tracing::info;

use crate::error::Result;
use crate::output;
use crate::profiles::ProfileBatch;
use crate::profiles::UserProfile;

pub const SHARD_SIZE: usize = 1000;

/// A contiguous slice of a batch, serialized with the original batch keys so
/// concatenating all shards reproduces the batch exactly.
struct Shard<'a>(&'a [(u64, UserProfile)]);

impl Serialize for Shard<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (idx, profile) in self.0 {
            map.serialize_entry(&idx.to_string(), profile)?;
        }
        map.end()
    }
}

pub fn shard_path(out_dir: &Path, stem: &str, k: usize) -> PathBuf {
    out_dir.join(format!("{stem}_{k}.json"))
}

/// Writes the batch as `<stem>_0.json`, `<stem>_1.json`, ... with at most
/// [`SHARD_SIZE`] entries each. The final shard holds the remainder; an empty
/// batch produces no files. Returns the number of shard files written.
pub fn write_shards(batch: &ProfileBatch, out_dir: &Path, stem: &str) -> Result<usize> {
    if !out_dir.try_exists()? {
        fs::create_dir_all(out_dir)?;
    }
    let mut count = 0usize;
    for (k, chunk) in batch.entries.chunks(SHARD_SIZE).enumerate() {
        let path = shard_path(out_dir, stem, k);
        debug!("shard {}: {} entries -> {:?}", k, chunk.len(), path);
        output::write_json_atomic(&path, &Shard(chunk))?;
        count += 1;
    }
    info!("wrote {} shard file(s) for {} entries", count, batch.len());
    Ok(count)
}
