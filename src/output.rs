use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::error::SeedGenError;

/// Opens a file for reading, mapping a missing file to its own error variant.
pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => SeedGenError::FileNotFound(path.display().to_string()),
        _ => SeedGenError::IOError(err),
    })?;
    Ok(BufReader::new(file))
}

/// Serializes `value` to a `.tmp` sibling and renames it into place, so a
/// failed run never leaves a partial file at `path`.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = tmp_path(path);
    debug!("writing {:?} via {:?}", path, tmp);
    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}
