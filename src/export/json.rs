//! Pretty-printed JSON file output

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::pipeline::ProcessingResult;

/// Serialize `value` as pretty JSON into `<dir>/<file_name>`
///
/// The directory is created when missing and an existing file is replaced.
pub fn write_pretty_json<T>(dir: &Path, file_name: &str, value: &T) -> ProcessingResult<PathBuf>
where
    T: Serialize + ?Sized,
{
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    debug!("Wrote {}", path.display());
    Ok(path)
}
