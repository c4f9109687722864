//! Version file persistence.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use sdkbuilder_types::VersionRecord;

/// Read the version record at `path`. `Ok(None)` when the file does not exist.
pub fn load_version(path: &Utf8Path) -> anyhow::Result<Option<VersionRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    let record = serde_json::from_str(&contents)
        .with_context(|| format!("parse version file {}", path))?;
    Ok(Some(record))
}

/// Write `record` as pretty JSON with two-space indentation.
pub fn save_version(path: &Utf8Path, record: &VersionRecord) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create parent dir for {}", path))?;
    }
    let json = serde_json::to_string_pretty(record).context("serialize version record")?;
    fs::write(path, json).with_context(|| format!("write {}", path))
}
