//! Working directory preparation and copy helpers.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use tracing::debug;

/// Remove the SDK output directory and leave an empty temp directory.
pub fn prepare_workspace(sdk_repo: &Utf8Path, sdk_temp: &Utf8Path) -> anyhow::Result<()> {
    if sdk_repo.exists() {
        debug!(path = %sdk_repo, "removing previous SDK output");
        fs::remove_dir_all(sdk_repo).with_context(|| format!("remove {}", sdk_repo))?;
    }
    empty_dir(sdk_temp)
}

/// Make `dir` an existing, empty directory.
pub fn empty_dir(dir: &Utf8Path) -> anyhow::Result<()> {
    if dir.exists() {
        for entry in dir
            .read_dir_utf8()
            .with_context(|| format!("read dir {}", dir))?
        {
            let entry = entry.with_context(|| format!("read dir entry in {}", dir))?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(path).with_context(|| format!("remove {}", path))?;
            } else {
                fs::remove_file(path).with_context(|| format!("remove {}", path))?;
            }
        }
    }
    fs::create_dir_all(dir).with_context(|| format!("create_dir_all {}", dir))
}

/// Recursively copy `src` into `dest`, creating directories and overwriting files.
/// Returns the number of files copied.
pub fn copy_dir_recursive(src: &Utf8Path, dest: &Utf8Path) -> anyhow::Result<usize> {
    fs::create_dir_all(dest).with_context(|| format!("create_dir_all {}", dest))?;
    let mut copied = 0;
    for entry in src
        .read_dir_utf8()
        .with_context(|| format!("read dir {}", src))?
    {
        let entry = entry.with_context(|| format!("read dir entry in {}", src))?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir_recursive(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("copy {} to {}", entry.path(), target))?;
            copied += 1;
        }
    }
    Ok(copied)
}
