use crate::ports::Archiver;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;
use fs_err as fs;
use tracing::info;

/// Writes `<dir name>.tar.gz` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzArchiver;

impl Archiver for TarGzArchiver {
    fn archive_dir(&self, src: &Utf8Path, dest_dir: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
        let name = src
            .file_name()
            .with_context(|| format!("cannot archive {}: no directory name", src))?;
        fs::create_dir_all(dest_dir).with_context(|| format!("create_dir_all {}", dest_dir))?;
        let dest = dest_dir.join(format!("{name}.tar.gz"));
        info!("Archiving {} to {}", src, dest);

        let file = fs::File::create(&dest).with_context(|| format!("create {}", dest))?;
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        builder
            .append_dir_all(name, src)
            .with_context(|| format!("archive {}", src))?;
        builder
            .into_inner()
            .and_then(|gz| gz.finish())
            .with_context(|| format!("finish {}", dest))?;
        Ok(dest)
    }
}
