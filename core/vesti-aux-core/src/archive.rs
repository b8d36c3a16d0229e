//! Zip extraction

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;
use zip::ZipArchive;

/// Extract every entry of the zip at `archive` under `dest`.
///
/// Existing files are overwritten. Returns the extracted file paths
/// relative to `dest`, in archive order; directory entries are created
/// but not listed.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive).with_context(|| format!("opening {}", archive.display()))?;
    let mut zip = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("{} is not a zip archive", archive.display()))?;

    let mut extracted = Vec::with_capacity(zip.len());
    for idx in 0..zip.len() {
        let mut entry = zip
            .by_index(idx)
            .with_context(|| format!("reading entry {idx} of {}", archive.display()))?;

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| anyhow!("refusing to extract unsafe path `{}`", entry.name()))?;
        let target = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("creating {}", target.display()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut out =
            File::create(&target).with_context(|| format!("creating {}", target.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("extracting {}", relative.display()))?;

        extracted.push(relative);
    }

    debug!(
        archive = %archive.display(),
        files = extracted.len(),
        "archive extracted"
    );
    Ok(extracted)
}
