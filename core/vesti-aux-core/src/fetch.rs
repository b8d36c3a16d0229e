//! Download-extract-cleanup pipeline for font archives

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::archive::extract_archive;
use crate::download::Downloader;
use crate::fonts::{FontSource, ARCHIVE_FILE_NAME};

/// What one font fetch left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    pub name: String,
    pub url: String,
    /// Where the archive was staged (removed once extracted).
    pub archive: PathBuf,
    pub destination: PathBuf,
    /// Extracted files, relative to `destination`.
    pub extracted: Vec<PathBuf>,
    pub bytes: u64,
}

/// Removes the staged archive when dropped, whatever happened in between.
struct StagedArchive<'a> {
    path: &'a Path,
}

impl Drop for StagedArchive<'_> {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(err) = fs::remove_file(self.path) {
            warn!(archive = %self.path.display(), error = %err, "could not remove archive");
        }
    }
}

/// Download `source` into `dest_dir/font.zip`, unpack it into `dest_dir`,
/// and remove the archive. Progress notices are written to `notices`.
pub fn fetch_font<D, W>(
    source: &FontSource,
    dest_dir: &Path,
    downloader: &D,
    notices: &mut W,
) -> Result<FetchReport>
where
    D: Downloader + ?Sized,
    W: Write + ?Sized,
{
    let archive = dest_dir.join(ARCHIVE_FILE_NAME);
    let staged = StagedArchive { path: &archive };

    let bytes = downloader.download(&source.url, &archive)?;
    info!(font = %source.name, url = %source.url, bytes, "downloaded");
    writeln!(
        notices,
        "[NOTE]: Downloaded {} into {}",
        source.name,
        archive.display()
    )?;

    let extracted = extract_archive(&archive, dest_dir)?;
    drop(staged);

    info!(font = %source.name, files = extracted.len(), "extracted");
    writeln!(notices, "[NOTE]: Extracted into {}", dest_dir.display())?;

    Ok(FetchReport {
        name: source.name.to_string(),
        url: source.url.to_string(),
        archive,
        destination: dest_dir.to_path_buf(),
        extracted,
        bytes,
    })
}

/// Fetch every source in order. The first failure aborts the rest.
pub fn fetch_fonts<D, W>(
    sources: &[FontSource],
    dest_dir: &Path,
    downloader: &D,
    notices: &mut W,
) -> Result<Vec<FetchReport>>
where
    D: Downloader + ?Sized,
    W: Write + ?Sized,
{
    let mut reports = Vec::with_capacity(sources.len());
    for source in sources {
        reports.push(fetch_font(source, dest_dir, downloader, notices)?);
    }
    Ok(reports)
}
