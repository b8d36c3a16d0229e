//! Font sources: the built-in list and JSON manifests

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// File name every download is written to inside the destination directory.
pub const ARCHIVE_FILE_NAME: &str = "font.zip";

/// A font family and the URL of its zip archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSource {
    pub name: Cow<'static, str>,
    pub url: Cow<'static, str>,
}

impl FontSource {
    pub const fn new_static(name: &'static str, url: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            url: Cow::Borrowed(url),
        }
    }

    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            url: Cow::Owned(url.into()),
        }
    }
}

/// Fonts fetched when no manifest is given, in fetch order.
pub const DEFAULT_FONTS: &[FontSource] = &[
    FontSource::new_static(
        "Tex Gyre Pagella",
        "https://www.fontsquirrel.com/fonts/download/TeX-Gyre-Pagella",
    ),
    FontSource::new_static(
        "STIX Two Math",
        "https://font.download/dl/font/stix-two-math.zip",
    ),
];

/// Read a JSON array of `{ "name": ..., "url": ... }` objects.
pub fn load_manifest(path: &Path) -> Result<Vec<FontSource>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading font manifest {}", path.display()))?;
    parse_manifest(&raw).with_context(|| format!("invalid font manifest {}", path.display()))
}

fn parse_manifest(raw: &str) -> Result<Vec<FontSource>> {
    let sources: Vec<FontSource> = serde_json::from_str(raw)?;

    if sources.is_empty() {
        bail!("manifest lists no fonts");
    }

    for (idx, source) in sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            bail!("entry {idx} has an empty name");
        }
        if source.url.trim().is_empty() {
            bail!("entry {idx} ({}) has an empty url", source.name);
        }
    }

    Ok(sources)
}
