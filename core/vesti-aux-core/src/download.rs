//! Fetching remote archives to disk

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
#[cfg(feature = "http")]
use std::time::Duration;

use anyhow::{Context, Result};
#[cfg(feature = "http")]
use tracing::debug;

/// Writes the resource at `url` to `dest`, replacing whatever is there.
pub trait Downloader {
    /// Returns the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Copy a response body into a freshly truncated file.
pub fn write_body(mut body: impl io::Read, dest: &Path) -> Result<u64> {
    let file =
        File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
    let mut writer = BufWriter::new(file);
    let written =
        io::copy(&mut body, &mut writer).with_context(|| format!("writing {}", dest.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing {}", dest.display()))?;
    Ok(written)
}

/// Blocking HTTP(S) downloader. One attempt per URL, no retries.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpDownloader {
    pub const USER_AGENT: &'static str = concat!("vesti-aux/", env!("CARGO_PKG_VERSION"));

    /// `timeout` of `None` waits as long as the server keeps the connection open.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()
            .with_context(|| format!("downloading {url}"))?;

        let written = write_body(response, dest)?;
        debug!(url, bytes = written, dest = %dest.display(), "download finished");
        Ok(written)
    }
}
