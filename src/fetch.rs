//! Rule source fetching over HTTP(S) and from the local filesystem.
//!
//! Every source is loaded completely before any line is handed out: a failed
//! or truncated download is an error, never a shorter list.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::pipeline::LineSource;
use crate::{Error, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of retries after a failed transfer.
pub const DEFAULT_RETRIES: u32 = 2;

const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Fetcher for rule sources.
///
/// Source identifiers starting with `http://` or `https://` are downloaded;
/// `file://` URLs and anything else are read as local paths.
///
/// # Example
///
/// ```ignore
/// use domains2providers::fetch::Fetcher;
/// use domains2providers::pipeline::LineSource;
///
/// let fetcher = Fetcher::new()?;
/// let lines = fetcher.fetch_lines("https://example.com/list.txt")?;
/// ```
pub struct Fetcher {
    client: reqwest::blocking::Client,
    retries: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Create a fetcher with the default timeout and retry count.
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_RETRIES)
    }

    /// Create a fetcher with a custom timeout and retry count.
    pub fn with_config(timeout: Duration, retries: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("domains2providers/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, retries))
    }

    fn with_client(client: reqwest::blocking::Client, retries: u32) -> Self {
        Self {
            client,
            retries,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Set the pause between retries.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Fetch the full body of a source as text.
    pub fn fetch_text(&self, source: &str) -> Result<String> {
        if is_remote(source) {
            self.download(source)
        } else {
            let path = source.strip_prefix("file://").unwrap_or(source);
            read_local(Path::new(path))
        }
    }

    fn download(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.download_once(url) {
                Ok(body) => return Ok(body),
                // Status errors are answers from the server, retrying won't change them
                Err(e @ Error::Status { .. }) => return Err(e),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    log::warn!(
                        "load {} failed ({}), retry {}/{}",
                        url,
                        e,
                        attempt,
                        self.retries
                    );
                    thread::sleep(self.retry_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn download_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        log::debug!("downloaded {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

impl LineSource for Fetcher {
    fn fetch_lines(&self, source: &str) -> Result<Vec<String>> {
        let body = self.fetch_text(source)?;
        Ok(split_lines(&body))
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_local(path: &Path) -> Result<String> {
    let body = fs::read_to_string(path)?;
    log::debug!("read {:?} ({} bytes)", path, body.len());
    Ok(body)
}

/// Split a body into lines, dropping `\r` from CRLF endings.
pub fn split_lines(body: &str) -> Vec<String> {
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
