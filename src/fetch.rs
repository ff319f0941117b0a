//! Retrieves an uploaded result sheet from disk or over HTTP.

use anyhow::{Context, Result};
use tracing::debug;

/// Reads `source` from a local path, or downloads it when it looks like a URL.
#[tracing::instrument]
pub fn fetch_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch_bytes(source)?
    } else {
        std::fs::read(source).with_context(|| format!("reading {source}"))?
    };
    debug!(bytes = bytes.len(), "Source bytes received");
    Ok(bytes)
}

pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_local_file() {
        let path = format!("{}/results_analyzer_fetch.csv", std::env::temp_dir().display());
        std::fs::write(&path, b"DEPNAME\n").unwrap();

        let bytes = fetch_source(&path).unwrap();
        assert_eq!(bytes, b"DEPNAME\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_fetch_missing_file_fails() {
        assert!(fetch_source("/nonexistent/results.xlsx").is_err());
    }
}
