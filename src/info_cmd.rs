use anyhow::{Context, Result};
use httpseekr::Probe;
use log::*;
use reqwest::header::HeaderMap;
use url::Url;

use crate::string_utils::*;

pub fn print_probe(probe: &Probe) {
    info!("Resource: {}", probe.url);
    match probe.content_length {
        Some(length) => info!("  Size: {}", size_to_str(length)),
        None => info!("  Size: unknown"),
    }
    info!(
        "  Range requests: {}",
        if probe.accepts_ranges {
            "supported"
        } else {
            "not supported"
        }
    );
    match &probe.version {
        Some(version) => info!("  Version: {}", version),
        None => info!("  Version: none (changes will go unnoticed)"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub input: Url,
    pub headers: HeaderMap,
}

pub async fn info(opts: Options) -> Result<()> {
    let request = reqwest::Client::new()
        .get(opts.input.clone())
        .headers(opts.headers);
    let probe = Probe::fetch(request)
        .await
        .context(format!("Failed to probe {}", opts.input))?;
    print_probe(&probe);
    Ok(())
}
