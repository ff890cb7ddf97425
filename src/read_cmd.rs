use anyhow::{Context, Result};
use httpseekr::{Client, Whence};
use log::*;
use reqwest::header::HeaderMap;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

use crate::string_utils::*;

const READ_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub input: Url,
    pub headers: HeaderMap,
    pub offset: i64,
    pub whence: Whence,
    pub length: Option<u64>,
    pub block_size: u64,
    pub output: Option<PathBuf>,
}

pub async fn read(opts: Options) -> Result<()> {
    let client = Client::new().block_size(opts.block_size);
    let request = client
        .http()
        .get(opts.input.clone())
        .headers(opts.headers.clone());
    let mut stream = client
        .open(request)
        .await
        .context(format!("Failed to open {}", opts.input))?;
    info!(
        "Opened {} ({})",
        opts.input,
        size_to_str(stream.content_length())
    );
    if let Some(version) = stream.get_ref().version() {
        debug!("Reads are bound to {}", version);
    }

    let position = stream
        .seek(opts.offset, opts.whence)
        .context("Failed to seek")?;
    let length = opts
        .length
        .unwrap_or_else(|| stream.content_length().saturating_sub(position));

    let mut output: Box<dyn AsyncWrite + Unpin + Send> = match &opts.output {
        Some(path) => Box::new(
            File::create(path)
                .await
                .context(format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };

    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut total_read: u64 = 0;
    while total_read < length {
        let size = std::cmp::min(buf.len() as u64, length - total_read) as usize;
        let outcome = stream
            .read(&mut buf[..size])
            .await
            .context(format!("Failed to read at position {}", stream.position()))?;
        output
            .write_all(&buf[..outcome.len])
            .await
            .context("Failed to write output")?;
        total_read += outcome.len as u64;
        if outcome.end_of_stream {
            break;
        }
    }
    output.flush().await.context("Failed to write output")?;
    if stream.block_size() > 0 {
        debug!(
            "Fetched {} of {} blocks",
            stream.cache().cached_blocks(),
            stream.cache().block_count()
        );
    }
    stream.close().context("Failed to close stream")?;

    info!(
        "Read {} starting from position {}",
        size_to_str(total_read),
        position
    );
    if total_read < length {
        info!("Reached end of resource before {} was read", size_to_str(length));
    }
    Ok(())
}
