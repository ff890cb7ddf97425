use async_trait::async_trait;
use reqwest::header::{
    IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, IF_UNMODIFIED_SINCE, RANGE,
};
use reqwest::{Method, RequestBuilder, StatusCode, Url};

use crate::probe::{Probe, VersionToken};
use crate::reader::{ReadAt, ReadOutcome};
use crate::Error;

/// Read a http/https hosted resource using range requests.
///
/// Every read issues one request built from the template given on open, with
/// a `Range` header selecting the wanted bytes and an `If-Range` header
/// carrying the version of the resource seen when it was opened. The response
/// body is drained within the read, no connection state is held in between.
pub struct HttpReader {
    request_builder: RequestBuilder,
    url: Url,
    content_length: u64,
    version: Option<VersionToken>,
    closed: bool,
}

/// Turn a GET request into a template for range requests, removing any range
/// and conditional headers it carries.
fn range_template(request_builder: RequestBuilder) -> Result<RequestBuilder, Error> {
    let (client, request) = request_builder.build_split();
    let mut request = request?;
    if *request.method() != Method::GET {
        return Err(Error::UnsupportedMethod(request.method().clone()));
    }
    let headers = request.headers_mut();
    for name in [
        RANGE,
        IF_RANGE,
        IF_MATCH,
        IF_NONE_MATCH,
        IF_MODIFIED_SINCE,
        IF_UNMODIFIED_SINCE,
    ] {
        if headers.remove(&name).is_some() {
            log::debug!("Dropped {} header from request template", name);
        }
    }
    Ok(RequestBuilder::from_parts(client, request))
}

impl HttpReader {
    /// Probe the resource and create a reader using RequestBuilder as template
    /// for the range requests.
    ///
    /// The template must be a GET request. Range and conditional headers of
    /// the template are replaced by the reader.
    pub async fn open(request_builder: RequestBuilder) -> Result<Self, Error> {
        let request_builder = range_template(request_builder)?;
        let probe = Probe::fetch(
            request_builder
                .try_clone()
                .ok_or(Error::RequestNotClonable)?,
        )
        .await?;
        Self::with_template(request_builder, probe)
    }

    /// Probe the resource and create a reader using default parameters for the request.
    pub async fn from_url(url: Url) -> Result<Self, Error> {
        Self::open(reqwest::Client::new().get(url)).await
    }

    /// Create a reader from an already performed probe.
    pub fn from_probe(request_builder: RequestBuilder, probe: Probe) -> Result<Self, Error> {
        Self::with_template(range_template(request_builder)?, probe)
    }

    fn with_template(request_builder: RequestBuilder, probe: Probe) -> Result<Self, Error> {
        if !probe.accepts_ranges {
            return Err(Error::RangeNotSupported { url: probe.url });
        }
        let content_length = probe.content_length.ok_or(Error::UnknownContentLength)?;
        Ok(Self {
            request_builder,
            url: probe.url,
            content_length,
            version: probe.version,
            closed: false,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Version of the resource which all reads are bound to, if the server
    /// provided any.
    pub fn version(&self) -> Option<&VersionToken> {
        self.version.as_ref()
    }

    fn range_request(&self, offset: u64, size: u64) -> Result<RequestBuilder, Error> {
        // Range end is inclusive.
        let end_offset = offset + size - 1;
        let mut request = self
            .request_builder
            .try_clone()
            .ok_or(Error::RequestNotClonable)?
            .header(RANGE, format!("bytes={}-{}", offset, end_offset));
        if let Some(version) = &self.version {
            request = request.header(IF_RANGE, version.header_value().clone());
        }
        Ok(request)
    }
}

#[async_trait]
impl ReadAt for HttpReader {
    type Error = Error;

    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<ReadOutcome, Error> {
        if self.closed {
            return Err(Error::StreamClosed);
        }
        if buf.is_empty() {
            return Ok(ReadOutcome::filled(0));
        }
        if offset >= self.content_length {
            log::trace!(
                "Read at offset {} is past the end ({})",
                offset,
                self.content_length
            );
            return Ok(ReadOutcome::end(0));
        }
        let size = std::cmp::min(buf.len() as u64, self.content_length - offset) as usize;
        log::debug!(
            "Reading from remote, starting at offset {} with size {}...",
            offset,
            size
        );

        let mut response = self.range_request(offset, size as u64)?.send().await?;
        match response.status() {
            StatusCode::PARTIAL_CONTENT => {}
            StatusCode::RANGE_NOT_SATISFIABLE => return Ok(ReadOutcome::end(0)),
            StatusCode::OK if self.version.is_some() => return Err(Error::ResourceChanged),
            status => return Err(Error::UnexpectedStatus(status)),
        }

        let mut filled = 0;
        while filled < size {
            match response.chunk().await? {
                Some(chunk) => {
                    let n = std::cmp::min(chunk.len(), size - filled);
                    buf[filled..filled + n].copy_from_slice(&chunk[..n]);
                    filled += n;
                }
                None => break,
            }
        }

        let end_of_stream = filled < buf.len() || offset + filled as u64 >= self.content_length;
        log::trace!(
            "Read {} bytes at offset {} (end of stream: {})",
            filled,
            offset,
            end_of_stream
        );
        Ok(ReadOutcome::new(filled, end_of_stream))
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closed = true;
        Ok(())
    }
}
