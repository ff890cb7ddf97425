use reqwest::{RequestBuilder, Url};

use crate::reader::HttpReader;
use crate::stream::RangeStream;
use crate::Error;

/// Seekable stream over a http/https hosted resource.
pub type HttpStream = RangeStream<HttpReader>;

/// Opens remote resources as seekable streams.
#[derive(Debug, Clone, Default)]
pub struct Client {
    http: reqwest::Client,
    block_size: u64,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already configured reqwest client for all requests.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self {
            http,
            block_size: 0,
        }
    }

    /// Set size of the blocks to cache reads in.
    ///
    /// Every read is then extended to whole blocks and every block is only
    /// fetched once per stream. The default of 0 sends one range request per read.
    #[must_use]
    pub fn block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    /// The reqwest client, for building request templates to [`Client::open`].
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Open a stream using a plain GET request as template.
    pub async fn get(&self, url: Url) -> Result<HttpStream, Error> {
        self.open(self.http.get(url)).await
    }

    /// Probe the resource and open a stream using RequestBuilder as template
    /// for all range requests.
    pub async fn open(&self, request: RequestBuilder) -> Result<HttpStream, Error> {
        let reader = HttpReader::open(request).await?;
        log::debug!(
            "Opened {} ({} bytes, block size {})",
            reader.url(),
            reader.content_length(),
            self.block_size
        );
        let content_length = reader.content_length();
        RangeStream::new(reader, content_length, self.block_size)
    }
}
