use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_RANGES, CONTENT_LENGTH, ETAG, LAST_MODIFIED};
use reqwest::{Method, RequestBuilder, Url};
use std::fmt;

use crate::Error;

/// Validator identifying the version of a remote resource.
///
/// Passed verbatim as `If-Range` on every range request so that a resource
/// which changes while being read is detected instead of silently mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionToken {
    ETag(HeaderValue),
    LastModified(HeaderValue),
}

impl VersionToken {
    /// Pick a strong `ETag` if present, else the `Last-Modified` value.
    ///
    /// Weak entity tags cannot be used with `If-Range`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        match headers.get(ETAG).filter(|v| !v.is_empty()) {
            Some(etag) if !etag.as_bytes().starts_with(b"W/") => {
                return Some(Self::ETag(etag.clone()));
            }
            Some(etag) => log::debug!("Ignoring weak etag {:?}", etag),
            None => {}
        }
        headers
            .get(LAST_MODIFIED)
            .filter(|v| !v.is_empty())
            .map(|v| Self::LastModified(v.clone()))
    }

    pub fn header_value(&self) -> &HeaderValue {
        match self {
            Self::ETag(v) | Self::LastModified(v) => v,
        }
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = String::from_utf8_lossy(self.header_value().as_bytes());
        match self {
            Self::ETag(_) => write!(f, "etag {}", value),
            Self::LastModified(_) => write!(f, "last-modified {}", value),
        }
    }
}

/// Metadata of a remote resource, as learned from a `HEAD` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub url: Url,
    pub content_length: Option<u64>,
    pub accepts_ranges: bool,
    pub version: Option<VersionToken>,
}

impl Probe {
    /// Send the request as `HEAD` and collect the resource metadata.
    ///
    /// Headers of the given request are kept, the method is replaced. Streams
    /// only open GET requests, see [`crate::HttpReader::open`].
    pub async fn fetch(request_builder: RequestBuilder) -> Result<Self, Error> {
        let (client, request) = request_builder.build_split();
        let mut request = request?;
        *request.method_mut() = Method::HEAD;
        log::debug!("Probing {}...", request.url());
        let url = request.url().clone();
        let response = client.execute(request).await?;
        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus(response.status()));
        }
        let probe = Self::from_headers(url, response.headers());
        log::debug!(
            "Probed {} (length: {:?}, ranges: {}, version: {:?})",
            probe.url,
            probe.content_length,
            probe.accepts_ranges,
            probe.version
        );
        Ok(probe)
    }

    pub fn from_headers(url: Url, headers: &HeaderMap) -> Self {
        // Response::content_length reports the (empty) body of a HEAD response,
        // so the header is read directly.
        let content_length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let accepts_ranges = headers.get_all(ACCEPT_RANGES).iter().any(|v| {
            v.to_str()
                .map(|v| {
                    v.split(',')
                        .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"))
                })
                .unwrap_or(false)
        });
        Self {
            url,
            content_length,
            accepts_ranges,
            version: VersionToken::from_headers(headers),
        }
    }
}
