use reqwest::{Method, StatusCode, Url};

/// Errors returned while opening, seeking or reading a remote resource.
pub enum Error {
    /// The server did not advertise `Accept-Ranges: bytes` for the resource.
    RangeNotSupported { url: Url },
    /// The server did not report the size of the resource.
    UnknownContentLength,
    /// Buffering was enabled for a resource of unknown or zero size.
    BufferingWithoutLength,
    /// A seek origin other than start (0), current (1) or end (2).
    InvalidWhence(i32),
    /// A seek which would place the cursor outside of the addressable range.
    InvalidPosition(i128),
    /// A ranged request was answered with something else than partial content.
    UnexpectedStatus(StatusCode),
    /// The resource changed on the server since the stream was opened.
    ResourceChanged,
    /// Only GET requests can serve as template for range requests.
    UnsupportedMethod(Method),
    RequestNotClonable,
    StreamClosed,
    Http(reqwest::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::RangeNotSupported { url } => write!(f, "RangeNotSupported({})", url),
            Error::UnknownContentLength => write!(f, "UnknownContentLength"),
            Error::BufferingWithoutLength => write!(f, "BufferingWithoutLength"),
            Error::InvalidWhence(whence) => write!(f, "InvalidWhence({})", whence),
            Error::InvalidPosition(pos) => write!(f, "InvalidPosition({})", pos),
            Error::UnexpectedStatus(status) => write!(f, "UnexpectedStatus({})", status),
            Error::ResourceChanged => write!(f, "ResourceChanged"),
            Error::UnsupportedMethod(method) => write!(f, "UnsupportedMethod({})", method),
            Error::RequestNotClonable => write!(f, "RequestNotClonable"),
            Error::StreamClosed => write!(f, "StreamClosed"),
            Error::Http(e) => write!(f, "Http({:?})", e),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::RangeNotSupported { url } => {
                write!(f, "range header not supported by {}", url)
            }
            Error::UnknownContentLength => write!(f, "server did not report a content length"),
            Error::BufferingWithoutLength => {
                write!(f, "buffering requires a known, non-zero content length")
            }
            Error::InvalidWhence(whence) => write!(f, "invalid seek origin {}", whence),
            Error::InvalidPosition(pos) => write!(f, "invalid seek to position {}", pos),
            Error::UnexpectedStatus(status) => {
                write!(f, "unexpected status for range request: {}", status)
            }
            Error::ResourceChanged => write!(f, "remote resource changed since it was opened"),
            Error::UnsupportedMethod(method) => {
                write!(f, "cannot read ranges using a {} request", method)
            }
            Error::RequestNotClonable => write!(f, "request is not clonable"),
            Error::StreamClosed => write!(f, "stream is closed"),
            Error::Http(e) => write!(f, "http error: {}", e),
        }
    }
}
