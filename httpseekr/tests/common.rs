#![allow(dead_code)]
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{
    HeaderName, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, ETAG, IF_RANGE, LAST_MODIFIED, RANGE,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use reqwest::Url;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Resource served by the test server.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub data: Vec<u8>,
    pub accept_ranges: bool,
    /// Answer every GET with the full resource.
    pub ignore_ranges: bool,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl Resource {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            accept_ranges: true,
            ..Default::default()
        }
    }

    pub fn etag(mut self, etag: &str) -> Self {
        self.etag = Some(etag.to_string());
        self
    }

    pub fn last_modified(mut self, last_modified: &str) -> Self {
        self.last_modified = Some(last_modified.to_string());
        self
    }

    /// Whether an `If-Range` value matches the current version. Weak etags
    /// never match.
    fn matches(&self, if_range: &str) -> bool {
        let strong_etag = self.etag.as_deref().filter(|etag| !etag.starts_with("W/"));
        strong_etag == Some(if_range) || self.last_modified.as_deref() == Some(if_range)
    }

    fn respond(&self, request: &RecordedRequest) -> Response<Full<Bytes>> {
        let mut builder = Response::builder();
        if self.accept_ranges {
            builder = builder.header(ACCEPT_RANGES, "bytes");
        }
        if let Some(etag) = &self.etag {
            builder = builder.header(ETAG, etag.as_str());
        }
        if let Some(last_modified) = &self.last_modified {
            builder = builder.header(LAST_MODIFIED, last_modified.as_str());
        }
        let len = self.data.len();
        if request.method == Method::HEAD {
            return builder
                .header(CONTENT_LENGTH, len.to_string())
                .body(Full::new(Bytes::from(self.data.clone())))
                .unwrap();
        }

        // Only respond with the requested range of bytes if the version matches.
        let fresh = match &request.if_range {
            Some(if_range) => self.matches(if_range),
            None => true,
        };
        let range = request
            .range
            .as_deref()
            .filter(|_| fresh && !self.ignore_ranges)
            .and_then(parse_range);
        match range {
            Some((start, _)) if start >= len => builder
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(CONTENT_RANGE, format!("bytes */{}", len))
                .body(Full::new(Bytes::new()))
                .unwrap(),
            Some((start, end)) => {
                let end = std::cmp::min(end + 1, len);
                builder
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(
                        CONTENT_RANGE,
                        format!("bytes {}-{}/{}", start, end - 1, len),
                    )
                    .body(Full::new(Bytes::copy_from_slice(&self.data[start..end])))
                    .unwrap()
            }
            None => builder
                .body(Full::new(Bytes::from(self.data.clone())))
                .unwrap(),
        }
    }
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    let (start, end) = range.strip_prefix("bytes=")?.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

/// Request as seen by the test server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub range: Option<String>,
    pub if_range: Option<String>,
}

fn header(request: &Request<Incoming>, name: HeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

pub struct TestServer {
    pub url: Url,
    pub resource: Arc<Mutex<Resource>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(resource: Resource) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let resource = Arc::new(Mutex::new(resource));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let task = {
            let resource = resource.clone();
            let requests = requests.clone();
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let resource = resource.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<Incoming>| {
                            let recorded = RecordedRequest {
                                method: req.method().clone(),
                                range: header(&req, RANGE),
                                if_range: header(&req, IF_RANGE),
                            };
                            let response = resource.lock().unwrap().respond(&recorded);
                            requests.lock().unwrap().push(recorded);
                            async move { Ok::<_, Infallible>(response) }
                        });
                        let _ = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await;
                    });
                }
            })
        };
        Self {
            url: Url::parse(&format!("http://127.0.0.1:{}/resource", port)).unwrap(),
            resource,
            requests,
            task,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Range headers of all GET requests so far.
    pub fn ranges(&self) -> Vec<Option<String>> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::GET)
            .map(|r| r.range)
            .collect()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn client(block_size: u64) -> httpseekr::Client {
    httpseekr::Client::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
        .block_size(block_size)
}
