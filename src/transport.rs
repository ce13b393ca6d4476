use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

use crate::error::{Error, Result, TransportError};

/// Raw HTTP reply handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single HTTP GET.
///
/// [`HttpTransport`] is the production implementation; tests substitute
/// their own to observe or refuse requests.
pub trait Transport {
    fn get(&self, url: &str) -> std::result::Result<Reply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> std::result::Result<Reply, TransportError> {
        (**self).get(url)
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    /// Builds the HTTP client with the crate user agent and an optional timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("carbonintensity-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("carbonintensity-rs")),
        );

        let mut builder = HttpClient::builder().default_headers(default_headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<Reply, TransportError> {
        let resp = self.http.get(url).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(Reply { status, body })
    }
}
