//! swisstopo height service (`api3.geo.admin.ch`) over blocking HTTP.

use std::time::Duration;

use nalgebra::Vector2;
use reqwest::blocking::Client;
use reqwest::Url;

use super::{parse_height, HeightSource, LookupError};

/// Public swisstopo height endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api3.geo.admin.ch/rest/services/height";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("gridheight/", env!("CARGO_PKG_VERSION"));

/// Service endpoint and spatial reference.
#[derive(Clone, Debug, PartialEq)]
pub struct SwisstopoCfg {
    pub endpoint: String,
    /// EPSG code of the input coordinates (2056 = LV95).
    pub sr: u32,
}

impl Default for SwisstopoCfg {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sr: 2056,
        }
    }
}

/// Fetches a URL and returns the whole body, or a `LookupError`.
///
/// Non-success statuses must map to `LookupError::Status`.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<Vec<u8>, LookupError>;
}

/// `Transport` backed by a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Client with the crate user agent. `None` disables the request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>, LookupError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        let body = resp
            .bytes()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Height lookup against the swisstopo REST service.
#[derive(Clone, Debug)]
pub struct SwisstopoResolver<T = HttpTransport> {
    endpoint: Url,
    sr: u32,
    transport: T,
}

impl<T: Transport> SwisstopoResolver<T> {
    /// Fails only when `cfg.endpoint` is not an absolute URL.
    pub fn new(cfg: &SwisstopoCfg, transport: T) -> Result<Self, String> {
        let endpoint = Url::parse(&cfg.endpoint)
            .map_err(|e| format!("invalid endpoint {:?}: {e}", cfg.endpoint))?;
        Ok(Self {
            endpoint,
            sr: cfg.sr,
            transport,
        })
    }

    /// `<endpoint>?easting=<x>&northing=<y>&sr=<code>&format=json`
    pub fn request_url(&self, p: Vector2<f64>) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("easting", &p.x.to_string())
            .append_pair("northing", &p.y.to_string())
            .append_pair("sr", &self.sr.to_string())
            .append_pair("format", "json");
        url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> HeightSource for SwisstopoResolver<T> {
    fn resolve_height(&mut self, p: Vector2<f64>) -> Result<f64, LookupError> {
        let url = self.request_url(p);
        let body = self.transport.get(&url)?;
        parse_height(&body)
    }
}
