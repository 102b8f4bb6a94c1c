use log::{debug, info};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::load_config;
use crate::error::{Error, Result, format_service_error};
use crate::response::{FileUrlsResponse, Product, ProductsResponse, SearchForFilesResponse};
use crate::search::SearchCriteria;
use crate::util::urljoin;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base MODAPS service URL, typically
    /// `http://modwebsrv.modaps.eosdis.nasa.gov/axis2/services/MODAPSservices`.
    pub url: String,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    progress: bool,
    http: HttpClient,
}

impl Client {
    /// Creates a client using environment variables and/or `.modapsrc`.
    ///
    /// This is equivalent to `Client::new(None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`verify` arguments
    /// - environment variable `MODAPS_URL`
    /// - config file from `MODAPS_RC` or `.modapsrc`
    /// - the public MODAPS endpoint
    pub fn new(url: Option<String>, verify: Option<bool>) -> Result<Self> {
        let cfg = load_config(url, verify)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("modaps-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("modaps-rs")),
        );

        // No request timeout: a stalled server blocks until the OS gives up.
        let mut builder = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(None::<Duration>);

        if !cfg.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: cfg.url,
            progress: true,
            http,
        })
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    pub(crate) fn progress(&self) -> bool {
        self.progress
    }

    pub(crate) fn endpoint(&self, name: &str) -> String {
        urljoin(&self.url, name)
    }

    /// GETs `url` and deserializes the UTF-8 XML body into `T`.
    ///
    /// Transport failures and non-2xx statuses surface as network errors; a body that is not
    /// UTF-8, not well-formed XML, or does not fit `T` surfaces as a parse error. Nothing is
    /// retried.
    pub fn fetch_xml<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        let body = resp.bytes().map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(format_service_error(
                status,
                url,
                &String::from_utf8_lossy(&body),
            ));
        }

        let text = std::str::from_utf8(&body).map_err(|e| Error::UnexpectedResponse {
            url: url.to_string(),
            reason: format!("response body is not valid UTF-8: {}", e),
        })?;
        quick_xml::de::from_str::<T>(text).map_err(|source| Error::Parse {
            url: url.to_string(),
            source,
        })
    }

    /// Full product catalog in service order.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        info!("Fetching MODAPS product list...");
        let reply: ProductsResponse = self.fetch_xml(&self.endpoint("listProducts"))?;
        debug!("{} product(s) in catalog", reply.products.len());
        Ok(reply.products)
    }

    /// File IDs matching `criteria`, in response order.
    pub fn search_files(&self, criteria: &SearchCriteria) -> Result<Vec<String>> {
        info!("Performing search...");
        let url = criteria.query_url(&self.url)?;
        info!("{}", url);
        let reply: SearchForFilesResponse = self.fetch_xml(url.as_str())?;
        let ids = reply.file_ids();
        if ids.is_empty() {
            info!("No files matched the search");
        }
        Ok(ids)
    }

    /// Resolves a comma-separated list of file IDs to download URLs.
    pub fn file_urls(&self, file_ids: &str) -> Result<Vec<String>> {
        let endpoint = self.endpoint("getFileUrls");
        let url = reqwest::Url::parse_with_params(&endpoint, &[("fileIds", file_ids.trim())])
            .map_err(|e| Error::Config(format!("invalid file URL request {}: {}", endpoint, e)))?;
        let reply: FileUrlsResponse = self.fetch_xml(url.as_str())?;
        Ok(reply.urls())
    }
}
