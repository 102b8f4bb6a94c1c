use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use crate::response::ServiceFault;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`], for callers that only care about what kind of thing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    Filesystem,
    Usage,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not reach MODAPS at {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("MODAPS request failed: HTTP {status} for url ({url})\n{message}")]
    Status {
        status: StatusCode,
        url: String,
        message: String,
    },
    #[error("failed to parse MODAPS response (url={url})")]
    Parse {
        url: String,
        #[source]
        source: quick_xml::de::DeError,
    },
    #[error("unexpected MODAPS response (url={url}): {reason}")]
    UnexpectedResponse { url: String, reason: String },
    #[error("failed to write {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid search term")]
    Pattern(#[from] regex::Error),
    #[error("{0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network { .. } | Error::Status { .. } => ErrorKind::Network,
            Error::Parse { .. } | Error::UnexpectedResponse { .. } => ErrorKind::Parse,
            Error::Filesystem { .. } => ErrorKind::Filesystem,
            Error::Pattern(_) | Error::Config(_) => ErrorKind::Usage,
        }
    }
}

/// Turns a non-2xx reply into an [`Error::Status`], pulling the server's fault text out of the
/// body when there is one.
pub(crate) fn format_service_error(status: StatusCode, url: &str, body: &str) -> Error {
    let fault = quick_xml::de::from_str::<ServiceFault>(body)
        .ok()
        .and_then(|f| f.message())
        .unwrap_or_default();

    let message = if status == StatusCode::NOT_FOUND {
        format!(
            "MODAPS endpoint not found.\n- The service path may have changed, or the configured base URL is incorrect\n- Override it with --url, MODAPS_URL or `url:` in .modapsrc\n\nServer message: {}",
            if fault.is_empty() { "(none)" } else { fault.as_str() }
        )
    } else if !fault.is_empty() {
        format!("Server message: {}", fault)
    } else {
        body.trim().to_string()
    };

    Error::Status {
        status,
        url: url.to_string(),
        message,
    }
}
