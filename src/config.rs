use log::debug;
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;
use crate::error::{Error, Result};

/// Public MODAPS web service root; endpoint names are appended to it.
pub const DEFAULT_URL: &str = "http://modwebsrv.modaps.eosdis.nasa.gov/axis2/services/MODAPSservices";

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    verify: Option<bool>,
}

pub(crate) fn load_config(url: Option<String>, verify: Option<bool>) -> Result<ClientConfig> {
    let mut url = url.or_else(|| std::env::var("MODAPS_URL").ok());
    let mut file_verify: Option<bool> = None;

    if url.is_none() || verify.is_none() {
        for rc_path in &rc_candidates() {
            if rc_path.exists() {
                debug!("Reading configuration from {}", rc_path.display());
                let cfg = read_rc(rc_path)?;
                if url.is_none() {
                    url = cfg.url;
                }
                file_verify = cfg.verify;
                break;
            }
        }
    }

    let url = url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "Invalid configuration: url must start with http:// or https:// (got `{}`)",
            url
        )));
    }

    let verify = verify.or(file_verify).unwrap_or(true);

    Ok(ClientConfig { url, verify })
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // `url:` may be alone on its line with the value on the next one.
    let mut pending_url = false;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if pending_url {
            pending_url = false;
            if !line.starts_with("url:") && !line.starts_with("verify:") {
                cfg.url = Some(strip_quotes(line).to_string());
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            match k.trim() {
                "url" => {
                    if v.is_empty() {
                        pending_url = true;
                    } else {
                        cfg.url = Some(v.to_string());
                    }
                }
                "verify" => {
                    if !v.is_empty() {
                        cfg.verify = Some(v != "0");
                    }
                }
                _ => {}
            }
        }
    }

    cfg
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // MODAPS_RC wins outright; otherwise ./.modapsrc, then ~/.modapsrc.
    if let Ok(p) = std::env::var("MODAPS_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".modapsrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".modapsrc"));
    }
    v
}
