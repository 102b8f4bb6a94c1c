use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::Client;
use crate::error::{Error, Result, format_service_error};
use crate::util::guess_filename_from_url;

/// Name used when no output path is given: local time as `YYYYmmdd_HH_MM_SS.hdf`.
pub fn default_file_name() -> String {
    Local::now().format("%Y%m%d_%H_%M_%S.hdf").to_string()
}

impl Client {
    /// Resolves `file_ids` (comma separated) and saves every resolved file.
    ///
    /// `target` names the file to write when a single ID resolves to a single URL (default: a
    /// timestamped `.hdf` name). It is the directory to write into (default: the current
    /// directory) when it already is a directory, when several IDs were requested, or when
    /// several URLs came back. Files in a directory are named after their URL.
    pub fn download(&self, file_ids: &str, target: Option<&Path>) -> Result<Vec<PathBuf>> {
        info!("Downloading product {}", file_ids);
        let urls = self.file_urls(file_ids)?;
        if urls.is_empty() {
            return Err(Error::UnexpectedResponse {
                url: self.endpoint("getFileUrls"),
                reason: format!("no file URL returned for file IDs {}", file_ids),
            });
        }

        let into_dir = urls.len() > 1
            || file_ids.contains(',')
            || target.is_some_and(|t| t.is_dir());

        if !into_dir {
            let path = target
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(default_file_name()));
            self.download_url(&urls[0], &path)?;
            return Ok(vec![path]);
        }

        let dir = target.unwrap_or(Path::new("."));
        let stamp = Local::now().format("%Y%m%d_%H_%M_%S");
        let mut used = HashSet::new();
        let mut written = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            let name = guess_filename_from_url(url)
                .unwrap_or_else(|| format!("{}_{}.hdf", stamp, i + 1));
            let path = unique_path(dir, &name, &mut used);
            self.download_url(url, &path)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Fetches `url` into memory, then writes the bytes to `path` (created or truncated).
    pub fn download_url(&self, url: &str, path: &Path) -> Result<u64> {
        info!("Downloading {} into {}", url, path.display());
        let bytes = self.fetch_bytes(url)?;
        write_file(path, &bytes)?;
        debug!("Wrote {} byte(s) to {}", bytes.len(), path.display());
        Ok(bytes.len() as u64)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let network = |source| Error::Network {
            url: url.to_string(),
            source,
        };

        let pb = if self.progress() {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(format!("Downloading {}", url));
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let result = self
            .http()
            .get(url)
            .send()
            .map_err(network)
            .and_then(|resp| {
                let status = resp.status();
                if !status.is_success() {
                    let body = resp.text().unwrap_or_default();
                    return Err(format_service_error(status, url, &body));
                }
                resp.bytes().map_err(network)
            });

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(result?.to_vec())
    }
}

/// `dir/name`, or `dir/<stem>_<n>.<ext>` when an earlier file of this run took that name.
fn unique_path(dir: &Path, name: &str, used: &mut HashSet<PathBuf>) -> PathBuf {
    let mut path = dir.join(name);
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 2;
    while used.contains(&path) {
        let candidate = match ext {
            Some(ext) => format!("{}_{}.{}", stem, n, ext),
            None => format!("{}_{}", stem, n),
        };
        path = dir.join(candidate);
        n += 1;
    }
    used.insert(path.clone());
    path
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let fs_err = |source| Error::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(fs_err)?;
        }
    }

    let mut out = File::create(path).map_err(fs_err)?;
    out.write_all(bytes).map_err(fs_err)?;
    out.flush().map_err(fs_err)
}
