//! A small Rust client for the MODAPS (MODIS Adaptive Processing System) file search web service.
//!
//! This crate covers the three calls the service is usually driven with:
//! list the product catalog, search for files by product/time/region, and download files by ID.
//!
//! ## Quick start
//! - The service root defaults to the public MODAPS endpoint. Override it with `MODAPS_URL` or
//!   a `.modapsrc` file (current directory or home directory).
//! - Build a [`SearchCriteria`] and call [`Client::search_files`].
//!
//! ```no_run
//! use modaps::{Client, CoordsMode, SearchCriteria};
//!
//! fn main() -> modaps::Result<()> {
//!     let client = Client::from_env()?;
//!     let criteria = SearchCriteria::new("MOD09GA")
//!         .with_mode(CoordsMode::Tiles)
//!         .with_time_range(Some("2020-01-01".into()), Some("2020-01-02".into()))
//!         .with_bounds(Some(5.0), Some(4.0), Some(9.0), Some(8.0));
//!     for id in client.search_files(&criteria)? {
//!         println!("{}", id);
//!     }
//!     client.download("1412536410", Some(std::path::Path::new("granule.hdf")))?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod download;
mod error;
mod products;
mod response;
mod search;
mod util;

pub use client::{Client, ClientConfig};
pub use config::DEFAULT_URL;
pub use download::default_file_name;
pub use error::{Error, ErrorKind, Result};
pub use products::{ProductFilter, format_product};
pub use response::{FileUrlsResponse, Product, ProductsResponse, SearchForFilesResponse};
pub use search::{Bounds, CoordsMode, SearchCriteria};
