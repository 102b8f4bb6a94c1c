use clap::ValueEnum;
use reqwest::Url;
use std::fmt;

use crate::error::{Error, Result};
use crate::util::urljoin;

/// How the four bounds of a search are interpreted by the service.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordsMode {
    /// Latitude/longitude in degrees.
    #[default]
    Coords,
    /// MODIS sinusoidal tile indices (rows 0-17, columns 0-35).
    Tiles,
    /// Whole globe; the service ignores the bounds.
    Global,
}

impl CoordsMode {
    /// Value of the `coordsOrTiles` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            CoordsMode::Coords => "coords",
            CoordsMode::Tiles => "tiles",
            CoordsMode::Global => "global",
        }
    }

    pub fn default_bounds(&self) -> Bounds {
        match self {
            CoordsMode::Tiles => Bounds {
                north: 17.0,
                south: 0.0,
                east: 35.0,
                west: 0.0,
            },
            CoordsMode::Coords | CoordsMode::Global => Bounds {
                north: 90.0,
                south: -90.0,
                east: 180.0,
                west: -180.0,
            },
        }
    }
}

impl fmt::Display for CoordsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Everything needed for one `searchForFiles` call.
///
/// Bounds left as `None` are filled from the defaults of `mode` when the query is built, so an
/// explicit value that happens to equal a degree default is never rewritten.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub product: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
    pub mode: CoordsMode,
}

impl SearchCriteria {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: CoordsMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_time_range(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_bounds(
        mut self,
        north: Option<f64>,
        south: Option<f64>,
        east: Option<f64>,
        west: Option<f64>,
    ) -> Self {
        self.north = north;
        self.south = south;
        self.east = east;
        self.west = west;
        self
    }

    pub fn effective_bounds(&self) -> Bounds {
        let defaults = self.mode.default_bounds();
        Bounds {
            north: self.north.unwrap_or(defaults.north),
            south: self.south.unwrap_or(defaults.south),
            east: self.east.unwrap_or(defaults.east),
            west: self.west.unwrap_or(defaults.west),
        }
    }

    /// Full `searchForFiles` URL under `base`. Absent times are left out of the query.
    pub fn query_url(&self, base: &str) -> Result<Url> {
        let bounds = self.effective_bounds();
        let products = self.product.trim().to_uppercase();

        let mut params: Vec<(&str, String)> = vec![("products", products)];
        if let Some(start) = &self.start {
            params.push(("startTime", start.clone()));
        }
        if let Some(end) = &self.end {
            params.push(("endTime", end.clone()));
        }
        params.extend([
            ("north", bounds.north.to_string()),
            ("south", bounds.south.to_string()),
            ("east", bounds.east.to_string()),
            ("west", bounds.west.to_string()),
            ("coordsOrTiles", self.mode.as_query().to_string()),
        ]);

        let endpoint = urljoin(base, "searchForFiles");
        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| Error::Config(format!("invalid search URL {}: {}", endpoint, e)))
    }
}
