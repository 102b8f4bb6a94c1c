//! Typed schemas for the XML documents MODAPS returns.
//!
//! Element names are matched by local name, so `mws:Product` binds to `Product`.

use serde::Deserialize;

/// Placeholder entry the service returns instead of an empty result list.
const NO_RESULTS: &str = "No results";

/// `listProducts` reply, rooted at `mws:Products`.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    #[serde(default, rename = "Product")]
    pub products: Vec<Product>,
}

/// One entry of the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    /// Short product identifier, e.g. `MOD09GA`.
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(default, rename = "Description")]
    pub description: String,
}

/// `searchForFiles` reply, rooted at `mws:searchForFilesResponse`.
#[derive(Debug, Deserialize)]
pub struct SearchForFilesResponse {
    #[serde(default, rename = "return")]
    entries: Vec<String>,
}

impl SearchForFilesResponse {
    /// File identifiers in response order, with the service's "No results" marker removed.
    pub fn file_ids(self) -> Vec<String> {
        self.entries
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != NO_RESULTS)
            .collect()
    }
}

/// `getFileUrls` reply, rooted at `mws:getFileUrlsResponse`.
#[derive(Debug, Deserialize)]
pub struct FileUrlsResponse {
    #[serde(default, rename = "return")]
    entries: Vec<String>,
}

impl FileUrlsResponse {
    pub fn urls(self) -> Vec<String> {
        self.entries
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Axis2 fault body sent alongside error statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceFault {
    #[serde(default)]
    faultstring: Option<String>,
    #[serde(default, rename = "Reason")]
    reason: Option<FaultReason>,
}

#[derive(Debug, Deserialize)]
struct FaultReason {
    #[serde(default, rename = "Text")]
    text: Option<String>,
}

impl ServiceFault {
    pub(crate) fn message(self) -> Option<String> {
        self.faultstring
            .or_else(|| self.reason.and_then(|r| r.text))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
