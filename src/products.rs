use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::response::Product;

/// Case-insensitive product filter built from a search term where `*` matches any run of
/// characters. The match is unanchored, so `myd` finds `MYD09GA`.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pattern: Regex,
}

impl ProductFilter {
    /// An empty term matches every product.
    pub fn new(term: &str) -> Result<Self> {
        let pattern = term
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let pattern = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.pattern.is_match(&product.name) || self.pattern.is_match(&product.description)
    }

    /// Matching products, in catalog order.
    pub fn apply<'a>(
        &self,
        products: &'a [Product],
    ) -> impl Iterator<Item = &'a Product> + use<'_, 'a> {
        products.iter().filter(|p| self.matches(p))
    }
}

/// One listing line: `<name> . . . . . <description>`.
pub fn format_product(product: &Product) -> String {
    format!("{} . . . . . {}", product.name, product.description)
}
