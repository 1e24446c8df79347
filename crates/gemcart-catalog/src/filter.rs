//! Attribute filters and sort orders for collection listings.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use gemcart_core::CatalogProduct;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attributes::{
    Certification, Clarity, CutGrade, DiamondType, ParsedAttributes, Shape, UnknownAttribute,
};
use crate::html::html_to_text;
use crate::parse::parse_product_attributes;

/// Inclusive numeric bounds; an unset bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl RangeFilter {
    #[must_use]
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether `value` satisfies the range. A missing value satisfies only
    /// an inactive range.
    #[must_use]
    pub fn admits(&self, value: Option<Decimal>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Collection order as returned by the storefront.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    CaratAsc,
    CaratDesc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::CaratAsc => "carat-asc",
            Self::CaratDesc => "carat-desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "featured" | "" => Ok(Self::Featured),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "carat-asc" => Ok(Self::CaratAsc),
            "carat-desc" => Ok(Self::CaratDesc),
            _ => Err(UnknownAttribute {
                kind: "sort order",
                value: s.to_owned(),
            }),
        }
    }
}

/// Listing filter selections. An empty list or open range imposes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub diamond_types: Vec<DiamondType>,
    pub shapes: Vec<Shape>,
    pub price: RangeFilter,
    pub carat: RangeFilter,
    /// Single grade letters; a product graded `F-G` matches `F` or `G`.
    pub colors: Vec<char>,
    pub clarities: Vec<Clarity>,
    pub cuts: Vec<CutGrade>,
    pub certifications: Vec<Certification>,
    pub sort: SortOrder,
}

impl FilterCriteria {
    /// Builds criteria from URL query pairs.
    ///
    /// List parameters (`type`, `shape`, `color`, `clarity`, `cut`,
    /// `certification`) take comma-separated values and may repeat. Ranges
    /// come from `price_min`, `price_max`, `carat_min`, `carat_max`. Values
    /// outside the vocabulary, unparseable numbers, and unknown keys are
    /// ignored.
    #[must_use]
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "type" | "diamond_type" => push_parsed(&mut criteria.diamond_types, value),
                "shape" => push_parsed(&mut criteria.shapes, value),
                "clarity" => push_parsed(&mut criteria.clarities, value),
                "cut" => push_parsed(&mut criteria.cuts, value),
                "certification" => push_parsed(&mut criteria.certifications, value),
                "color" => {
                    for grade in split_list(value) {
                        let mut chars = grade.chars();
                        if let (Some(c), None) = (chars.next(), chars.next()) {
                            let c = c.to_ascii_uppercase();
                            if ('D'..='Z').contains(&c) && !criteria.colors.contains(&c) {
                                criteria.colors.push(c);
                            }
                        }
                    }
                }
                "price_min" => criteria.price.min = parse_decimal(value),
                "price_max" => criteria.price.max = parse_decimal(value),
                "carat_min" => criteria.carat.min = parse_decimal(value),
                "carat_max" => criteria.carat.max = parse_decimal(value),
                "sort" => criteria.sort = value.parse().unwrap_or_default(),
                other => tracing::trace!(key = other, "ignoring unknown filter parameter"),
            }
        }
        criteria
    }

    /// Whether any selection narrows the listing.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.diamond_types.is_empty()
            || !self.shapes.is_empty()
            || self.price.is_active()
            || self.carat.is_active()
            || !self.colors.is_empty()
            || !self.clarities.is_empty()
            || !self.cuts.is_empty()
            || !self.certifications.is_empty()
    }

    /// Whether a product with `attributes` and `price` passes every active
    /// selection.
    #[must_use]
    pub fn matches(&self, attributes: &ParsedAttributes, price: Option<Decimal>) -> bool {
        selected(&self.diamond_types, attributes.diamond_type)
            && selected(&self.shapes, attributes.shape)
            && selected(&self.clarities, attributes.clarity)
            && selected(&self.cuts, attributes.cut)
            && selected(&self.certifications, attributes.certification)
            && (self.colors.is_empty()
                || attributes.color_grades().any(|g| self.colors.contains(&g)))
            && self.price.admits(price)
            && self.carat.admits(attributes.carat)
    }
}

fn selected<T: PartialEq>(selection: &[T], value: Option<T>) -> bool {
    selection.is_empty() || value.is_some_and(|v| selection.contains(&v))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn push_parsed<T: FromStr + PartialEq>(into: &mut Vec<T>, value: &str) {
    for item in split_list(value) {
        match item.parse::<T>() {
            Ok(parsed) if !into.contains(&parsed) => into.push(parsed),
            Ok(_) => {}
            Err(_) => tracing::trace!(value = item, "ignoring unknown filter value"),
        }
    }
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    value.trim().parse().ok()
}

/// A product that passed filtering, with the attributes it was judged on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMatch<'a> {
    pub product: &'a CatalogProduct,
    pub attributes: ParsedAttributes,
}

impl ProductMatch<'_> {
    fn price(&self) -> Option<Decimal> {
        self.product.price.as_ref().map(|p| p.amount)
    }
}

/// Parses a catalog product's title and HTML description.
#[must_use]
pub fn product_attributes(product: &CatalogProduct) -> ParsedAttributes {
    parse_product_attributes(&html_to_text(product.description()), &product.title)
}

/// Filters and sorts `products`, keeping the parsed attributes of each match.
///
/// Sorting is stable and places products missing the sort key last in both
/// directions. With no active filters and [`SortOrder::Featured`], the output
/// is the input in its original order.
#[must_use]
pub fn filter_with_attributes<'a>(
    products: &'a [CatalogProduct],
    criteria: &FilterCriteria,
) -> Vec<ProductMatch<'a>> {
    let mut matches: Vec<ProductMatch<'a>> = products
        .iter()
        .map(|product| ProductMatch {
            product,
            attributes: product_attributes(product),
        })
        .filter(|m| criteria.matches(&m.attributes, m.price()))
        .collect();

    match criteria.sort {
        SortOrder::Featured => {}
        SortOrder::PriceAsc => matches.sort_by(|a, b| missing_last(a.price(), b.price(), false)),
        SortOrder::PriceDesc => matches.sort_by(|a, b| missing_last(a.price(), b.price(), true)),
        SortOrder::CaratAsc => {
            matches.sort_by(|a, b| missing_last(a.attributes.carat, b.attributes.carat, false));
        }
        SortOrder::CaratDesc => {
            matches.sort_by(|a, b| missing_last(a.attributes.carat, b.attributes.carat, true));
        }
    }

    tracing::debug!(
        total = products.len(),
        matched = matches.len(),
        sort = %criteria.sort,
        "filtered catalog products"
    );
    matches
}

/// Filters and sorts `products`; see [`filter_with_attributes`].
#[must_use]
pub fn filter_products<'a>(
    products: &'a [CatalogProduct],
    criteria: &FilterCriteria,
) -> Vec<&'a CatalogProduct> {
    filter_with_attributes(products, criteria)
        .into_iter()
        .map(|m| m.product)
        .collect()
}

fn missing_last(a: Option<Decimal>, b: Option<Decimal>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
