//! Best-effort gemstone attribute extraction from product copy, and
//! attribute-based filtering and sorting of collection listings.
//!
//! Everything here is pure: no I/O, no caching. Attributes are recomputed
//! from product text on every call.

pub mod attributes;
pub mod filter;
mod html;
pub mod parse;

pub use attributes::{
    Certification, Clarity, CutGrade, DiamondType, ParsedAttributes, Shape, UnknownAttribute,
};
pub use filter::{
    filter_products, filter_with_attributes, product_attributes, FilterCriteria, ProductMatch,
    RangeFilter, SortOrder,
};
pub use html::html_to_text;
pub use parse::{parse_product_attributes, parse_product_attributes_from_html};
