use std::io::Read as _;
use std::path::Path;

use anyhow::Context;
use clap::Args;
use gemcart_catalog::{
    filter_with_attributes, html_to_text, parse_product_attributes, FilterCriteria,
    ParsedAttributes,
};
use gemcart_core::CatalogProduct;
use serde_json::json;

/// Listing filters, named after the collection endpoint's query parameters.
///
/// Each list flag accepts comma-separated values and may repeat.
#[derive(Debug, Default, Args)]
pub(crate) struct FilterArgs {
    /// Natural or lab-grown
    #[arg(long = "type")]
    pub(crate) diamond_type: Vec<String>,
    #[arg(long)]
    pub(crate) shape: Vec<String>,
    /// Single grade letters (D-Z)
    #[arg(long)]
    pub(crate) color: Vec<String>,
    #[arg(long)]
    pub(crate) clarity: Vec<String>,
    #[arg(long)]
    pub(crate) cut: Vec<String>,
    #[arg(long)]
    pub(crate) certification: Vec<String>,
    #[arg(long)]
    pub(crate) price_min: Option<String>,
    #[arg(long)]
    pub(crate) price_max: Option<String>,
    #[arg(long)]
    pub(crate) carat_min: Option<String>,
    #[arg(long)]
    pub(crate) carat_max: Option<String>,
    /// featured, price-asc, price-desc, carat-asc, or carat-desc
    #[arg(long)]
    pub(crate) sort: Option<String>,
}

impl FilterArgs {
    /// Flattens the flags into the query pairs [`FilterCriteria::from_query`] reads.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let lists: [(&'static str, &Vec<String>); 6] = [
            ("type", &self.diamond_type),
            ("shape", &self.shape),
            ("color", &self.color),
            ("clarity", &self.clarity),
            ("cut", &self.cut),
            ("certification", &self.certification),
        ];
        let scalars: [(&'static str, &Option<String>); 5] = [
            ("price_min", &self.price_min),
            ("price_max", &self.price_max),
            ("carat_min", &self.carat_min),
            ("carat_max", &self.carat_max),
            ("sort", &self.sort),
        ];

        let mut pairs = Vec::new();
        for (key, values) in lists {
            pairs.extend(values.iter().map(|v| (key, v.as_str())));
        }
        for (key, value) in scalars {
            if let Some(value) = value {
                pairs.push((key, value.as_str()));
            }
        }
        pairs
    }

    pub(crate) fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_query(self.query_pairs())
    }
}

pub(crate) fn run_parse(text: Option<&str>, title: &str, html: bool) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text.to_owned(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read description from stdin")?;
            buf
        }
    };

    let attributes = attributes_for(&text, title, html);
    println!("{}", serde_json::to_string_pretty(&attributes)?);
    Ok(())
}

fn attributes_for(text: &str, title: &str, html: bool) -> ParsedAttributes {
    if html {
        parse_product_attributes(&html_to_text(text), title)
    } else {
        parse_product_attributes(text, title)
    }
}

pub(crate) fn run_filter(products_path: &Path, filters: &FilterArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(products_path)
        .with_context(|| format!("failed to read {}", products_path.display()))?;
    let products: Vec<CatalogProduct> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a product list", products_path.display()))?;

    let criteria = filters.criteria();
    let matches = filter_with_attributes(&products, &criteria);
    tracing::info!(
        total = products.len(),
        matched = matches.len(),
        sort = %criteria.sort,
        "filter complete"
    );

    let rows: Vec<_> = matches
        .iter()
        .map(|m| {
            json!({
                "handle": m.product.handle,
                "title": m.product.title,
                "price": m.product.price,
                "attributes": m.attributes,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
