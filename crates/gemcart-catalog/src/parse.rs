//! Attribute extraction from free-text product copy.
//!
//! Matching is best-effort: each extractor returns the first match it finds
//! and `None` otherwise. Nothing here fails.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::attributes::{Certification, Clarity, CutGrade, DiamondType, ParsedAttributes, Shape};
use crate::html::html_to_text;

static SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(round|princess|cushion|oval|pear|emerald|marquise|radiant|asscher|heart)\b")
        .expect("valid shape regex")
});

// Groups: 1 whole part of a mixed fraction, 2/3 numerator/denominator,
// 4 decimal weight, 5 a trailing metal ("18ct white gold" is purity).
static CARAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:(\d+)\s+)?(\d+)\s*/\s*(\d+)|(\d+(?:\.\d+)?|\.\d+))\s*(?:carats?|ctw|cts|ct)\b(\s*(?:(?:white|yellow|rose)\s+)?gold\b)?",
    )
    .expect("valid carat regex")
});

// Grade letters are matched case-sensitively; only the label is not.
static COLOR_LABEL_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:colou?r)(?:\s*(?i:grade))?\s*:?\s*([D-Z])(?:\s*[-/–]\s*([D-Z]))?\b")
        .expect("valid color regex")
});
static COLOR_LABEL_AFTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([D-Z])(?:\s*[-/–]\s*([D-Z]))?\s+(?i:colou?r)\b").expect("valid color regex")
});

// `FL`/`IF` stay case-sensitive so the English word "if" is not a grade.
static CLARITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(FL|IF|(?i:VVS[12]|VS[12]|SI[123]|I[123]))\b").expect("valid clarity regex")
});

static CUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bcut(?:\s+grade)?\s*:?\s*(ideal|excellent|very\s+good|good)\b|\b(ideal|excellent|very\s+good|good)\s+cut\b",
    )
    .expect("valid cut regex")
});

static CERT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(GIA|IGI|AGS|HRD)\b").expect("valid certification regex"));

static LAB_GROWN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\blab(?:oratory)?[\s-]*(?:grown|created)\b").expect("valid lab-grown regex")
});
static NATURAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:natural|mined)\b").expect("valid natural regex"));

/// Extracts gemstone attributes from a plain-text description and title.
///
/// Shape is looked up in the title first, since listing titles lead with it
/// ("Oval 2ct Lab Grown") while descriptions may mention other shapes in
/// passing. Every other attribute prefers the description and falls back to
/// the title.
#[must_use]
pub fn parse_product_attributes(description: &str, title: &str) -> ParsedAttributes {
    ParsedAttributes {
        shape: parse_shape(title).or_else(|| parse_shape(description)),
        carat: parse_carat(description).or_else(|| parse_carat(title)),
        color: parse_color(description).or_else(|| parse_color(title)),
        clarity: parse_clarity(description).or_else(|| parse_clarity(title)),
        cut: parse_cut(description).or_else(|| parse_cut(title)),
        certification: parse_certification(description).or_else(|| parse_certification(title)),
        diamond_type: parse_diamond_type(description).or_else(|| parse_diamond_type(title)),
    }
}

/// Extracts attributes from an HTML description with no separate title.
#[must_use]
pub fn parse_product_attributes_from_html(html: &str) -> ParsedAttributes {
    parse_product_attributes(&html_to_text(html), "")
}

fn parse_shape(text: &str) -> Option<Shape> {
    let m = SHAPE_RE.captures(text)?.get(1)?;
    m.as_str().parse().ok()
}

fn parse_carat(text: &str) -> Option<Decimal> {
    CARAT_RE
        .captures_iter(text)
        .filter(|caps| caps.get(5).is_none())
        .filter_map(|caps| carat_weight(&caps))
        .find(|carat| !carat.is_zero())
}

fn carat_weight(caps: &regex::Captures<'_>) -> Option<Decimal> {
    if let Some(decimal) = caps.get(4) {
        return decimal.as_str().parse().ok();
    }
    let numerator: Decimal = caps.get(2)?.as_str().parse().ok()?;
    let denominator: Decimal = caps.get(3)?.as_str().parse().ok()?;
    let whole = match caps.get(1) {
        Some(whole) => whole.as_str().parse().ok()?,
        None => Decimal::ZERO,
    };
    whole.checked_add(numerator.checked_div(denominator)?)
}

fn parse_color(text: &str) -> Option<String> {
    let caps = COLOR_LABEL_FIRST_RE
        .captures(text)
        .or_else(|| COLOR_LABEL_AFTER_RE.captures(text))?;
    let first = caps.get(1)?.as_str();
    match caps.get(2) {
        Some(second) if second.as_str() != first => Some(format!("{first}-{}", second.as_str())),
        _ => Some(first.to_owned()),
    }
}

fn parse_clarity(text: &str) -> Option<Clarity> {
    let m = CLARITY_RE.captures(text)?.get(1)?;
    m.as_str().parse().ok()
}

fn parse_cut(text: &str) -> Option<CutGrade> {
    let caps = CUT_RE.captures(text)?;
    let m = caps.get(1).or_else(|| caps.get(2))?;
    m.as_str().parse().ok()
}

fn parse_certification(text: &str) -> Option<Certification> {
    let m = CERT_RE.captures(text)?.get(1)?;
    m.as_str().parse().ok()
}

fn parse_diamond_type(text: &str) -> Option<DiamondType> {
    if LAB_GROWN_RE.is_match(text) {
        Some(DiamondType::LabGrown)
    } else if NATURAL_RE.is_match(text) {
        Some(DiamondType::Natural)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
