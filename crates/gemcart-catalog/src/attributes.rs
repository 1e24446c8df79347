//! Gemstone attribute vocabulary.
//!
//! Each enum parses case-insensitively from its display label, and treats
//! `-`, `_` and runs of whitespace as the same separator so that query-string
//! values (`very-good`, `lab_grown`) and product copy (`Very Good`,
//! `Lab Grown`) share one vocabulary.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownAttribute {
    pub kind: &'static str,
    pub value: String,
}

/// Lowercases and collapses separators: `"Very_Good"` → `"very good"`.
fn normalize_label(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup<T: Copy>(
    kind: &'static str,
    all: &[T],
    label: fn(T) -> &'static str,
    value: &str,
) -> Result<T, UnknownAttribute> {
    let wanted = normalize_label(value);
    all.iter()
        .copied()
        .find(|v| normalize_label(label(*v)) == wanted)
        .ok_or_else(|| UnknownAttribute {
            kind,
            value: value.to_owned(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Round,
    Princess,
    Cushion,
    Oval,
    Pear,
    Emerald,
    Marquise,
    Radiant,
    Asscher,
    Heart,
}

impl Shape {
    pub const ALL: [Self; 10] = [
        Self::Round,
        Self::Princess,
        Self::Cushion,
        Self::Oval,
        Self::Pear,
        Self::Emerald,
        Self::Marquise,
        Self::Radiant,
        Self::Asscher,
        Self::Heart,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Round => "Round",
            Self::Princess => "Princess",
            Self::Cushion => "Cushion",
            Self::Oval => "Oval",
            Self::Pear => "Pear",
            Self::Emerald => "Emerald",
            Self::Marquise => "Marquise",
            Self::Radiant => "Radiant",
            Self::Asscher => "Asscher",
            Self::Heart => "Heart",
        }
    }
}

/// GIA clarity scale, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Clarity {
    Fl,
    If,
    Vvs1,
    Vvs2,
    Vs1,
    Vs2,
    Si1,
    Si2,
    Si3,
    I1,
    I2,
    I3,
}

impl Clarity {
    pub const ALL: [Self; 12] = [
        Self::Fl,
        Self::If,
        Self::Vvs1,
        Self::Vvs2,
        Self::Vs1,
        Self::Vs2,
        Self::Si1,
        Self::Si2,
        Self::Si3,
        Self::I1,
        Self::I2,
        Self::I3,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fl => "FL",
            Self::If => "IF",
            Self::Vvs1 => "VVS1",
            Self::Vvs2 => "VVS2",
            Self::Vs1 => "VS1",
            Self::Vs2 => "VS2",
            Self::Si1 => "SI1",
            Self::Si2 => "SI2",
            Self::Si3 => "SI3",
            Self::I1 => "I1",
            Self::I2 => "I2",
            Self::I3 => "I3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutGrade {
    Ideal,
    Excellent,
    VeryGood,
    Good,
}

impl CutGrade {
    pub const ALL: [Self; 4] = [Self::Ideal, Self::Excellent, Self::VeryGood, Self::Good];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ideal => "Ideal",
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
        }
    }
}

/// Grading laboratory named on the certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Certification {
    Gia,
    Igi,
    Ags,
    Hrd,
}

impl Certification {
    pub const ALL: [Self; 4] = [Self::Gia, Self::Igi, Self::Ags, Self::Hrd];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gia => "GIA",
            Self::Igi => "IGI",
            Self::Ags => "AGS",
            Self::Hrd => "HRD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiamondType {
    Natural,
    LabGrown,
}

impl DiamondType {
    pub const ALL: [Self; 2] = [Self::Natural, Self::LabGrown];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Natural => "Natural",
            Self::LabGrown => "Lab Grown",
        }
    }
}

macro_rules! label_traits {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownAttribute;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                lookup($kind, &Self::ALL, Self::label, s)
            }
        }
    };
}

label_traits!(Shape, "shape");
label_traits!(Clarity, "clarity");
label_traits!(CutGrade, "cut grade");
label_traits!(Certification, "certification");
label_traits!(DiamondType, "diamond type");

/// Attributes recovered from a product's title and description.
///
/// Every field is optional; a field the copy does not mention stays `None`.
/// `color` is a D–Z grade letter or a two-letter range such as `"F-G"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAttributes {
    pub shape: Option<Shape>,
    pub carat: Option<Decimal>,
    pub color: Option<String>,
    pub clarity: Option<Clarity>,
    pub cut: Option<CutGrade>,
    pub certification: Option<Certification>,
    pub diamond_type: Option<DiamondType>,
}

impl ParsedAttributes {
    /// Individual grade letters of `color`: `"F-G"` yields `F` and `G`.
    pub fn color_grades(&self) -> impl Iterator<Item = char> + '_ {
        self.color
            .as_deref()
            .unwrap_or("")
            .chars()
            .filter(char::is_ascii_uppercase)
    }
}
