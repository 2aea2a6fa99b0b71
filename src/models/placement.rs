use std::{fmt, str::FromStr};

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::{
    DEFAULT_MARGIN_SOUTH, DEFAULT_MARGIN_WEST,
    errors::{WatermarkError, WatermarkResult},
};

// ────────────────────────────────────────────────────────────────
// Anchor
// ────────────────────────────────────────────────────────────────

/// Nine-way anchor of the watermark inside the frame.
///
/// Symbols read vertical-first: `N` is the top row, `S` the bottom row and a
/// bare `C` the middle row. The horizontal letter follows: `E` is the left
/// edge, `C` the centre and `W` the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnchorPosition {
    Ne,
    Nc,
    Nw,
    Se,
    Sc,
    Sw,
    C,
    Ce,
    Cw,
}

impl AnchorPosition {
    pub const ALL: [AnchorPosition; 9] = [
        Self::Ne,
        Self::Nc,
        Self::Nw,
        Self::Se,
        Self::Sc,
        Self::Sw,
        Self::C,
        Self::Ce,
        Self::Cw,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Ne => "NE",
            Self::Nc => "NC",
            Self::Nw => "NW",
            Self::Se => "SE",
            Self::Sc => "SC",
            Self::Sw => "SW",
            Self::C => "C",
            Self::Ce => "CE",
            Self::Cw => "CW",
        }
    }

    pub fn horizontal(&self) -> BaseTerm {
        match self {
            Self::Ne | Self::Se | Self::Ce => BaseTerm::Start,
            Self::Nc | Self::Sc | Self::C => BaseTerm::Center,
            Self::Nw | Self::Sw | Self::Cw => BaseTerm::End,
        }
    }

    pub fn vertical(&self) -> BaseTerm {
        match self {
            Self::Ne | Self::Nc | Self::Nw => BaseTerm::Start,
            Self::C | Self::Ce | Self::Cw => BaseTerm::Center,
            Self::Se | Self::Sc | Self::Sw => BaseTerm::End,
        }
    }
}

impl FromStr for AnchorPosition {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.symbol() == s.trim())
            .ok_or_else(|| WatermarkError::InvalidPosition(s.to_string()))
    }
}

impl TryFrom<String> for AnchorPosition {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnchorPosition> for String {
    fn from(anchor: AnchorPosition) -> Self {
        anchor.symbol().to_string()
    }
}

impl fmt::Display for AnchorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ────────────────────────────────────────────────────────────────
// Margins
// ────────────────────────────────────────────────────────────────

/// Pixel margins from each edge. `None` means no margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginSet {
    #[serde(deserialize_with = "lenient_margin")]
    pub nord: Option<f64>,
    #[serde(deserialize_with = "lenient_margin")]
    pub south: Option<f64>,
    #[serde(deserialize_with = "lenient_margin")]
    pub east: Option<f64>,
    #[serde(deserialize_with = "lenient_margin")]
    pub west: Option<f64>,
}

impl Default for MarginSet {
    fn default() -> Self {
        Self {
            nord: None,
            south: Some(DEFAULT_MARGIN_SOUTH),
            east: None,
            west: Some(DEFAULT_MARGIN_WEST),
        }
    }
}

impl MarginSet {
    pub const NONE: MarginSet = MarginSet {
        nord: None,
        south: None,
        east: None,
        west: None,
    };

    pub fn nord(&self) -> f64 {
        normalize(self.nord)
    }

    pub fn south(&self) -> f64 {
        normalize(self.south)
    }

    pub fn east(&self) -> f64 {
        normalize(self.east)
    }

    pub fn west(&self) -> f64 {
        normalize(self.west)
    }
}

fn normalize(margin: Option<f64>) -> f64 {
    margin.filter(|value| value.is_finite()).unwrap_or(0.0)
}

/// Parse a textual margin. Empty, `none`, `null` and anything non-numeric mean
/// "no margin".
pub fn parse_margin(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("null")
    {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!("Ignoring non-numeric margin {:?}", raw);
            None
        }
    }
}

fn lenient_margin<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => parse_margin(&text),
        _ => None,
    })
}

// ────────────────────────────────────────────────────────────────
// Placement terms
// ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn main(&self) -> &'static str {
        match self {
            Self::Horizontal => "main_w",
            Self::Vertical => "main_h",
        }
    }

    fn overlay(&self) -> &'static str {
        match self {
            Self::Horizontal => "overlay_w",
            Self::Vertical => "overlay_h",
        }
    }
}

/// Offset of the anchor edge along one axis, before margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseTerm {
    /// `0`
    Start,
    /// `main/2-overlay/2`
    Center,
    /// `main-overlay`
    End,
}

impl BaseTerm {
    pub fn evaluate(&self, main: f64, overlay: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => main / 2.0 - overlay / 2.0,
            Self::End => main - overlay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    fn as_char(&self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

/// One signed margin term, e.g. `-15`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub sign: Sign,
    pub magnitude: f64,
}

impl Adjustment {
    pub fn value(&self) -> f64 {
        match self.sign {
            Sign::Plus => self.magnitude,
            Sign::Minus => -self.magnitude,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0.0
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign.as_char(), self.magnitude)
    }
}

/// Placement along one axis: base term followed by the two margin terms of
/// that axis, leading edge first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExpression {
    pub axis: Axis,
    pub base: BaseTerm,
    pub adjustments: [Adjustment; 2],
}

impl AxisExpression {
    /// Numeric offset for a concrete frame and overlay size along this axis.
    pub fn evaluate(&self, main: f64, overlay: f64) -> f64 {
        self.base.evaluate(main, overlay)
            + self
                .adjustments
                .iter()
                .map(Adjustment::value)
                .sum::<f64>()
    }
}

impl fmt::Display for AxisExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (main, overlay) = (self.axis.main(), self.axis.overlay());
        match self.base {
            BaseTerm::Start => f.write_str("0")?,
            BaseTerm::Center => write!(f, "{main}/2-{overlay}/2")?,
            BaseTerm::End => write!(f, "{main}-{overlay}")?,
        }
        for adjustment in self.adjustments.iter().filter(|a| !a.is_zero()) {
            write!(f, "{adjustment}")?;
        }
        Ok(())
    }
}

/// Overlay coordinates as `x:y` expressions over `main_*`/`overlay_*`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: AxisExpression,
    pub y: AxisExpression,
}

impl Placement {
    /// Top-left corner of the overlay for concrete frame and overlay sizes.
    pub fn evaluate(&self, main: (f64, f64), overlay: (f64, f64)) -> (f64, f64) {
        (
            self.x.evaluate(main.0, overlay.0),
            self.y.evaluate(main.1, overlay.1),
        )
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

pub fn parse_anchor(symbol: &str) -> WatermarkResult<AnchorPosition> {
    symbol.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_symbol_round_trips() {
        for anchor in AnchorPosition::ALL {
            assert_eq!(parse_anchor(anchor.symbol()), Ok(anchor));
        }
    }

    #[test]
    fn lowercase_and_unknown_symbols_are_invalid() {
        for bad in ["XX", "sw", "", "N", "SWW"] {
            assert_eq!(
                parse_anchor(bad),
                Err(WatermarkError::InvalidPosition(bad.to_string()))
            );
        }
    }

    #[test]
    fn margins_default_to_south_and_west() {
        let margins = MarginSet::default();
        assert_eq!(margins.south(), 15.0);
        assert_eq!(margins.west(), 15.0);
        assert_eq!(margins.nord(), 0.0);
        assert_eq!(margins.east(), 0.0);
    }

    #[test]
    fn non_finite_margins_normalize_to_zero() {
        let margins = MarginSet {
            nord: Some(f64::NAN),
            south: Some(f64::INFINITY),
            east: None,
            west: Some(-4.0),
        };
        assert_eq!(margins.nord(), 0.0);
        assert_eq!(margins.south(), 0.0);
        assert_eq!(margins.west(), -4.0);
    }

    #[test]
    fn parse_margin_is_lenient() {
        assert_eq!(parse_margin("15"), Some(15.0));
        assert_eq!(parse_margin(" -2.5 "), Some(-2.5));
        assert_eq!(parse_margin("none"), None);
        assert_eq!(parse_margin("NULL"), None);
        assert_eq!(parse_margin("abc"), None);
        assert_eq!(parse_margin("NaN"), None);
    }

    #[test]
    fn margin_set_deserializes_numbers_strings_and_nulls() {
        let margins: MarginSet =
            serde_json::from_str(r#"{"nord": "8", "south": null, "east": "wide"}"#).unwrap();
        assert_eq!(margins.nord, Some(8.0));
        assert_eq!(margins.south, None);
        assert_eq!(margins.east, None);
        // absent keys keep their default
        assert_eq!(margins.west, Some(15.0));
    }

    #[test]
    fn anchor_deserializes_from_symbol() {
        let anchor: AnchorPosition = serde_json::from_str(r#""CE""#).unwrap();
        assert_eq!(anchor, AnchorPosition::Ce);
        assert!(serde_json::from_str::<AnchorPosition>(r#""XX""#).is_err());
        assert_eq!(serde_json::to_string(&AnchorPosition::Nw).unwrap(), r#""NW""#);
    }

    #[test]
    fn zero_adjustments_are_not_rendered() {
        let expression = AxisExpression {
            axis: Axis::Vertical,
            base: BaseTerm::End,
            adjustments: [
                Adjustment { sign: Sign::Plus, magnitude: 0.0 },
                Adjustment { sign: Sign::Minus, magnitude: 2.5 },
            ],
        };
        assert_eq!(expression.to_string(), "main_h-overlay_h-2.5");
        assert_eq!(expression.evaluate(100.0, 10.0), 87.5);
    }
}
