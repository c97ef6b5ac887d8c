// File: crates/listings-core/src/spec.rs
// Summary: Renderer-agnostic chart specification produced by the engine.
// Notes:
// - Categories and values are parallel vectors; for two-dimension recipes they
//   carry the reduction over the outer group alone.
// - Heatmap cells use an explicit NoData marker so a missing combination never
//   reads as zero.

use serde::{Serialize, Serializer};

use crate::recipe::ChartKind;
use crate::theme::Palette;

/// How a renderer should format reduced values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueFormat {
    Count,
    Currency,
    Number,
}

/// Presentation hints. Renderers may ignore any of them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyleHints {
    pub value_format: ValueFormat,
    pub show_legend: bool,
    /// Rotation of category tick labels, in degrees.
    pub tick_angle: Option<i32>,
    /// Inner radius ratio for donut-style pies.
    pub hole: Option<f64>,
    /// Slice text content for pies, e.g. `percent+label`.
    pub text_info: Option<&'static str>,
    pub opacity: Option<f64>,
    pub show_axes: bool,
    /// Print each reduced value on its bar or cell.
    pub show_values: bool,
    /// Draw the colour scale next to a heatmap.
    pub show_scale: bool,
}

impl Default for StyleHints {
    fn default() -> Self {
        Self {
            value_format: ValueFormat::Number,
            show_legend: false,
            tick_angle: None,
            hole: None,
            text_info: None,
            opacity: None,
            show_axes: true,
            show_values: false,
            show_scale: true,
        }
    }
}

/// One heatmap cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell {
    Value(f64),
    NoData,
}

impl Cell {
    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::NoData => None,
        }
    }
}

// NoData serializes as `null`.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Value(v) => s.serialize_f64(*v),
            Cell::NoData => s.serialize_none(),
        }
    }
}

/// A combination of outer and inner group that occurs in the data.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrossEntry {
    pub outer: String,
    pub inner: String,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub size: Option<f64>,
}

/// Data beyond the category/value pairs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SecondDimension {
    /// Dense grid: `cells[row][col]` lines up with `rows` and the spec's categories.
    Matrix { rows: Vec<String>, cells: Vec<Vec<Cell>> },
    /// Observed combinations only, ordered by outer category then inner rank.
    Sparse { entries: Vec<CrossEntry> },
    /// Raw points per category, `groups[i]` belongs to `categories[i]`.
    Points { x_label: String, y_label: String, groups: Vec<Vec<Point>> },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub second: Option<SecondDimension>,
    pub palette: Palette,
    pub style: StyleHints,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool { self.categories.is_empty() }

    pub fn len(&self) -> usize { self.categories.len() }

    /// Iterate (category, value) pairs in display order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.categories.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Value for a category label, if present.
    pub fn value_of(&self, category: &str) -> Option<f64> {
        self.pairs().find(|(c, _)| *c == category).map(|(_, v)| v)
    }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }
}
