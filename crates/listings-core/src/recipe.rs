// File: crates/listings-core/src/recipe.rs
// Summary: Declarative aggregation recipes (group, reduce, sort, truncate) and their validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{Column, ColumnType};
use crate::error::RecipeError;
use crate::theme::Palette;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Bar,
    Pie,
    Scatter,
    Heatmap,
    Treemap,
}

impl ChartKind {
    /// Allowed number of grouping columns, as (min, max, display).
    const fn dimensions(self) -> (usize, usize, &'static str) {
        match self {
            ChartKind::Pie | ChartKind::Scatter => (1, 1, "1"),
            ChartKind::Heatmap => (2, 2, "2"),
            ChartKind::Bar | ChartKind::Treemap => (1, 2, "1 or 2"),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Treemap => "treemap",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reduction {
    Count,
    Median,
    Mean,
}

impl Reduction {
    pub const fn name(self) -> &'static str {
        match self {
            Reduction::Count => "count",
            Reduction::Median => "median",
            Reduction::Mean => "mean",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Groups stay in label order.
    #[default]
    None,
    /// Largest reduced value first; ties by label.
    Descending,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Truncation {
    #[default]
    None,
    Top(usize),
}

/// Which numeric columns place and size the points of a scatter chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointEncoding {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub size: Option<String>,
}

fn default_value_column() -> String { Column::Price.name().to_string() }

/// One derived view: what to group by, how to reduce, how to order and cut, and how to present it.
///
/// Column names are kept as strings so recipes can arrive from outside (JSON, a UI);
/// [`AggregationRecipe::validate`] resolves them against the schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AggregationRecipe {
    pub kind: ChartKind,
    pub group_by: Vec<String>,
    pub reduction: Reduction,
    #[serde(default = "default_value_column")]
    pub value: String,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub truncate: Truncation,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    #[serde(default)]
    pub palette: Option<Palette>,
    #[serde(default)]
    pub encoding: Option<PointEncoding>,
    /// Rotation of category tick labels; overrides the chart kind's default.
    #[serde(default)]
    pub tick_angle: Option<i32>,
    /// Print reduced values on bars or cells.
    #[serde(default)]
    pub show_values: bool,
}

impl AggregationRecipe {
    pub fn new(kind: ChartKind, group_by: &[&str], reduction: Reduction) -> Self {
        Self {
            kind,
            group_by: group_by.iter().map(|s| s.to_string()).collect(),
            reduction,
            value: default_value_column(),
            sort: SortOrder::None,
            truncate: Truncation::None,
            title: None,
            x_label: None,
            y_label: None,
            palette: None,
            encoding: None,
            tick_angle: None,
            show_values: false,
        }
    }

    pub fn value(mut self, column: &str) -> Self {
        self.value = column.to_string();
        self
    }

    pub fn descending(mut self) -> Self {
        self.sort = SortOrder::Descending;
        self
    }

    pub fn top(mut self, n: usize) -> Self {
        self.truncate = Truncation::Top(n);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn tick_angle(mut self, degrees: i32) -> Self {
        self.tick_angle = Some(degrees);
        self
    }

    pub fn show_values(mut self) -> Self {
        self.show_values = true;
        self
    }

    pub fn points(mut self, x: &str, y: &str, size: Option<&str>) -> Self {
        self.encoding = Some(PointEncoding { x: x.to_string(), y: y.to_string(), size: size.map(str::to_string) });
        self
    }

    /// Check the recipe against the schema without looking at any data.
    pub fn validate(&self) -> Result<ResolvedRecipe, RecipeError> {
        let (min, max, expected) = self.kind.dimensions();
        let got = self.group_by.len();
        if got < min || got > max {
            return Err(RecipeError::Dimensions { kind: self.kind, expected, got });
        }

        let mut group_by = Vec::with_capacity(got);
        for name in &self.group_by {
            let col = Column::parse(name)?;
            if col.kind() == ColumnType::Float {
                return Err(RecipeError::NotGroupable(col.name()));
            }
            group_by.push(col);
        }

        let value = Column::parse(&self.value)?;
        if self.reduction != Reduction::Count && !value.kind().is_numeric() {
            return Err(RecipeError::NonNumericValue { reduction: self.reduction.name(), column: value.name() });
        }

        if self.truncate == Truncation::Top(0) {
            return Err(RecipeError::ZeroLimit);
        }

        let encoding = match (&self.encoding, self.kind) {
            (Some(_), kind) if kind != ChartKind::Scatter => return Err(RecipeError::UnexpectedEncoding(kind)),
            (Some(enc), _) => Some(ResolvedEncoding {
                x: numeric_column(&enc.x, self.reduction)?,
                y: numeric_column(&enc.y, self.reduction)?,
                size: enc.size.as_deref().map(|s| numeric_column(s, self.reduction)).transpose()?,
            }),
            (None, ChartKind::Scatter) => return Err(RecipeError::MissingEncoding),
            (None, _) => None,
        };

        Ok(ResolvedRecipe { group_by, value, encoding })
    }
}

fn numeric_column(name: &str, reduction: Reduction) -> Result<Column, RecipeError> {
    let col = Column::parse(name)?;
    if !col.kind().is_numeric() {
        return Err(RecipeError::NonNumericValue { reduction: reduction.name(), column: col.name() });
    }
    Ok(col)
}

/// Schema-checked columns of a recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRecipe {
    pub group_by: Vec<Column>,
    pub value: Column,
    pub encoding: Option<ResolvedEncoding>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedEncoding {
    pub x: Column,
    pub y: Column,
    pub size: Option<Column>,
}
