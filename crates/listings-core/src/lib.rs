// File: crates/listings-core/src/lib.rs
// Summary: Core library entry point; dataset accessor, aggregation engine and chart-spec API.

pub mod dataset;
pub mod engine;
pub mod error;
pub mod recipe;
pub mod spec;
pub mod summary;
pub mod theme;
pub mod views;

pub use dataset::{Column, Dataset, ListingRecord};
pub use engine::build;
pub use error::{DataLoadError, RecipeError};
pub use recipe::{AggregationRecipe, ChartKind, Reduction, SortOrder, Truncation};
pub use spec::{Cell, ChartSpec, SecondDimension};
pub use summary::Summary;
pub use theme::Palette;
pub use views::{build_view, Tab, ViewId};
