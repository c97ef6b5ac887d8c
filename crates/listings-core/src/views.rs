// File: crates/listings-core/src/views.rs
// Summary: Named dashboard views per tab, each resolving to an aggregation recipe.

use std::fmt;

use crate::dataset::Dataset;
use crate::engine;
use crate::error::RecipeError;
use crate::recipe::{AggregationRecipe, ChartKind, Reduction};
use crate::spec::ChartSpec;

/// Cut-off for the "top neighbourhoods" views.
pub const TOP_NEIGHBOURHOODS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Price,
    Geo,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Price, Tab::Geo];

    pub const fn id(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Price => "price",
            Tab::Geo => "geo",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Price => "Price Analysis",
            Tab::Geo => "Geographic Analysis",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Tab::ALL.into_iter().find(|t| t.id().eq_ignore_ascii_case(s.trim()))
    }

    pub fn views(self) -> &'static [ViewId] {
        match self {
            Tab::Overview => &[ViewId::NeighbourhoodGroupShare, ViewId::RoomTypeShare, ViewId::TopNeighbourhoods],
            Tab::Price => &[
                ViewId::PriceByNeighbourhoodGroup,
                ViewId::PriceByRoomType,
                ViewId::TopNeighbourhoodsByPrice,
                ViewId::PriceHeatmap,
            ],
            Tab::Geo => &[ViewId::ListingMap, ViewId::NeighbourhoodTreemap],
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.id()) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewId {
    NeighbourhoodGroupShare,
    RoomTypeShare,
    TopNeighbourhoods,
    PriceByNeighbourhoodGroup,
    PriceByRoomType,
    TopNeighbourhoodsByPrice,
    PriceHeatmap,
    ListingMap,
    NeighbourhoodTreemap,
}

impl ViewId {
    pub const ALL: [ViewId; 9] = [
        ViewId::NeighbourhoodGroupShare,
        ViewId::RoomTypeShare,
        ViewId::TopNeighbourhoods,
        ViewId::PriceByNeighbourhoodGroup,
        ViewId::PriceByRoomType,
        ViewId::TopNeighbourhoodsByPrice,
        ViewId::PriceHeatmap,
        ViewId::ListingMap,
        ViewId::NeighbourhoodTreemap,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            ViewId::NeighbourhoodGroupShare => "neighbourhood-group-share",
            ViewId::RoomTypeShare => "room-type-share",
            ViewId::TopNeighbourhoods => "top-neighbourhoods",
            ViewId::PriceByNeighbourhoodGroup => "price-by-neighbourhood-group",
            ViewId::PriceByRoomType => "price-by-room-type",
            ViewId::TopNeighbourhoodsByPrice => "top-neighbourhoods-by-price",
            ViewId::PriceHeatmap => "price-heatmap",
            ViewId::ListingMap => "listing-map",
            ViewId::NeighbourhoodTreemap => "neighbourhood-treemap",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RecipeError> {
        ViewId::ALL
            .into_iter()
            .find(|v| v.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecipeError::UnknownView(s.to_string()))
    }

    pub fn tab(self) -> Tab {
        Tab::ALL.into_iter().find(|t| t.views().contains(&self)).unwrap_or(Tab::Overview)
    }

    pub fn recipe(self) -> AggregationRecipe {
        use ChartKind::*;
        use Reduction::*;
        match self {
            ViewId::NeighbourhoodGroupShare => AggregationRecipe::new(Pie, &["neighbourhood_group"], Count).descending(),
            ViewId::RoomTypeShare => AggregationRecipe::new(Pie, &["room_type"], Count).descending(),
            ViewId::TopNeighbourhoods => AggregationRecipe::new(Bar, &["neighbourhood"], Count)
                .descending()
                .top(TOP_NEIGHBOURHOODS)
                .title(format!("Top {TOP_NEIGHBOURHOODS} Neighbourhoods")),
            ViewId::PriceByNeighbourhoodGroup => AggregationRecipe::new(Bar, &["neighbourhood_group"], Median)
                .descending()
                .tick_angle(45)
                .show_values(),
            ViewId::PriceByRoomType => AggregationRecipe::new(Bar, &["room_type"], Median)
                .descending()
                .tick_angle(45)
                .show_values(),
            ViewId::TopNeighbourhoodsByPrice => AggregationRecipe::new(Bar, &["neighbourhood"], Median)
                .descending()
                .top(TOP_NEIGHBOURHOODS)
                .title(format!("Top {TOP_NEIGHBOURHOODS} Neighbourhoods by Median Price")),
            ViewId::PriceHeatmap => AggregationRecipe::new(Heatmap, &["neighbourhood_group", "room_type"], Median)
                .title("Median Price by Neighbourhood & Room Type"),
            ViewId::ListingMap => AggregationRecipe::new(Scatter, &["neighbourhood_group"], Count)
                .points("longitude", "latitude", Some("price"))
                .title("Neighbourhood Group Distribution on Map"),
            ViewId::NeighbourhoodTreemap => {
                AggregationRecipe::new(Treemap, &["neighbourhood_group", "neighbourhood"], Count).descending()
            }
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.id()) }
}

/// Recipe for a view id. Unknown ids are a [`RecipeError::UnknownView`].
pub fn recipe(id: &str) -> Result<AggregationRecipe, RecipeError> { ViewId::parse(id).map(ViewId::recipe) }

/// Resolve a view id and build its chart.
pub fn build_view(id: &str, dataset: &Dataset) -> Result<ChartSpec, RecipeError> {
    engine::build(&recipe(id)?, dataset)
}
