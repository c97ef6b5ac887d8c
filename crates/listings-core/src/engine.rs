// File: crates/listings-core/src/engine.rs
// Summary: Applies an aggregation recipe to the dataset and packages the result as a ChartSpec.
// Notes:
// - Grouping goes through BTreeMaps, so output order never depends on hash iteration.
// - Nothing here writes shared state; `build` can run from any number of threads.

use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::{Column, Dataset, ListingRecord};
use crate::error::RecipeError;
use crate::recipe::{AggregationRecipe, ChartKind, Reduction, ResolvedEncoding, ResolvedRecipe, SortOrder, Truncation};
use crate::spec::{Cell, ChartSpec, CrossEntry, Point, SecondDimension, StyleHints, ValueFormat};
use crate::theme::Palette;

/// Rows sharing one group label, with their reduced value.
struct Group<'a> {
    label: String,
    value: f64,
    rows: Vec<&'a ListingRecord>,
}

/// Build the chart for `recipe` over `dataset`.
///
/// The recipe is validated first; a malformed recipe fails before any row is read.
pub fn build(recipe: &AggregationRecipe, dataset: &Dataset) -> Result<ChartSpec, RecipeError> {
    let resolved = recipe.validate()?;
    let outer = resolved.group_by[0];

    let mut groups = partition(dataset.rows().iter(), outer, recipe.reduction, resolved.value);
    order(&mut groups, recipe.sort);
    if let Truncation::Top(n) = recipe.truncate {
        groups.truncate(n);
    }

    let second = match (resolved.group_by.get(1), resolved.encoding) {
        (Some(&inner), _) => Some(cross(&groups, inner, recipe, &resolved)),
        (None, Some(enc)) => Some(points(&groups, enc)),
        (None, None) => None,
    };

    let spec = ChartSpec {
        kind: recipe.kind,
        title: recipe.title.clone().unwrap_or_else(|| default_title(recipe, &resolved)),
        x_label: recipe.x_label.clone().unwrap_or_else(|| default_x_label(&resolved)),
        y_label: recipe.y_label.clone().unwrap_or_else(|| default_y_label(recipe.reduction, &resolved)),
        categories: groups.iter().map(|g| g.label.clone()).collect(),
        values: groups.iter().map(|g| g.value).collect(),
        second,
        palette: recipe.palette.unwrap_or(match recipe.kind {
            ChartKind::Heatmap => Palette::Greens,
            _ => Palette::Set2,
        }),
        style: style_for(recipe, resolved.value),
    };
    tracing::debug!(kind = %spec.kind, title = %spec.title, categories = spec.len(), rows = dataset.len(), "built chart spec");
    Ok(spec)
}

fn partition<'a>(
    rows: impl Iterator<Item = &'a ListingRecord>,
    column: Column,
    reduction: Reduction,
    value: Column,
) -> Vec<Group<'a>> {
    let mut by_label: BTreeMap<String, Vec<&'a ListingRecord>> = BTreeMap::new();
    for r in rows {
        by_label.entry(r.label(column)).or_default().push(r);
    }
    by_label
        .into_iter()
        .map(|(label, rows)| Group { value: reduce(reduction, value, &rows), label, rows })
        .collect()
}

fn order(groups: &mut [Group<'_>], sort: SortOrder) {
    match sort {
        // Already in label order from the BTreeMap.
        SortOrder::None => {}
        SortOrder::Descending => {
            groups.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label)))
        }
    }
}

/// Reduce a non-empty group. Groups only exist for labels seen in the data.
fn reduce(reduction: Reduction, value: Column, rows: &[&ListingRecord]) -> f64 {
    match reduction {
        Reduction::Count => rows.len() as f64,
        Reduction::Mean => {
            let vs = numbers(value, rows);
            if vs.is_empty() { return 0.0; }
            vs.iter().sum::<f64>() / vs.len() as f64
        }
        Reduction::Median => median(numbers(value, rows)).unwrap_or(0.0),
    }
}

fn numbers(value: Column, rows: &[&ListingRecord]) -> Vec<f64> {
    rows.iter().filter_map(|r| r.number(value)).collect()
}

/// Median of `vs`; the mean of the two middle values for even lengths.
pub fn median(mut vs: Vec<f64>) -> Option<f64> {
    if vs.is_empty() { return None; }
    vs.sort_by(|a, b| a.total_cmp(b));
    let mid = vs.len() / 2;
    if vs.len() % 2 == 1 { Some(vs[mid]) } else { Some((vs[mid - 1] + vs[mid]) * 0.5) }
}

fn cross(groups: &[Group<'_>], inner: Column, recipe: &AggregationRecipe, resolved: &ResolvedRecipe) -> SecondDimension {
    let nested = groups
        .iter()
        .map(|g| {
            let mut sub = partition(g.rows.iter().copied(), inner, recipe.reduction, resolved.value);
            order(&mut sub, recipe.sort);
            (g.label.as_str(), sub)
        })
        .collect::<Vec<_>>();

    if recipe.kind == ChartKind::Heatmap {
        let rows = nested
            .iter()
            .flat_map(|(_, sub)| sub.iter().map(|s| s.label.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let cells = rows
            .iter()
            .map(|row| {
                nested
                    .iter()
                    .map(|(_, sub)| sub.iter().find(|s| &s.label == row).map_or(Cell::NoData, |s| Cell::Value(s.value)))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        return SecondDimension::Matrix { rows, cells };
    }

    let entries = nested
        .into_iter()
        .flat_map(|(outer, sub)| {
            sub.into_iter().map(move |s| CrossEntry { outer: outer.to_string(), inner: s.label, value: s.value })
        })
        .collect();
    SecondDimension::Sparse { entries }
}

fn points(groups: &[Group<'_>], enc: ResolvedEncoding) -> SecondDimension {
    let groups = groups
        .iter()
        .map(|g| {
            g.rows
                .iter()
                .filter_map(|r| {
                    Some(Point {
                        x: r.number(enc.x)?,
                        y: r.number(enc.y)?,
                        size: enc.size.and_then(|c| r.number(c)),
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    SecondDimension::Points { x_label: enc.x.title(), y_label: enc.y.title(), groups }
}

fn default_title(recipe: &AggregationRecipe, resolved: &ResolvedRecipe) -> String {
    let by = resolved.group_by.iter().map(|c| c.title()).collect::<Vec<_>>().join(" & ");
    match (recipe.reduction, recipe.kind, recipe.truncate) {
        (_, ChartKind::Scatter, _) => format!("{by} Distribution on Map"),
        (Reduction::Count, ChartKind::Pie, _) => format!("{by} Distribution"),
        (Reduction::Count, _, Truncation::Top(n)) => format!("Top {n} {by}s"),
        (Reduction::Count, _, Truncation::None) => format!("Listings per {by}"),
        (r, _, Truncation::Top(n)) => format!("Top {n} {by}s by {} {}", capitalize(r.name()), resolved.value.title()),
        (r, _, Truncation::None) => format!("{} {} per {by}", capitalize(r.name()), resolved.value.title()),
    }
}

fn default_x_label(resolved: &ResolvedRecipe) -> String {
    match resolved.encoding {
        Some(enc) => enc.x.title(),
        None => resolved.group_by[0].title(),
    }
}

fn default_y_label(reduction: Reduction, resolved: &ResolvedRecipe) -> String {
    if let Some(enc) = resolved.encoding {
        return enc.y.title();
    }
    if let Some(inner) = resolved.group_by.get(1) {
        return inner.title();
    }
    match reduction {
        Reduction::Count => "Listings".to_string(),
        r if resolved.value == Column::Price => format!("{} Price ($)", capitalize(r.name())),
        r => format!("{} {}", capitalize(r.name()), resolved.value.title()),
    }
}

fn style_for(recipe: &AggregationRecipe, value: Column) -> StyleHints {
    let value_format = match recipe.reduction {
        Reduction::Count => ValueFormat::Count,
        _ if value == Column::Price => ValueFormat::Currency,
        _ => ValueFormat::Number,
    };
    let base = StyleHints { value_format, ..StyleHints::default() };
    let hints = match recipe.kind {
        ChartKind::Bar | ChartKind::Treemap => base,
        ChartKind::Heatmap => StyleHints { tick_angle: Some(45), show_values: true, show_scale: false, ..base },
        ChartKind::Pie => StyleHints { hole: Some(0.3), text_info: Some("percent+label"), ..base },
        ChartKind::Scatter => StyleHints { show_legend: true, opacity: Some(0.6), show_axes: false, ..base },
    };
    StyleHints {
        tick_angle: recipe.tick_angle.or(hints.tick_angle),
        show_values: hints.show_values || recipe.show_values,
        ..hints
    }
}

fn capitalize(s: &str) -> String {
    let mut cs = s.chars();
    match cs.next() {
        Some(f) => f.to_uppercase().chain(cs).collect(),
        None => String::new(),
    }
}
