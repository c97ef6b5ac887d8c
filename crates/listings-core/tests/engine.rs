// File: crates/listings-core/tests/engine.rs
// Purpose: Aggregation properties of the chart-spec engine (grouping, reduction, order, truncation).

mod common;

use common::{dataset, row};
use listings_core::{build, AggregationRecipe, Cell, ChartKind, Dataset, RecipeError, Reduction, SecondDimension};

#[test]
fn counts_by_group_descending() {
    let ds = dataset(vec![
        row(1, "Manhattan", "Harlem", "Private room", 50.0),
        row(2, "Manhattan", "Chelsea", "Private room", 80.0),
        row(3, "Brooklyn", "Bushwick", "Private room", 60.0),
    ]);
    let recipe = AggregationRecipe::new(ChartKind::Bar, &["neighbourhood_group"], Reduction::Count).descending();
    let spec = build(&recipe, &ds).expect("build");
    assert_eq!(spec.categories, vec!["Manhattan", "Brooklyn"]);
    assert_eq!(spec.values, vec![2.0, 1.0]);
}

#[test]
fn median_price_by_room_type() {
    let ds = dataset(vec![
        row(1, "Manhattan", "Harlem", "Entire home", 100.0),
        row(2, "Manhattan", "Harlem", "Entire home", 300.0),
        row(3, "Brooklyn", "Bushwick", "Private room", 50.0),
    ]);
    let recipe = AggregationRecipe::new(ChartKind::Bar, &["room_type"], Reduction::Median);
    let spec = build(&recipe, &ds).expect("build");
    assert_eq!(spec.value_of("Entire home"), Some(200.0));
    assert_eq!(spec.value_of("Private room"), Some(50.0));
}

#[test]
fn mean_and_odd_median() {
    let ds = dataset(vec![
        row(1, "Queens", "Astoria", "Private room", 10.0),
        row(2, "Queens", "Astoria", "Private room", 20.0),
        row(3, "Queens", "Astoria", "Private room", 90.0),
    ]);
    let mean = build(&AggregationRecipe::new(ChartKind::Bar, &["neighbourhood"], Reduction::Mean), &ds).unwrap();
    assert_eq!(mean.values, vec![40.0]);
    let median = build(&AggregationRecipe::new(ChartKind::Bar, &["neighbourhood"], Reduction::Median), &ds).unwrap();
    assert_eq!(median.values, vec![20.0]);
}

#[test]
fn unknown_grouping_column_is_recipe_error() {
    let ds = common::fixture();
    let recipe = AggregationRecipe::new(ChartKind::Bar, &["borough"], Reduction::Count);
    assert_eq!(build(&recipe, &ds).unwrap_err(), RecipeError::UnknownColumn("borough".into()));
    // Validation alone reports the same failure without any data.
    assert_eq!(recipe.validate().unwrap_err(), RecipeError::UnknownColumn("borough".into()));
}

#[test]
fn malformed_recipes_fail_fast() {
    let empty = Dataset::default();
    let median_of_text = AggregationRecipe::new(ChartKind::Bar, &["room_type"], Reduction::Median).value("neighbourhood");
    assert!(matches!(build(&median_of_text, &empty), Err(RecipeError::NonNumericValue { .. })));

    let float_group = AggregationRecipe::new(ChartKind::Bar, &["price"], Reduction::Count);
    assert_eq!(build(&float_group, &empty).unwrap_err(), RecipeError::NotGroupable("price"));

    let flat_heatmap = AggregationRecipe::new(ChartKind::Heatmap, &["room_type"], Reduction::Median);
    assert!(matches!(build(&flat_heatmap, &empty), Err(RecipeError::Dimensions { got: 1, .. })));

    let three_deep = AggregationRecipe::new(ChartKind::Bar, &["room_type", "neighbourhood", "id"], Reduction::Count);
    assert!(matches!(build(&three_deep, &empty), Err(RecipeError::Dimensions { got: 3, .. })));

    let bare_scatter = AggregationRecipe::new(ChartKind::Scatter, &["room_type"], Reduction::Count);
    assert_eq!(build(&bare_scatter, &empty).unwrap_err(), RecipeError::MissingEncoding);

    let mapped_heatmap = AggregationRecipe::new(ChartKind::Heatmap, &["neighbourhood_group", "room_type"], Reduction::Median)
        .points("longitude", "latitude", None);
    assert_eq!(build(&mapped_heatmap, &empty).unwrap_err(), RecipeError::UnexpectedEncoding(ChartKind::Heatmap));

    let mapped_bar = AggregationRecipe::new(ChartKind::Bar, &["room_type"], Reduction::Count).points("longitude", "latitude", None);
    assert_eq!(build(&mapped_bar, &empty).unwrap_err(), RecipeError::UnexpectedEncoding(ChartKind::Bar));

    let top_zero = AggregationRecipe::new(ChartKind::Bar, &["room_type"], Reduction::Count).top(0);
    assert_eq!(build(&top_zero, &empty).unwrap_err(), RecipeError::ZeroLimit);
}

#[test]
fn count_sums_to_dataset_size() {
    let ds = common::fixture();
    for col in ["neighbourhood", "neighbourhood_group", "room_type", "host_id"] {
        let spec = build(&AggregationRecipe::new(ChartKind::Pie, &[col], Reduction::Count), &ds).unwrap();
        assert_eq!(spec.values.iter().sum::<f64>() as usize, ds.len(), "column {col}");
    }
}

#[test]
fn missing_group_values_are_kept() {
    let ds = dataset(vec![
        row(1, "Manhattan", "Harlem", "Private room", 50.0),
        row(2, "", "Harlem", "Private room", 70.0),
        row(3, "  ", "Harlem", "Private room", 90.0),
    ]);
    let spec = build(&AggregationRecipe::new(ChartKind::Bar, &["neighbourhood_group"], Reduction::Count), &ds).unwrap();
    assert_eq!(spec.value_of("(unknown)"), Some(2.0));
    assert_eq!(spec.values.iter().sum::<f64>(), 3.0);
}

#[test]
fn top_n_keeps_largest_values() {
    let ds = common::fixture();
    let full = build(&AggregationRecipe::new(ChartKind::Bar, &["neighbourhood"], Reduction::Median).descending(), &ds).unwrap();
    let top = build(&AggregationRecipe::new(ChartKind::Bar, &["neighbourhood"], Reduction::Median).descending().top(5), &ds).unwrap();
    assert!(top.len() <= 5);
    assert_eq!(&full.categories[..5], &top.categories[..]);
    let min_kept = top.values.iter().copied().fold(f64::INFINITY, f64::min);
    for v in &full.values[top.len()..] {
        assert!(*v <= min_kept, "discarded {v} exceeds kept {min_kept}");
    }
}

#[test]
fn ties_break_by_label() {
    let ds = dataset(vec![
        row(1, "Queens", "Astoria", "Private room", 50.0),
        row(2, "Bronx", "Fordham", "Private room", 50.0),
        row(3, "Brooklyn", "Bushwick", "Private room", 50.0),
    ]);
    let spec = build(&AggregationRecipe::new(ChartKind::Bar, &["neighbourhood_group"], Reduction::Count).descending(), &ds).unwrap();
    assert_eq!(spec.categories, vec!["Bronx", "Brooklyn", "Queens"]);
}

#[test]
fn unsorted_groups_follow_label_order() {
    let ds = common::fixture();
    let spec = build(&AggregationRecipe::new(ChartKind::Bar, &["neighbourhood_group"], Reduction::Count), &ds).unwrap();
    assert_eq!(spec.categories, vec!["Brooklyn", "Manhattan", "Queens"]);
    assert_eq!(spec.values, vec![12.0, 18.0, 2.0]);
}

#[test]
fn build_is_idempotent() {
    let ds = common::fixture();
    for kind in [ChartKind::Bar, ChartKind::Treemap] {
        let recipe = AggregationRecipe::new(kind, &["neighbourhood_group", "neighbourhood"], Reduction::Median).descending();
        assert_eq!(build(&recipe, &ds).unwrap(), build(&recipe, &ds).unwrap());
    }
}

#[test]
fn empty_dataset_gives_empty_spec() {
    let ds = Dataset::default();
    let spec = build(&AggregationRecipe::new(ChartKind::Pie, &["room_type"], Reduction::Count).descending().top(3), &ds).unwrap();
    assert!(spec.is_empty());
    assert!(spec.values.is_empty());

    let heat = build(&AggregationRecipe::new(ChartKind::Heatmap, &["neighbourhood_group", "room_type"], Reduction::Median), &ds).unwrap();
    assert_eq!(heat.second, Some(SecondDimension::Matrix { rows: vec![], cells: vec![] }));
}

#[test]
fn heatmap_marks_absent_cells_as_no_data() {
    let ds = dataset(vec![
        row(1, "Manhattan", "Harlem", "Entire home", 200.0),
        row(2, "Manhattan", "Harlem", "Private room", 80.0),
        row(3, "Queens", "Astoria", "Shared room", 35.0),
    ]);
    let recipe = AggregationRecipe::new(ChartKind::Heatmap, &["neighbourhood_group", "room_type"], Reduction::Median);
    let spec = build(&recipe, &ds).unwrap();
    assert_eq!(spec.categories, vec!["Manhattan", "Queens"]);
    match spec.second {
        Some(SecondDimension::Matrix { rows, cells }) => {
            assert_eq!(rows, vec!["Entire home", "Private room", "Shared room"]);
            assert_eq!(cells[0], vec![Cell::Value(200.0), Cell::NoData]);
            assert_eq!(cells[1], vec![Cell::Value(80.0), Cell::NoData]);
            assert_eq!(cells[2], vec![Cell::NoData, Cell::Value(35.0)]);
        }
        other => panic!("expected matrix, got {other:?}"),
    }
}

#[test]
fn treemap_lists_only_observed_combinations() {
    let ds = common::fixture();
    let recipe = AggregationRecipe::new(ChartKind::Treemap, &["neighbourhood_group", "room_type"], Reduction::Count).descending();
    let spec = build(&recipe, &ds).unwrap();
    let Some(SecondDimension::Sparse { entries }) = &spec.second else { panic!("expected sparse entries") };
    // Shared rooms only occur in Queens.
    assert_eq!(entries.iter().filter(|e| e.inner == "Shared room").count(), 1);
    assert!(entries.iter().all(|e| e.value > 0.0));
    let total: f64 = entries.iter().map(|e| e.value).sum();
    assert_eq!(total as usize, ds.len());
    // Children of each parent sum to the parent's count.
    for (cat, v) in spec.pairs() {
        let children: f64 = entries.iter().filter(|e| e.outer == cat).map(|e| e.value).sum();
        assert_eq!(children, v);
    }
}

#[test]
fn scatter_carries_points_per_group() {
    let ds = common::fixture();
    let recipe = AggregationRecipe::new(ChartKind::Scatter, &["neighbourhood_group"], Reduction::Count)
        .points("longitude", "latitude", Some("price"));
    let spec = build(&recipe, &ds).unwrap();
    let Some(SecondDimension::Points { groups, x_label, .. }) = &spec.second else { panic!("expected points") };
    assert_eq!(x_label, "Longitude");
    assert_eq!(groups.len(), spec.len());
    for (pts, v) in groups.iter().zip(&spec.values) {
        assert_eq!(pts.len() as f64, *v);
        assert!(pts.iter().all(|p| p.size.is_some() && p.x < 0.0));
    }
}

#[test]
fn default_labels_and_hints() {
    let ds = common::fixture();
    let spec = build(&AggregationRecipe::new(ChartKind::Bar, &["room_type"], Reduction::Median).descending(), &ds).unwrap();
    assert_eq!(spec.title, "Median Price per Room Type");
    assert_eq!(spec.x_label, "Room Type");
    assert_eq!(spec.y_label, "Median Price ($)");
    assert_eq!(spec.style.tick_angle, None);
    assert!(!spec.style.show_values);

    let pie = build(&AggregationRecipe::new(ChartKind::Pie, &["room_type"], Reduction::Count), &ds).unwrap();
    assert_eq!(pie.title, "Room Type Distribution");
    assert_eq!(pie.style.hole, Some(0.3));
}

#[test]
fn heatmap_hints_and_recipe_overrides() {
    let ds = common::fixture();
    let heatmap = AggregationRecipe::new(ChartKind::Heatmap, &["neighbourhood_group", "room_type"], Reduction::Median);
    let spec = build(&heatmap, &ds).unwrap();
    assert_eq!(spec.style.tick_angle, Some(45));
    assert!(spec.style.show_values);
    assert!(!spec.style.show_scale);

    let flat = build(&heatmap.tick_angle(0), &ds).unwrap();
    assert_eq!(flat.style.tick_angle, Some(0));
    assert!(flat.style.show_values);

    let labelled = AggregationRecipe::new(ChartKind::Bar, &["room_type"], Reduction::Median).tick_angle(45).show_values();
    let spec = build(&labelled, &ds).unwrap();
    assert_eq!(spec.style.tick_angle, Some(45));
    assert!(spec.style.show_values);
    assert!(spec.style.show_scale);
}

#[test]
fn build_runs_from_many_threads() {
    let ds = common::fixture();
    let recipe = AggregationRecipe::new(ChartKind::Bar, &["neighbourhood"], Reduction::Median).descending().top(10);
    let expected = build(&recipe, &ds).unwrap();
    std::thread::scope(|s| {
        let handles = (0..4).map(|_| s.spawn(|| build(&recipe, &ds).unwrap())).collect::<Vec<_>>();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
