// File: crates/listings-core/tests/summary.rs
// Purpose: Overview stat cards derive every figure from the loaded rows.

mod common;

use listings_core::{Dataset, Summary};

#[test]
fn fixture_summary() {
    let s = Summary::from_dataset(&common::fixture());
    assert_eq!(s.total_listings, 32);
    // Host 22486 owns three listings.
    assert_eq!(s.total_hosts, 30);
    assert_eq!(s.neighbourhood_groups, 3);
    assert_eq!(s.median_price, Some(89.0));
}

#[test]
fn cards_format_figures() {
    let rows = (0..1234).map(|i| common::row(i, "Bronx", "Fordham", "Private room", 100.0)).collect();
    let s = Summary::from_dataset(&common::dataset(rows));
    let cards = s.cards();
    assert_eq!(cards[0].title, "Total Listings");
    assert_eq!(cards[0].value, "1,234");
    assert_eq!(cards[1].title, "Total Hosts");
    assert_eq!(cards[1].value, "1,234");
    assert_eq!(cards[3].value, "$100");
}

#[test]
fn empty_summary_has_no_prices() {
    let s = Summary::from_dataset(&Dataset::default());
    assert_eq!(s.total_listings, 0);
    assert_eq!(s.median_price, None);
    assert_eq!(s.mean_price, None);
    assert_eq!(s.cards()[3].value, "n/a");
}
