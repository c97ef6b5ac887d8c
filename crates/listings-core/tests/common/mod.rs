// File: crates/listings-core/tests/common/mod.rs
// Purpose: Shared fixtures for integration tests.

#![allow(dead_code)]

use listings_core::{Dataset, ListingRecord};

pub fn fixture_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/listings.csv")
}

pub fn fixture() -> Dataset { Dataset::load(fixture_path()).expect("fixture loads") }

pub fn row(id: u64, group: &str, neighbourhood: &str, room_type: &str, price: f64) -> ListingRecord {
    ListingRecord {
        id,
        host_id: id * 10,
        neighbourhood: neighbourhood.to_string(),
        neighbourhood_group: group.to_string(),
        room_type: room_type.to_string(),
        latitude: 40.7,
        longitude: -73.9,
        price,
    }
}

pub fn dataset(rows: Vec<ListingRecord>) -> Dataset { Dataset::from_records(rows) }
