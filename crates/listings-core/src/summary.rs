// File: crates/listings-core/src/summary.rs
// Summary: Headline figures for the overview tab, always derived from the loaded rows.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dataset::{Column, Dataset};
use crate::engine::median;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_listings: usize,
    pub total_hosts: usize,
    pub neighbourhoods: usize,
    pub neighbourhood_groups: usize,
    pub median_price: Option<f64>,
    pub mean_price: Option<f64>,
}

/// A labelled figure ready for a stat card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

impl Summary {
    pub fn from_dataset(ds: &Dataset) -> Self {
        let rows = ds.rows();
        let distinct = |c: Column| rows.iter().map(|r| r.label(c)).collect::<BTreeSet<_>>().len();
        let prices = rows.iter().map(|r| r.price).collect::<Vec<_>>();
        let mean_price = if prices.is_empty() { None } else { Some(prices.iter().sum::<f64>() / prices.len() as f64) };
        Self {
            total_listings: rows.len(),
            total_hosts: rows.iter().map(|r| r.host_id).collect::<BTreeSet<_>>().len(),
            neighbourhoods: distinct(Column::Neighbourhood),
            neighbourhood_groups: distinct(Column::NeighbourhoodGroup),
            median_price: median(prices),
            mean_price,
        }
    }

    pub fn cards(&self) -> Vec<StatCard> {
        let money = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |p| format!("${p:.0}"));
        vec![
            StatCard { title: "Total Listings", value: group_thousands(self.total_listings) },
            StatCard { title: "Total Hosts", value: group_thousands(self.total_hosts) },
            StatCard { title: "Neighbourhoods", value: group_thousands(self.neighbourhoods) },
            StatCard { title: "Median Price", value: money(self.median_price) },
        ]
    }
}

/// `37457` -> `37,457`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push(','); }
        out.push(ch);
    }
    out
}
