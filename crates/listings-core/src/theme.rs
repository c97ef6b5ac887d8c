// File: crates/listings-core/src/theme.rs
// Summary: Palette references carried by chart specs, resolved to hex colors for renderers.

use serde::{Deserialize, Serialize};

/// Named color palette. Specs carry the reference; renderers resolve the colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Palette {
    /// Qualitative, one color per category.
    #[default]
    Set2,
    /// Sequential light-to-dark green, for heatmap cells.
    Greens,
}

const SET2: [&str; 8] = ["#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3"];

const GREENS: [&str; 9] = [
    "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#006d2c", "#00441b",
];

impl Palette {
    pub const fn name(self) -> &'static str {
        match self {
            Palette::Set2 => "set2",
            Palette::Greens => "greens",
        }
    }

    pub const fn colors(self) -> &'static [&'static str] {
        match self {
            Palette::Set2 => &SET2,
            Palette::Greens => &GREENS,
        }
    }

    /// Color for the i-th category, cycling through the palette.
    pub fn color_at(self, i: usize) -> &'static str {
        let cs = self.colors();
        cs[i % cs.len()]
    }
}

/// Return the built-in palettes.
pub fn presets() -> Vec<Palette> { vec![Palette::Set2, Palette::Greens] }

/// Find a palette by its `name`, falling back to Set2.
pub fn find(name: &str) -> Palette {
    for p in presets() { if p.name().eq_ignore_ascii_case(name.trim()) { return p; } }
    Palette::Set2
}
