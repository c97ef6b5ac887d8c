// File: crates/listings-core/src/dataset.rs
// Summary: Listings table loaded once from CSV; read-only rows and column schema.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{DataLoadError, RecipeError};

/// Label used for rows whose categorical cell is empty.
pub const MISSING_LABEL: &str = "(unknown)";

/// One row of the listings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingRecord {
    pub id: u64,
    pub host_id: u64,
    pub neighbourhood: String,
    pub neighbourhood_group: String,
    pub room_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
}

/// Storage class of a column; decides what it can be grouped on or reduced over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Categorical,
    Integer,
    Float,
}

impl ColumnType {
    pub const fn is_numeric(self) -> bool { !matches!(self, ColumnType::Categorical) }
}

/// The listing schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    HostId,
    Neighbourhood,
    NeighbourhoodGroup,
    RoomType,
    Latitude,
    Longitude,
    Price,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::HostId,
        Column::Neighbourhood,
        Column::NeighbourhoodGroup,
        Column::RoomType,
        Column::Latitude,
        Column::Longitude,
        Column::Price,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::HostId => "host_id",
            Column::Neighbourhood => "neighbourhood",
            Column::NeighbourhoodGroup => "neighbourhood_group",
            Column::RoomType => "room_type",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::Price => "price",
        }
    }

    pub const fn kind(self) -> ColumnType {
        match self {
            Column::Id | Column::HostId => ColumnType::Integer,
            Column::Neighbourhood | Column::NeighbourhoodGroup | Column::RoomType => ColumnType::Categorical,
            Column::Latitude | Column::Longitude | Column::Price => ColumnType::Float,
        }
    }

    /// Resolve a column by name (case-insensitive, surrounding whitespace ignored).
    pub fn parse(name: &str) -> Result<Self, RecipeError> {
        let want = name.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(want))
            .ok_or_else(|| RecipeError::UnknownColumn(name.to_string()))
    }

    /// Human-readable title, e.g. `neighbourhood_group` -> `Neighbourhood Group`.
    pub fn title(self) -> String {
        self.name()
            .split('_')
            .map(|w| {
                let mut cs = w.chars();
                match cs.next() {
                    Some(f) => f.to_uppercase().chain(cs).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl ListingRecord {
    /// Group label of a categorical or integer column. Empty cells map to [`MISSING_LABEL`].
    pub fn label(&self, column: Column) -> String {
        let text = match column {
            Column::Neighbourhood => self.neighbourhood.as_str(),
            Column::NeighbourhoodGroup => self.neighbourhood_group.as_str(),
            Column::RoomType => self.room_type.as_str(),
            Column::Id => return self.id.to_string(),
            Column::HostId => return self.host_id.to_string(),
            Column::Latitude => return self.latitude.to_string(),
            Column::Longitude => return self.longitude.to_string(),
            Column::Price => return self.price.to_string(),
        };
        let text = text.trim();
        if text.is_empty() { MISSING_LABEL.to_string() } else { text.to_string() }
    }

    /// Numeric value of a column, `None` for categorical columns.
    pub fn number(&self, column: Column) -> Option<f64> {
        match column {
            Column::Id => Some(self.id as f64),
            Column::HostId => Some(self.host_id as f64),
            Column::Latitude => Some(self.latitude),
            Column::Longitude => Some(self.longitude),
            Column::Price => Some(self.price),
            Column::Neighbourhood | Column::NeighbourhoodGroup | Column::RoomType => None,
        }
    }
}

/// Immutable listings table.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    columns: BTreeSet<String>,
    rows: Vec<ListingRecord>,
}

impl Dataset {
    /// Load the table from a CSV file with a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io { path: path.to_path_buf(), source })?;
        let ds = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), rows = ds.len(), columns = ds.columns.len(), "loaded listings");
        Ok(ds)
    }

    /// Parse CSV from any reader. Required columns are matched by name; extra columns are kept in the schema only.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataLoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
        tracing::debug!(?headers, "csv headers");

        let idx = |c: Column| headers.iter().position(|h| h == c.name());
        let missing = Column::ALL
            .into_iter()
            .filter(|c| idx(*c).is_none())
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns(missing));
        }
        // All present after the check above.
        let at = Column::ALL.map(|c| idx(c).unwrap_or_default());
        let pos = |c: Column| at[c as usize];

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            let line = rec.position().map(|p| p.line()).unwrap_or_default();
            let text = |c: Column| rec.get(pos(c)).unwrap_or("").trim().to_string();
            let float = |c: Column| -> Result<f64, DataLoadError> {
                let raw = rec.get(pos(c)).unwrap_or("").trim();
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DataLoadError::InvalidNumber { line, column: c.name(), value: raw.to_string() })
            };
            let int = |c: Column| -> Result<u64, DataLoadError> {
                let raw = rec.get(pos(c)).unwrap_or("").trim();
                raw.parse::<u64>()
                    .ok()
                    .ok_or_else(|| DataLoadError::InvalidNumber { line, column: c.name(), value: raw.to_string() })
            };

            let price = float(Column::Price)?;
            if price < 0.0 {
                return Err(DataLoadError::NegativePrice { line, price });
            }
            rows.push(ListingRecord {
                id: int(Column::Id)?,
                host_id: int(Column::HostId)?,
                neighbourhood: text(Column::Neighbourhood),
                neighbourhood_group: text(Column::NeighbourhoodGroup),
                room_type: text(Column::RoomType),
                latitude: float(Column::Latitude)?,
                longitude: float(Column::Longitude)?,
                price,
            });
        }

        Ok(Self { columns: headers.into_iter().collect(), rows })
    }

    /// Build a dataset directly from records; the schema is exactly the listing columns.
    pub fn from_records(rows: Vec<ListingRecord>) -> Self {
        let columns = Column::ALL.iter().map(|c| c.name().to_string()).collect();
        Self { columns, rows }
    }

    /// Every column name present in the source, lowercased.
    pub fn columns(&self) -> &BTreeSet<String> { &self.columns }

    pub fn rows(&self) -> &[ListingRecord] { &self.rows }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

static GLOBAL: OnceCell<Dataset> = OnceCell::new();

/// Load the process-wide dataset. Later calls return the first load without re-reading.
pub fn init_global(path: impl AsRef<Path>) -> Result<&'static Dataset, DataLoadError> {
    GLOBAL.get_or_try_init(|| Dataset::load(path))
}

/// The process-wide dataset, if [`init_global`] has succeeded.
pub fn global() -> Option<&'static Dataset> { GLOBAL.get() }
