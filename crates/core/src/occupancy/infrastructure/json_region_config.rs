use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

use crate::occupancy::domain::region::{Color, Region, RegionError};
use crate::shared::geometry::Point;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read region config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("region config is not a JSON object of regions: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("region '{name}' is malformed: {source}")]
    Entry {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Region(#[from] RegionError),
}

/// A region value: either a bare polygon or a polygon with a colour.
#[derive(Deserialize)]
#[serde(untagged)]
enum RegionEntry {
    Polygon(Vec<Point>),
    Detailed {
        polygon: Vec<Point>,
        #[serde(default)]
        color: Option<Color>,
    },
}

/// JSON object entries in document order, duplicates kept.
struct OrderedEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping region names to polygons")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parses an ordered region configuration:
///
/// ```json
/// {
///   "north": [[0, 0], [100, 0], [100, 50]],
///   "south": { "polygon": [[0, 60], [100, 60], [50, 120]], "color": [255, 0, 0] }
/// }
/// ```
///
/// Key order is configuration order. Regions without a colour take the
/// palette colour for their position.
pub fn parse_regions(json: &str) -> Result<Vec<Region>, ConfigError> {
    let OrderedEntries(entries) = serde_json::from_str(json).map_err(ConfigError::Parse)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| -> Result<Region, ConfigError> {
            let entry: RegionEntry = serde_json::from_value(value).map_err(|source| {
                ConfigError::Entry {
                    name: name.clone(),
                    source,
                }
            })?;
            let (polygon, color) = match entry {
                RegionEntry::Polygon(polygon) => (polygon, None),
                RegionEntry::Detailed { polygon, color } => (polygon, color),
            };
            let color = color.unwrap_or_else(|| Color::for_index(i));
            Ok(Region::new(name, polygon, color)?)
        })
        .collect()
}

pub fn load_regions(path: &Path) -> Result<Vec<Region>, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let regions = parse_regions(&json)?;
    log::info!("Loaded {} regions from {}", regions.len(), path.display());
    Ok(regions)
}
