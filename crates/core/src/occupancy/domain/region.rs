use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{MIN_POLYGON_VERTICES, REGION_PALETTE};
use crate::shared::geometry::{self, Point};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    #[error("invalid region '{name}': {reason}")]
    InvalidRegion { name: String, reason: String },
    #[error("unknown region '{0}'")]
    UnknownRegion(String),
}

impl RegionError {
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRegion {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Overlay colour for a region, serialised as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette colour for the region at `index` in configuration order.
    pub fn for_index(index: usize) -> Self {
        REGION_PALETTE[index % REGION_PALETTE.len()].into()
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A named polygon of interest. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    name: String,
    polygon: Vec<Point>,
    color: Color,
}

impl Region {
    /// Validates the polygon: at least three vertices, all finite, and a
    /// non-empty name.
    pub fn new(
        name: impl Into<String>,
        polygon: Vec<Point>,
        color: Color,
    ) -> Result<Self, RegionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegionError::invalid(&name, "name must not be empty"));
        }
        if polygon.len() < MIN_POLYGON_VERTICES {
            return Err(RegionError::invalid(
                &name,
                format!(
                    "polygon needs at least {MIN_POLYGON_VERTICES} vertices, got {}",
                    polygon.len()
                ),
            ));
        }
        if let Some(idx) = polygon.iter().position(|p| !p.is_finite()) {
            return Err(RegionError::invalid(
                &name,
                format!("vertex {idx} has a non-finite coordinate"),
            ));
        }
        Ok(Self {
            name,
            polygon,
            color,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polygon(&self) -> &[Point] {
        &self.polygon
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn contains(&self, point: Point) -> bool {
        geometry::contains(point, &self.polygon)
    }
}
