//! Type definitions, enums and writer options.

use std::fmt;

/// A 2-D coordinate as `(x, y)`.
pub type Coord = (f64, f64);

/// Serialized geometry formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Well-known text.
    Wkt,
    /// Well-known binary.
    Wkb,
    /// Hex-encoded well-known binary.
    HexWkb,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Wkt => "WKT",
            Format::Wkb => "WKB",
            Format::HexWkb => "HEX",
        })
    }
}

/// Byte order of WKB output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Big endian (XDR).
    Big,
    /// Little endian (NDR).
    #[default]
    Little,
}

impl From<ByteOrder> for i32 {
    fn from(order: ByteOrder) -> i32 {
        match order {
            ByteOrder::Big => 0,
            ByteOrder::Little => 1,
        }
    }
}

/// Geometry kinds as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    /// A single position (engine id 0)
    Point,
    /// Connected line segments (engine id 1)
    LineString,
    /// Closed line string with 0 or at least 4 points (engine id 2)
    LinearRing,
    /// Shell ring with optional holes (engine id 3)
    Polygon,
    /// Collection of points (engine id 4)
    MultiPoint,
    /// Collection of line strings (engine id 5)
    MultiLineString,
    /// Collection of polygons (engine id 6)
    MultiPolygon,
    /// Collection of any geometries (engine id 7)
    GeometryCollection,
}

impl TryFrom<i32> for GeometryType {
    type Error = i32;

    fn try_from(id: i32) -> Result<Self, i32> {
        Ok(match id {
            0 => GeometryType::Point,
            1 => GeometryType::LineString,
            2 => GeometryType::LinearRing,
            3 => GeometryType::Polygon,
            4 => GeometryType::MultiPoint,
            5 => GeometryType::MultiLineString,
            6 => GeometryType::MultiPolygon,
            7 => GeometryType::GeometryCollection,
            other => return Err(other),
        })
    }
}

/// Options for WKT output.
#[derive(Debug, Clone)]
pub struct WktOptions {
    /// Number of significant digits kept when rounding coordinates (default: 15).
    pub precision: i32,
    /// Strip trailing zeros from coordinates (default: false).
    pub trim: bool,
    /// Output dimension, 2 or 3 (default: 2).
    pub output_dimension: u32,
}

impl Default for WktOptions {
    fn default() -> Self {
        Self {
            precision: 15,
            trim: false,
            output_dimension: 2,
        }
    }
}

/// Options for WKB and hex WKB output.
#[derive(Debug, Clone)]
pub struct WkbOptions {
    /// Byte order (default: little endian).
    pub byte_order: ByteOrder,
    /// Output dimension, 2 or 3 (default: 2).
    pub output_dimension: u32,
}

impl Default for WkbOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            output_dimension: 2,
        }
    }
}
