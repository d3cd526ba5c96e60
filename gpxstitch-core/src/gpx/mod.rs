//! GPX track model.
//!
//! Coordinates are kept as the literal decimal strings found in the source
//! files. Nothing in the pipeline does arithmetic on them, and reformatting
//! through `f64` would change what downstream tools see (`"10.10"` would come
//! back as `"10.1"`). Equality is exact string equality.

mod io;
pub mod route;

use std::fmt;

use serde::Serialize;

pub use io::{parse_track, read_track_file, to_gpx_string, write_track_file};

/// Latitude or longitude as written in a GPX attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Coordinate(String);

impl Coordinate {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `gopro2gpx` writes a literal `0` for samples recorded without a fix.
    pub fn is_zero_fix(&self) -> bool {
        self.0 == "0"
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single track point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub lat: Coordinate,
    pub lon: Coordinate,
    pub elevation: Option<f64>,
}

impl Point {
    pub fn new(lat: impl Into<Coordinate>, lon: impl Into<Coordinate>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
            elevation: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// True when both axes carry the no-fix marker. Such a point must never
    /// become a stitching endpoint.
    pub fn is_invalid_fix(&self) -> bool {
        self.lat.is_zero_fix() && self.lon.is_zero_fix()
    }

    /// Position equality: latitude and longitude text must match exactly.
    /// Elevation is ignored.
    pub fn same_position(&self, other: &Point) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// An ordered run of points (`<trkseg>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<Point>,
}

impl Segment {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// A named track (`<trk>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn new(name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            name: name.into(),
            segments,
        }
    }

    /// First point of the first segment.
    ///
    /// Clip tracks are written with a single segment, so the boundary
    /// endpoints are always taken from segment zero.
    pub fn first_point(&self) -> Option<&Point> {
        self.segments.first()?.points.first()
    }

    /// Last point of the first segment.
    pub fn last_point(&self) -> Option<&Point> {
        self.segments.first()?.points.last()
    }

    /// True when the first segment holds at least one point.
    pub fn has_endpoints(&self) -> bool {
        self.first_point().is_some()
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fix_requires_both_axes() {
        assert!(Point::new("0", "0").is_invalid_fix());
        assert!(!Point::new("0", "20.5").is_invalid_fix());
        assert!(!Point::new("0.0", "0").is_invalid_fix());
    }

    #[test]
    fn test_same_position_ignores_elevation() {
        let ground = Point::new("10", "20").with_elevation(0.0);
        assert!(ground.same_position(&Point::new("10", "20")));
        assert!(ground.same_position(&Point::new("10", "20").with_elevation(812.5)));
        assert!(!ground.same_position(&Point::new("10.0", "20")));
        assert!(!ground.same_position(&Point::new("10", "20.1")));
    }

    #[test]
    fn test_coordinate_equality_is_textual() {
        assert_ne!(Coordinate::from("10.10"), Coordinate::from("10.1"));
        assert_eq!(Coordinate::from("10.10").as_str(), "10.10");
    }

    #[test]
    fn test_endpoints_come_from_first_segment() {
        let track = Track::new(
            "clip",
            vec![
                Segment::new(vec![Point::new("1", "2"), Point::new("3", "4")]),
                Segment::new(vec![Point::new("5", "6")]),
            ],
        );
        assert_eq!(track.first_point(), Some(&Point::new("1", "2")));
        assert_eq!(track.last_point(), Some(&Point::new("3", "4")));
        assert_eq!(track.point_count(), 3);
    }

    #[test]
    fn test_empty_first_segment_has_no_endpoints() {
        let track = Track::new(
            "clip",
            vec![Segment::default(), Segment::new(vec![Point::new("5", "6")])],
        );
        assert!(!track.has_endpoints());
        assert!(track.last_point().is_none());
        assert!(!Track::default().has_endpoints());
    }
}
