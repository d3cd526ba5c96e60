//! Conversion of directions-service route documents into link tracks.
//!
//! openrouteservice answers a GPX request with a `<rte>` of `<rtept>`
//! elements, each carrying per-step `<extensions>` (duration, distance,
//! type, step). Merge tools expect `<trk>` data, so only the coordinates are
//! kept, in order, under a single segment.

use super::io::child_elements;
use super::{Coordinate, Point, Segment, Track};

/// Track name given to every routed connector.
pub const LINK_TRACK_NAME: &str = "openRouteService";

/// Parses a route response body into a single-segment link track.
///
/// A response without a `<rte>` produces a link with an empty segment.
pub fn parse_route_response(xml: &str) -> Result<Track, String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| format!("XML parse error: {e}"))?;

    let root = doc.root_element();
    if root.tag_name().name() != "gpx" {
        return Err(format!(
            "route response root must be <gpx>, found <{}>",
            root.tag_name().name()
        ));
    }

    let mut points = Vec::new();
    if let Some(rte) = child_elements(root, "rte").next() {
        for rtept in child_elements(rte, "rtept") {
            let (Some(lat), Some(lon)) = (rtept.attribute("lat"), rtept.attribute("lon")) else {
                return Err(format!(
                    "<rtept> at byte {} is missing lat/lon",
                    rtept.range().start
                ));
            };
            points.push(Point {
                lat: Coordinate::new(lat),
                lon: Coordinate::new(lon),
                elevation: None,
            });
        }
    }

    Ok(Track::new(LINK_TRACK_NAME, vec![Segment::new(points)]))
}
