// ============================================================================
// gpxstitch-core/src/gpx/io.rs
// ============================================================================
//
// GPX READ/WRITE: Track Files On Disk
//
// Reads `<gpx><trk><trkseg><trkpt>` documents into `Track` and writes them
// back. Parsing goes through roxmltree and matches elements by local name,
// so the GPX 1.1 namespace (or none at all) is accepted. lat/lon attributes
// are copied verbatim.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;

use super::{Coordinate, Point, Segment, Track};
use crate::error::{CoreResult, malformed_gpx};

const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// Parses a GPX document and returns its first `<trk>`.
///
/// A document without any `<trk>` yields an empty track, which the stitcher
/// treats like a clip that recorded no fix.
pub fn parse_track(xml: &str) -> Result<Track, String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| format!("XML parse error: {e}"))?;

    let root = doc.root_element();
    if root.tag_name().name() != "gpx" {
        return Err(format!(
            "root element must be <gpx>, found <{}>",
            root.tag_name().name()
        ));
    }

    let Some(trk) = child_elements(root, "trk").next() else {
        return Ok(Track::default());
    };

    let name = child_elements(trk, "name")
        .next()
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    let mut segments = Vec::new();
    for trkseg in child_elements(trk, "trkseg") {
        let points = child_elements(trkseg, "trkpt")
            .map(parse_point)
            .collect::<Result<Vec<_>, _>>()?;
        segments.push(Segment::new(points));
    }

    Ok(Track::new(name, segments))
}

fn parse_point(node: roxmltree::Node) -> Result<Point, String> {
    let pos = node.range().start;
    let lat = node
        .attribute("lat")
        .ok_or_else(|| format!("<trkpt> at byte {pos} has no lat attribute"))?;
    let lon = node
        .attribute("lon")
        .ok_or_else(|| format!("<trkpt> at byte {pos} has no lon attribute"))?;

    let elevation = match child_elements(node, "ele").next().and_then(|n| n.text()) {
        Some(text) => Some(
            text.trim()
                .parse::<f64>()
                .map_err(|e| format!("<ele> '{}' at byte {pos} is not a number: {e}", text.trim()))?,
        ),
        None => None,
    };

    Ok(Point {
        lat: Coordinate::new(lat),
        lon: Coordinate::new(lon),
        elevation,
    })
}

pub(super) fn child_elements<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Reads and parses a track file. Malformed content is fatal.
pub fn read_track_file(path: &Path) -> CoreResult<Track> {
    let content = std::fs::read_to_string(path)?;
    parse_track(&content).map_err(|message| malformed_gpx(path, message))
}

/// Serializes a track as a GPX 1.1 document with a single `<trk>`.
pub fn to_gpx_string(track: &Track) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<gpx version="1.1" creator="gpxstitch" xmlns="{GPX_NAMESPACE}">"#
    );
    let _ = writeln!(out, " <trk>");
    let _ = writeln!(out, "  <name>{}</name>", escape(&track.name));
    for segment in &track.segments {
        let _ = writeln!(out, "  <trkseg>");
        for point in &segment.points {
            let _ = write!(
                out,
                r#"   <trkpt lat="{}" lon="{}">"#,
                escape(point.lat.as_str()),
                escape(point.lon.as_str())
            );
            match point.elevation {
                Some(ele) => {
                    let _ = writeln!(out);
                    let _ = writeln!(out, "    <ele>{ele}</ele>");
                    let _ = writeln!(out, "   </trkpt>");
                }
                None => {
                    let _ = writeln!(out, "</trkpt>");
                }
            }
        }
        let _ = writeln!(out, "  </trkseg>");
    }
    let _ = writeln!(out, " </trk>");
    let _ = writeln!(out, "</gpx>");
    out
}

/// Writes a track to `path`, replacing any existing file atomically.
pub fn write_track_file(path: &Path, track: &Track) -> CoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(to_gpx_string(track).as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    log::debug!("Wrote {} points to {}", track.point_count(), path.display());
    Ok(())
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
