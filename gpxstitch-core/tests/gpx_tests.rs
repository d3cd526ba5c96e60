// gpxstitch-core/tests/gpx_tests.rs

use gpxstitch_core::error::CoreError;
use gpxstitch_core::gpx::route::parse_route_response;
use gpxstitch_core::gpx::{Point, Segment, Track, read_track_file, write_track_file};
use tempfile::tempdir;

#[test]
fn test_written_track_reads_back_with_identical_coordinates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("0.gpx");
    let track = Track::new(
        "GOPR0001 & friends",
        vec![Segment::new(vec![
            Point::new("45.8325000", "6.8650100").with_elevation(1035.5),
            Point::new("45.83251", "6.86502"),
            Point::new("-0.000100", "-179.999990").with_elevation(0.0),
        ])],
    );

    write_track_file(&path, &track).unwrap();
    let read = read_track_file(&path).unwrap();

    assert_eq!(read, track);
}

#[test]
fn test_route_response_saved_as_link_track() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx xmlns="https://raw.githubusercontent.com/GIScience/openrouteservice-schema/main/gpx/v2/ors-gpx.xsd" version="1.0" creator="openrouteservice">
  <rte>
    <rtept lat="10.0" lon="20.0"><extensions><distance>5.0</distance><duration>1.2</duration><type>11</type><step>0</step></extensions></rtept>
    <rtept lat="10.1" lon="20.1"><extensions><distance>0.0</distance><duration>0.0</duration><type>10</type><step>1</step></extensions></rtept>
  </rte>
</gpx>"#;
    let dir = tempdir().unwrap();
    let path = dir.path().join("0To1.gpx");

    let link = parse_route_response(body).unwrap();
    write_track_file(&path, &link).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("<name>openRouteService</name>"));
    assert!(!content.contains("extensions"));
    assert_eq!(read_track_file(&path).unwrap().point_count(), 2);
}

#[test]
fn test_malformed_track_file_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("3.gpx");
    std::fs::write(&path, "<gpx><trk><trkseg><trkpt lat=\"1\"").unwrap();

    match read_track_file(&path) {
        Err(CoreError::MalformedGpx { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected MalformedGpx, got {:?}", other),
    }
}
