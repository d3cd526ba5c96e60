// ============================================================================
// gpxstitch-core/src/stitch.rs
// ============================================================================
//
// GAP STITCHER: Connecting Consecutive Clip Tracks
//
// Walks the clip tracks in index order and, for every pair of neighbours
// with usable endpoints, asks the routing provider for a connector from the
// end of the earlier track to the start of the later one. Each connector is
// written as `<prev>To<next>.gpx` next to the clip tracks.
//
// KEY COMPONENTS:
// - StitchState::step: pure state transition, one track at a time
// - StitchDecision / LinkRequest: what the walk wants done for a track
// - stitch_tracks: reads the files, runs the walk, executes the requests
//
// The walk keeps the last usable endpoint seen so far. Until one exists,
// tracks are only candidates for seeding it; afterwards each new track is a
// link destination unless its name marks it as a link or merge artifact, or
// it was already linked.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::gpx::route::parse_route_response;
use crate::gpx::{Point, Track, read_track_file, write_track_file};
use crate::ordering::{TrackFile, build_track_index, is_reserved_name, link_file_name, link_stem};
use crate::report::{CreatedLink, RunReport, SkipReason};
use crate::routing::{RouteProvider, RouteResponse, check_coordinates};

// ============================================================================
// STATE MACHINE
// ============================================================================

/// A connector the walk wants fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRequest {
    /// Last point of the previous track
    pub from: Point,
    /// First point of the current track
    pub to: Point,
    pub prev_stem: String,
    pub next_stem: String,
}

impl LinkRequest {
    pub fn stem(&self) -> String {
        link_stem(&self.prev_stem, &self.next_stem)
    }

    pub fn file_name(&self) -> String {
        link_file_name(&self.prev_stem, &self.next_stem)
    }
}

/// Outcome of feeding one track to the walk.
#[derive(Debug, Clone, PartialEq)]
pub enum StitchDecision {
    /// The track's last point became the first endpoint.
    Seeded,
    /// A connector should be fetched into this track.
    Link(LinkRequest),
    /// The track's first segment has no points.
    SkippedEmpty,
    /// The track ends without a GPS fix and cannot seed the walk.
    SkippedInvalidFix,
    /// The track is a link, a merge output, or already linked.
    SkippedReserved,
}

/// State carried between tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StitchState {
    /// Last usable point seen; `None` until a track has seeded the walk.
    pub endpoint: Option<Point>,
    /// File name of the track `endpoint` was taken from.
    pub buffered_name: Option<String>,
    /// Tracks already used as a link destination.
    pub linked: BTreeSet<String>,
}

impl StitchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the walk by one track.
    pub fn step(mut self, file: &TrackFile, track: &Track) -> (Self, StitchDecision) {
        let Some(endpoint) = self.endpoint.take() else {
            return self.seed(file, track);
        };

        if is_reserved_name(&file.name) || self.linked.contains(&file.name) {
            self.endpoint = Some(endpoint);
            return (self, StitchDecision::SkippedReserved);
        }

        let (Some(first), Some(last)) = (track.first_point(), track.last_point()) else {
            self.endpoint = Some(endpoint);
            self.buffered_name = Some(file.name.clone());
            return (self, StitchDecision::SkippedEmpty);
        };

        let prev_name = self.buffered_name.replace(file.name.clone());
        let request = LinkRequest {
            from: endpoint,
            to: first.clone(),
            prev_stem: stem_of(prev_name.as_deref().unwrap_or_default()).to_string(),
            next_stem: file.stem().to_string(),
        };

        // A track ending without a fix leaves nothing to link from; the next
        // track seeds the walk again.
        self.endpoint = (!last.is_invalid_fix()).then(|| last.clone());
        self.linked.insert(file.name.clone());

        (self, StitchDecision::Link(request))
    }

    fn seed(mut self, file: &TrackFile, track: &Track) -> (Self, StitchDecision) {
        self.buffered_name = Some(file.name.clone());

        match track.last_point() {
            None => (self, StitchDecision::SkippedEmpty),
            Some(last) if last.is_invalid_fix() => (self, StitchDecision::SkippedInvalidFix),
            Some(last) => {
                self.endpoint = Some(last.clone());
                (self, StitchDecision::Seeded)
            }
        }
    }
}

fn stem_of(name: &str) -> &str {
    name.strip_suffix(".gpx").unwrap_or(name)
}

// ============================================================================
// DRIVER
// ============================================================================

/// What happened to a single link request.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// The connector was fetched and written.
    Created(CreatedLink),
    /// A link file with this name was already on disk; nothing was requested.
    AlreadyPresent(CreatedLink),
    /// The routing service answered with a non-200 status.
    Rejected { status: u16 },
    /// The routing service could not be reached.
    Unreachable(String),
    /// An endpoint coordinate cannot be put into a request.
    InvalidCoordinate(String),
}

/// Stitches every gap in `gpx_dir` and records the results in `report`.
///
/// Returns the number of link files written by this call.
///
/// # Errors
///
/// Unreadable or malformed track files, a malformed route body on a
/// successful response, and write failures are fatal. Routing rejections,
/// transport failures and unroutable coordinates are not: they are logged and
/// recorded, and the walk moves on to the next track.
pub fn stitch_tracks<P>(gpx_dir: &Path, provider: &P, report: &mut RunReport) -> CoreResult<usize>
where
    P: RouteProvider + ?Sized,
{
    let index = build_track_index(gpx_dir)?;
    log::info!("Stitching {} track(s) in {}", index.len(), gpx_dir.display());

    let mut state = StitchState::new();
    let mut written = 0;

    for file in &index {
        let track = read_track_file(&file.path)?;
        let (next, decision) = state.step(file, &track);
        state = next;

        match decision {
            StitchDecision::Seeded => {
                log::debug!("{}: seeded endpoint", file.name);
            }
            StitchDecision::SkippedReserved => {
                log::debug!("{}: not a link destination", file.name);
            }
            StitchDecision::SkippedEmpty => {
                log::info!("{}: no GPS points, nothing to link", file.name);
                report.record_skip(&file.name, None, SkipReason::EmptyTrack);
            }
            StitchDecision::SkippedInvalidFix => {
                log::info!("{}: ends without a GPS fix, not used as endpoint", file.name);
                report.record_skip(&file.name, None, SkipReason::InvalidFix);
            }
            StitchDecision::Link(request) => match execute_link(gpx_dir, provider, &request)? {
                LinkOutcome::Created(link) => {
                    log::info!("Created {} ({} points)", link.name, link.points);
                    written += 1;
                    report.record_link(link);
                }
                LinkOutcome::AlreadyPresent(link) => {
                    log::info!("{} already exists, keeping it", link.name);
                    report.record_link(link);
                }
                LinkOutcome::Rejected { status } => {
                    log::warn!("No connector {}: routing returned HTTP {}", request.stem(), status);
                    report.record_skip(&file.name, Some(request.stem()), SkipReason::Rejected { status });
                }
                LinkOutcome::Unreachable(message) => {
                    log::warn!("No connector {}: {}", request.stem(), message);
                    report.record_skip(
                        &file.name,
                        Some(request.stem()),
                        SkipReason::Unreachable { message },
                    );
                }
                LinkOutcome::InvalidCoordinate(message) => {
                    log::warn!("No connector {}: {}", request.stem(), message);
                    report.record_skip(
                        &file.name,
                        Some(request.stem()),
                        SkipReason::InvalidCoordinate { message },
                    );
                }
            },
        }
    }

    Ok(written)
}

/// Fetches and writes a single connector.
pub fn execute_link<P>(gpx_dir: &Path, provider: &P, request: &LinkRequest) -> CoreResult<LinkOutcome>
where
    P: RouteProvider + ?Sized,
{
    let path = gpx_dir.join(request.file_name());
    let link = |points: usize, reused: bool| CreatedLink {
        name: request.stem(),
        from: request.from.clone(),
        to: request.to.clone(),
        points,
        reused,
    };

    if path.exists() {
        let existing = read_track_file(&path)?;
        return Ok(LinkOutcome::AlreadyPresent(link(existing.point_count(), true)));
    }

    if let Err(message) = check_coordinates(&request.from, &request.to) {
        return Ok(LinkOutcome::InvalidCoordinate(message));
    }

    log::debug!("Requesting route {} -> {} for {}", request.from, request.to, request.stem());

    match provider.fetch_route(&request.from, &request.to)? {
        RouteResponse::Success(body) => {
            let track = parse_route_response(&body).map_err(|message| {
                log::error!("Malformed route response for {}: {}", request.stem(), message);
                CoreError::Routing(format!(
                    "malformed route response for {}: {}",
                    request.stem(),
                    message
                ))
            })?;
            write_track_file(&path, &track)?;
            Ok(LinkOutcome::Created(link(track.point_count(), false)))
        }
        RouteResponse::Rejected { status, body } => {
            log::debug!("Routing error body for {}: {}", request.stem(), body);
            Ok(LinkOutcome::Rejected { status })
        }
        RouteResponse::Unreachable(message) => Ok(LinkOutcome::Unreachable(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpx::Segment;
    use crate::routing::mocks::MockRouteProvider;
    use std::path::PathBuf;

    fn file(index: i64) -> TrackFile {
        TrackFile {
            index,
            name: format!("{index}.gpx"),
            path: PathBuf::from(format!("{index}.gpx")),
        }
    }

    fn track(points: &[(&str, &str)]) -> Track {
        Track::new(
            "clip",
            vec![Segment::new(
                points.iter().map(|(lat, lon)| Point::new(*lat, *lon)).collect(),
            )],
        )
    }

    fn walk(tracks: &[(TrackFile, Track)]) -> Vec<StitchDecision> {
        let mut state = StitchState::new();
        let mut decisions = Vec::new();
        for (f, t) in tracks {
            let (next, decision) = state.step(f, t);
            state = next;
            decisions.push(decision);
        }
        decisions
    }

    fn link_names(decisions: &[StitchDecision]) -> Vec<String> {
        decisions
            .iter()
            .filter_map(|d| match d {
                StitchDecision::Link(r) => Some(r.stem()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_three_clips_give_two_links() {
        let decisions = walk(&[
            (file(0), track(&[("9", "19"), ("10", "20")])),
            (file(1), track(&[("10.1", "20.1"), ("11", "21")])),
            (file(2), track(&[("11.05", "21.05")])),
        ]);

        assert_eq!(decisions[0], StitchDecision::Seeded);
        match &decisions[1] {
            StitchDecision::Link(r) => {
                assert_eq!(r.from, Point::new("10", "20"));
                assert_eq!(r.to, Point::new("10.1", "20.1"));
                assert_eq!(r.file_name(), "0To1.gpx");
            }
            other => panic!("expected link, got {:?}", other),
        }
        match &decisions[2] {
            StitchDecision::Link(r) => {
                assert_eq!(r.from, Point::new("11", "21"));
                assert_eq!(r.to, Point::new("11.05", "21.05"));
            }
            other => panic!("expected link, got {:?}", other),
        }
        assert_eq!(link_names(&decisions), vec!["0To1", "1To2"]);
    }

    #[test]
    fn test_invalid_fix_never_becomes_endpoint() {
        let decisions = walk(&[
            (file(0), track(&[("5", "5"), ("0", "0")])),
            (file(1), track(&[("1", "2"), ("3", "4")])),
            (file(2), track(&[("3.1", "4.1")])),
        ]);

        assert_eq!(decisions[0], StitchDecision::SkippedInvalidFix);
        assert_eq!(decisions[1], StitchDecision::Seeded);
        assert_eq!(link_names(&decisions), vec!["1To2"]);
    }

    #[test]
    fn test_single_zero_axis_is_a_valid_fix() {
        let decisions = walk(&[
            (file(0), track(&[("0", "20")])),
            (file(1), track(&[("0.1", "20.1")])),
        ]);
        assert_eq!(link_names(&decisions), vec!["0To1"]);
    }

    #[test]
    fn test_link_ending_without_fix_reseeds() {
        let decisions = walk(&[
            (file(0), track(&[("1", "1")])),
            (file(1), track(&[("2", "2"), ("0", "0")])),
            (file(2), track(&[("3", "3")])),
            (file(3), track(&[("4", "4")])),
        ]);

        assert_eq!(link_names(&decisions), vec!["0To1", "2To3"]);
        assert_eq!(decisions[2], StitchDecision::Seeded);
    }

    #[test]
    fn test_empty_track_is_bridged_over() {
        let decisions = walk(&[
            (file(0), track(&[("1", "1")])),
            (file(1), Track::default()),
            (file(2), track(&[("3", "3")])),
        ]);

        assert_eq!(decisions[1], StitchDecision::SkippedEmpty);
        // The endpoint is still track 0's, but the buffered name moved on.
        match &decisions[2] {
            StitchDecision::Link(r) => {
                assert_eq!(r.from, Point::new("1", "1"));
                assert_eq!(r.stem(), "1To2");
            }
            other => panic!("expected link, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_empty_tracks_wait_for_a_seed() {
        let decisions = walk(&[
            (file(0), Track::default()),
            (file(1), track(&[("1", "1")])),
            (file(2), track(&[("2", "2")])),
        ]);
        assert_eq!(decisions[0], StitchDecision::SkippedEmpty);
        assert_eq!(decisions[1], StitchDecision::Seeded);
        assert_eq!(link_names(&decisions), vec!["1To2"]);
    }

    #[test]
    fn test_reserved_and_linked_names_leave_state_alone() {
        let reserved = TrackFile {
            index: 1,
            name: "0To1.gpx".to_string(),
            path: PathBuf::from("0To1.gpx"),
        };
        let (state, _) = StitchState::new().step(&file(0), &track(&[("1", "1")]));
        let before = state.clone();

        let (state, decision) = state.step(&reserved, &track(&[("2", "2")]));
        assert_eq!(decision, StitchDecision::SkippedReserved);
        assert_eq!(state, before);

        let (state, decision) = state.step(&file(1), &track(&[("2", "2")]));
        assert!(matches!(decision, StitchDecision::Link(_)));
        let after_link = state.clone();
        let (state, decision) = state.step(&file(1), &track(&[("2", "2")]));
        assert_eq!(decision, StitchDecision::SkippedReserved);
        assert_eq!(state, after_link);
    }

    fn write_clip(dir: &Path, index: usize, points: &[(&str, &str)]) {
        write_track_file(&dir.join(format!("{index}.gpx")), &track(points)).unwrap();
    }

    #[test]
    fn test_stitch_tracks_writes_links_and_skips_rejections() {
        let dir = tempfile::tempdir().unwrap();
        write_clip(dir.path(), 0, &[("10", "20")]);
        write_clip(dir.path(), 1, &[("10.1", "20.1"), ("11", "21")]);
        write_clip(dir.path(), 2, &[("11.05", "21.05")]);

        let provider = MockRouteProvider::new();
        provider.push_response(RouteResponse::Rejected {
            status: 500,
            body: "{\"error\":\"internal\"}".to_string(),
        });

        let mut report = RunReport::new(dir.path());
        let written = stitch_tracks(dir.path(), &provider, &mut report).unwrap();

        assert_eq!(written, 1);
        assert_eq!(provider.requests().len(), 2);
        assert!(!dir.path().join("0To1.gpx").exists());
        assert!(dir.path().join("1To2.gpx").exists());
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.skipped[0].link.as_deref(), Some("0To1"));
    }

    #[test]
    fn test_existing_link_is_not_requested_again() {
        let dir = tempfile::tempdir().unwrap();
        write_clip(dir.path(), 0, &[("10", "20")]);
        write_clip(dir.path(), 1, &[("10.1", "20.1")]);

        let provider = MockRouteProvider::new();
        let mut report = RunReport::new(dir.path());
        assert_eq!(stitch_tracks(dir.path(), &provider, &mut report).unwrap(), 1);

        let mut rerun = RunReport::new(dir.path());
        assert_eq!(stitch_tracks(dir.path(), &provider, &mut rerun).unwrap(), 0);
        assert_eq!(provider.requests().len(), 1);
        assert!(rerun.links[0].reused);
        assert_eq!(rerun.links[0].points, 2);
    }

    #[test]
    fn test_malformed_success_body_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_clip(dir.path(), 0, &[("10", "20")]);
        write_clip(dir.path(), 1, &[("10.1", "20.1")]);

        let provider = MockRouteProvider::new();
        provider.push_response(RouteResponse::Success("not xml".to_string()));

        let mut report = RunReport::new(dir.path());
        let result = stitch_tracks(dir.path(), &provider, &mut report);
        assert!(matches!(result, Err(CoreError::Routing(_))));
    }
}
