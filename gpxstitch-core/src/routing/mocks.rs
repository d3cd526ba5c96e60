// gpxstitch-core/src/routing/mocks.rs

// --- Mock Route Provider (for testing) ---

use super::{RouteProvider, RouteResponse};
use crate::error::CoreResult;
use crate::gpx::Point;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Route provider that answers from a queue and records every request.
///
/// When the queue is empty, a two-point route from `from` to `to` is
/// returned, so tests only need to queue the interesting responses.
#[derive(Debug, Default)]
pub struct MockRouteProvider {
    requests: RefCell<Vec<(Point, Point)>>,
    responses: RefCell<VecDeque<RouteResponse>>,
}

impl MockRouteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: RouteResponse) {
        self.responses.borrow_mut().push_back(response);
    }

    /// Every `(from, to)` pair requested so far, in order.
    pub fn requests(&self) -> Vec<(Point, Point)> {
        self.requests.borrow().clone()
    }
}

impl RouteProvider for MockRouteProvider {
    fn fetch_route(&self, from: &Point, to: &Point) -> CoreResult<RouteResponse> {
        self.requests.borrow_mut().push((from.clone(), to.clone()));
        let queued = self.responses.borrow_mut().pop_front();
        Ok(queued.unwrap_or_else(|| RouteResponse::Success(straight_route(from, to))))
    }
}

/// A minimal directions response with a single leg from `from` to `to`.
pub fn straight_route(from: &Point, to: &Point) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<gpx version="1.0" creator="openrouteservice" xmlns="https://raw.githubusercontent.com/GIScience/openrouteservice-schema/main/gpx/v2/ors-gpx.xsd">"#,
            r#"<rte><rtept lat="{}" lon="{}"><ele>0.0</ele></rtept>"#,
            r#"<rtept lat="{}" lon="{}"><ele>0.0</ele></rtept></rte></gpx>"#
        ),
        from.lat, from.lon, to.lat, to.lon
    )
}
