// ============================================================================
// gpxstitch-core/src/routing/mod.rs
// ============================================================================
//
// ROUTING: Directions Service Client
//
// This module asks a directions service for a path between two points. The
// stitcher uses it to bridge the gap between the end of one clip's track and
// the start of the next.
//
// KEY COMPONENTS:
// - RouteProvider: the seam the stitcher calls through
// - RouteResponse: success body, HTTP rejection, or transport failure
// - OpenRouteServiceClient: blocking reqwest client for openrouteservice
//
// Only an HTTP 200 carries a usable route. Rejections and transport failures
// are returned as values, not errors: a missing connector must not abort
// the run.

// ---- Internal crate imports ----
use crate::config::RoutingConfig;
use crate::error::{CoreError, CoreResult};
use crate::gpx::{Coordinate, Point};

// ---- External crate imports ----
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::value::RawValue;

/// Mock route provider for tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// PROVIDER ABSTRACTION
// ============================================================================

/// Outcome of a single routing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResponse {
    /// HTTP 200 with the GPX route document.
    Success(String),
    /// Any other HTTP status.
    Rejected { status: u16, body: String },
    /// The request never produced a response (connect error, timeout, ...).
    Unreachable(String),
}

/// Something that can compute a route between two points.
pub trait RouteProvider {
    /// Requests a route from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Routing` only when no request could be built
    /// (for example a coordinate that is not a decimal number). The stitcher
    /// screens points with [`check_coordinates`] before calling this.
    fn fetch_route(&self, from: &Point, to: &Point) -> CoreResult<RouteResponse>;
}

// ============================================================================
// REQUEST BODY
// ============================================================================

#[derive(Serialize)]
struct DirectionsRequest {
    coordinates: Vec<Vec<Box<RawValue>>>,
}

/// Builds `{"coordinates":[[lon,lat],[lon,lat]]}` with the coordinate text
/// embedded verbatim as JSON numbers.
pub fn directions_request_body(from: &Point, to: &Point) -> CoreResult<String> {
    let number = |c: &Coordinate| json_number(c).map_err(CoreError::Routing);
    let request = DirectionsRequest {
        coordinates: vec![
            vec![number(&from.lon)?, number(&from.lat)?],
            vec![number(&to.lon)?, number(&to.lat)?],
        ],
    };
    serde_json::to_string(&request)
        .map_err(|e| CoreError::Routing(format!("Failed to encode directions request: {e}")))
}

/// Checks that both points can be sent to the directions service.
///
/// Returns a description of the first coordinate that is not a decimal
/// number.
pub fn check_coordinates(from: &Point, to: &Point) -> Result<(), String> {
    for coordinate in [&from.lon, &from.lat, &to.lon, &to.lat] {
        json_number(coordinate)?;
    }
    Ok(())
}

fn json_number(coordinate: &Coordinate) -> Result<Box<RawValue>, String> {
    let text = coordinate.as_str();
    let invalid = || format!("coordinate '{text}' is not a decimal number");

    text.parse::<f64>().map_err(|_| invalid())?;
    RawValue::from_string(text.to_string()).map_err(|_| invalid())
}

// ============================================================================
// OPENROUTESERVICE CLIENT
// ============================================================================

/// Blocking client for the openrouteservice GPX directions endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouteServiceClient {
    client: Client,
    url: String,
    api_key: String,
}

impl OpenRouteServiceClient {
    /// Creates a client from the routing configuration.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` - If no API key is configured
    /// * `CoreError::Routing` - If the HTTP client cannot be built
    pub fn new(config: &RoutingConfig) -> CoreResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CoreError::Config("a routing API key is required".to_string()))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("gpxstitch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::Routing(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.directions_url(),
            api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RouteProvider for OpenRouteServiceClient {
    fn fetch_route(&self, from: &Point, to: &Point) -> CoreResult<RouteResponse> {
        let body = directions_request_body(from, to)?;
        log::debug!("POST {} {}", self.url, body);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/gpx+xml, application/xml")
            .header(AUTHORIZATION, &self.api_key)
            .body(body)
            .send();

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                return Ok(RouteResponse::Unreachable(format!("request {kind}: {e}")));
            }
        };

        let status = response.status();
        let text = match response.text() {
            Ok(text) => text,
            Err(e) => return Ok(RouteResponse::Unreachable(format!("reading body failed: {e}"))),
        };

        if status == StatusCode::OK {
            Ok(RouteResponse::Success(text))
        } else {
            Ok(RouteResponse::Rejected {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}
